//! Analyst prompt template.

/// Embed `digest` and the indicator's display name in the report prompt.
#[must_use]
pub fn build_prompt(digest: &str, indicator_name: &str) -> String {
    format!(
        "You are a data analyst. Below are summary statistics from the World Bank \
         for the indicator \"{indicator_name}\".\n\
         \n\
         Data (by country):\n\
         {digest}\n\
         \n\
         Write a short report (2–3 sentences) summarizing the data, then list 3–5 \
         bullet-point insights, and end with 1–2 brief recommendations. Use plain \
         language. Keep the total response under 150 words."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_name_and_digest() {
        let digest = "Alpha: n=3 years, mean=2.00, min=1.00, max=3.00";
        let prompt = build_prompt(digest, "Population, total");

        assert!(prompt.starts_with(
            "You are a data analyst. Below are summary statistics from the World Bank \
             for the indicator \"Population, total\".\n\nData (by country):\n"
        ));
        assert!(prompt.contains(&format!("\n{digest}\n\n")));
        assert!(prompt.ends_with("Keep the total response under 150 words."));
    }
}
