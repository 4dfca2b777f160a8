/// Build the mood-analysis prompt for a single user input.
///
/// The model is asked to infer the emotional tone, suggest a two-line
/// uplifting activity, recommend an uplifting Indian song and finish with an
/// emoji. The input is embedded verbatim.
pub fn mood_prompt(input_text: &str) -> String {
    format!(
        r#"You are a supportive and empathetic AI assistant. Analyze the user's emotional tone from their input and provide a single, uplifting, and personalized activity suggestion in two lines that aligns with their mood. Then, suggest an uplifting Indian song that matches their emotions, ending with a relevant emoji to boost their mood.

User Input: "{input_text}"

AI Suggestion:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_input() {
        let prompt = mood_prompt("I feel great today!");
        assert!(prompt.contains(r#"User Input: "I feel great today!""#));
        assert!(prompt.contains("two lines"));
        assert!(prompt.contains("Indian song"));
        assert!(prompt.trim_end().ends_with("AI Suggestion:"));
    }
}
