//! Prompt composition for the external storyteller service.

use trailtale_core::storyteller::StoryRequest;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are the storyteller for a live scavenger hunt. \
You write short, lighthearted story installments that weave in words \
contributed by the players. Keep each installment under 150 words.";

/// Builds the user message for one generation request.
#[must_use]
pub fn user_prompt(request: &StoryRequest) -> String {
    let mut prompt = String::new();

    if request.story_so_far.trim().is_empty() {
        prompt.push_str("Begin the story of the hunt.\n");
    } else {
        prompt.push_str("The story so far:\n");
        prompt.push_str(&request.story_so_far);
        prompt.push_str("\n\nContinue the story.\n");
    }

    prompt.push_str("\nWork in every one of these new contributions, using each word exactly as given:\n");
    for word in &request.words {
        prompt.push_str(&format!(
            "- {} ({}): \"{}\" contributed by {}\n",
            word.label, word.kind, word.value, word.participant
        ));
    }

    if let Some(guidance) = &request.guidance {
        prompt.push_str(&format!("\nTone and theme guidance: {guidance}\n"));
    }

    if request.is_final {
        prompt.push_str("\nThis is the last installment: bring the story to a satisfying close.\n");
    } else {
        prompt.push_str("\nEnd the installment mid-adventure, ready to be continued.\n");
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailtale_core::storyteller::WordContribution;

    fn request(is_final: bool, guidance: Option<&str>) -> StoryRequest {
        StoryRequest {
            story_so_far: String::new(),
            words: vec![
                WordContribution {
                    participant: "Ada".to_owned(),
                    kind: "Place".to_owned(),
                    label: "A place".to_owned(),
                    value: "Chimney".to_owned(),
                },
                WordContribution {
                    participant: "Ben".to_owned(),
                    kind: "Noun (Plural)".to_owned(),
                    label: "A treat".to_owned(),
                    value: "Cookies".to_owned(),
                },
            ],
            guidance: guidance.map(ToOwned::to_owned),
            is_final,
        }
    }

    #[test]
    fn test_prompt_mentions_every_word_and_contributor() {
        let prompt = user_prompt(&request(false, None));

        for needle in ["Chimney", "Cookies", "Ada", "Ben", "Place", "Noun (Plural)"] {
            assert!(prompt.contains(needle), "prompt missing {needle}: {prompt}");
        }
    }

    #[test]
    fn test_first_installment_opens_the_story() {
        let prompt = user_prompt(&request(false, None));
        assert!(prompt.contains("Begin the story"));
        assert!(!prompt.contains("The story so far"));
    }

    #[test]
    fn test_later_installments_carry_the_accumulated_story() {
        let mut req = request(false, None);
        req.story_so_far = "Once upon a rooftop.".to_owned();

        let prompt = user_prompt(&req);
        assert!(prompt.contains("The story so far"));
        assert!(prompt.contains("Once upon a rooftop."));
    }

    #[test]
    fn test_guidance_and_final_flag_change_the_instructions() {
        let prompt = user_prompt(&request(true, Some("spooky but friendly")));
        assert!(prompt.contains("spooky but friendly"));
        assert!(prompt.contains("satisfying close"));

        let prompt = user_prompt(&request(false, None));
        assert!(prompt.contains("mid-adventure"));
    }
}
