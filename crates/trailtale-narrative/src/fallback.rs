//! Deterministic fallback composer.
//!
//! When the external service fails, the narrative still advances: the
//! fallback segment is built only from the committed words and mentions
//! every one of them.

use trailtale_core::storyteller::WordContribution;

/// Composes the fallback segment for one checkpoint's words.
#[must_use]
pub fn fallback_segment(words: &[WordContribution], is_final: bool) -> String {
    let mut segment = String::from("The storyteller's voice faded for a moment, ");
    if words.is_empty() {
        segment.push_str("but the hunters pressed on all the same.");
    } else {
        segment.push_str("so the hunters kept their own log: ");
        let entries: Vec<String> = words
            .iter()
            .map(|word| {
                format!(
                    "{} brought \"{}\" ({})",
                    word.participant, word.value, word.kind
                )
            })
            .collect();
        segment.push_str(&entries.join("; "));
        segment.push('.');
    }
    if is_final {
        segment.push_str(" And with that, the hunt was done.");
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<WordContribution> {
        vec![
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
        ]
    }

    #[test]
    fn test_fallback_mentions_every_word() {
        let segment = fallback_segment(&words(), false);
        for needle in ["Chimney", "Cookies", "Ada", "Ben"] {
            assert!(segment.contains(needle), "fallback missing {needle}");
        }
    }

    #[test]
    fn test_fallback_is_never_empty() {
        assert!(!fallback_segment(&[], false).trim().is_empty());
        assert!(!fallback_segment(&[], true).trim().is_empty());
    }

    #[test]
    fn test_final_fallback_closes_the_hunt() {
        let segment = fallback_segment(&words(), true);
        assert!(segment.contains("the hunt was done"));
        assert!(!fallback_segment(&words(), false).contains("the hunt was done"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_segment(&words(), false), fallback_segment(&words(), false));
    }
}
