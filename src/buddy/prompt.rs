use crate::buddy::{ResponseLength, Settings};

pub fn length_instruction(length: ResponseLength) -> &'static str {
    match length {
        ResponseLength::Short => "Give a brief answer in 3-4 sentences.",
        ResponseLength::Medium => "Give a detailed answer in 2-3 paragraphs with examples.",
        ResponseLength::Long => {
            "Write a very long, structured answer with 5+ paragraphs, examples, and applications."
        }
    }
}

/// Prompt for the Learn tab. `topic` must already be validated as non-blank.
pub fn build_learn_prompt(topic: &str, settings: &Settings) -> String {
    format!(
        "Explain {}. {}",
        topic,
        length_instruction(settings.response_length)
    )
}

/// Prompt for the Quiz tab. `subject` must already be validated as non-blank.
pub fn build_quiz_prompt(subject: &str, settings: &Settings) -> String {
    format!(
        "Generate one {} level quiz question on {}. \
        Provide the question first, then a detailed step-by-step solution, \
        and a final correct answer. {}",
        settings.difficulty.label(),
        subject,
        length_instruction(settings.response_length)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::Difficulty;

    fn with_length(response_length: ResponseLength) -> Settings {
        Settings {
            response_length,
            ..Settings::default()
        }
    }

    #[test]
    fn short_learn_prompt() {
        let prompt = build_learn_prompt("photosynthesis", &with_length(ResponseLength::Short));
        assert_eq!(
            prompt,
            "Explain photosynthesis. Give a brief answer in 3-4 sentences."
        );
    }

    #[test]
    fn learn_prompt_carries_topic_and_length_fragment() {
        let topics = ["black holes", "the French Revolution", "Rust lifetimes ('a)"];
        for topic in topics {
            for length in ResponseLength::ALL {
                let prompt = build_learn_prompt(topic, &with_length(length));
                assert!(prompt.contains(topic));
                assert!(prompt.ends_with(length_instruction(length)));
            }
        }
    }

    #[test]
    fn hard_long_quiz_prompt() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            response_length: ResponseLength::Long,
            ..Settings::default()
        };
        let prompt = build_quiz_prompt("algebra", &settings);

        assert!(prompt.contains("Hard level quiz question on algebra"));
        assert!(prompt.contains(
            "Write a very long, structured answer with 5+ paragraphs, examples, and applications."
        ));
        assert!(prompt.contains("step-by-step solution"));
    }

    #[test]
    fn quiz_prompt_mentions_each_difficulty() {
        for difficulty in Difficulty::ALL {
            let settings = Settings {
                difficulty,
                ..Settings::default()
            };
            let prompt = build_quiz_prompt("geometry", &settings);
            assert!(prompt.contains("geometry"));
            assert!(prompt.contains(&format!("{} level", difficulty.label())));
        }
    }

    #[test]
    fn length_fragments_match_exact_text() {
        let cases = [
            (ResponseLength::Short, "Give a brief answer in 3-4 sentences."),
            (
                ResponseLength::Medium,
                "Give a detailed answer in 2-3 paragraphs with examples.",
            ),
            (
                ResponseLength::Long,
                "Write a very long, structured answer with 5+ paragraphs, examples, and applications.",
            ),
        ];
        for (length, expected) in cases {
            assert_eq!(length_instruction(length), expected);
            assert_eq!(
                build_learn_prompt("tides", &with_length(length)),
                format!("Explain tides. {}", expected)
            );
        }
    }

    #[test]
    fn length_fragments_are_distinct() {
        let short = length_instruction(ResponseLength::Short);
        let medium = length_instruction(ResponseLength::Medium);
        let long = length_instruction(ResponseLength::Long);
        assert_ne!(short, medium);
        assert_ne!(medium, long);
        assert_ne!(short, long);
    }
}
