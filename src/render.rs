use crate::buddy::history::HistoryStore;
use crate::buddy::Settings;

/// Telegram rejects messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

pub const EMPTY_HISTORY: &str = "No history yet. Start learning or take a quiz!";

/// One block per entry, newest first, numbered from 1.
pub fn history_blocks(history: &HistoryStore) -> Vec<String> {
    history
        .list_reversed()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if entry.response().is_failed() { " (failed)" } else { "" };
            format!(
                "{} - {}{}\nInput: {}\n\n{}",
                entry.kind(),
                i + 1,
                marker,
                entry.input(),
                entry.response().text()
            )
        })
        .collect()
}

pub fn settings_json(settings: &Settings) -> String {
    serde_json::to_string_pretty(settings).unwrap_or_else(|_| format!("{:?}", settings))
}

/// Splits `text` into pieces of at most `limit` characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || limit == 0 {
        return vec![text.to_string()];
    }
    chars
        .chunks(limit)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buddy::history::{HistoryEntry, Response};
    use crate::buddy::Mode;

    #[test]
    fn history_is_numbered_newest_first() {
        let mut history = HistoryStore::new();
        history.append(HistoryEntry::new(
            Mode::Learn,
            "photosynthesis".to_string(),
            Response::Generated("Plants make sugar.".to_string()),
        ));
        history.append(HistoryEntry::new(
            Mode::Quiz,
            "algebra".to_string(),
            Response::Failed("⚠️ Error: timeout".to_string()),
        ));

        let blocks = history_blocks(&history);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "Quiz - 1 (failed)\nInput: algebra\n\n⚠️ Error: timeout");
        assert_eq!(
            blocks[1],
            "Learn - 2\nInput: photosynthesis\n\nPlants make sugar."
        );
    }

    #[test]
    fn settings_render_as_json() {
        let json = settings_json(&Settings::default());
        assert!(json.contains("\"difficulty\": \"Medium\""));
        assert!(json.contains("\"mode\": \"Learn\""));
        assert!(json.contains("\"response_length\": \"Long\""));
    }

    #[test]
    fn splits_on_char_boundaries() {
        let text = "привіт".repeat(3);
        let parts = split_message(&text, 5);
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.chars().count() <= 5));
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn short_text_is_one_message() {
        assert_eq!(split_message("hello", MESSAGE_LIMIT), vec!["hello".to_string()]);
        assert_eq!(split_message("", MESSAGE_LIMIT), vec![String::new()]);
    }
}
