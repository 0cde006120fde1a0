use crate::buddy::Mode;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Response {
    Generated(String),
    /// The gateway failed; holds the message shown to the user.
    Failed(String),
}

impl Response {
    pub fn text(&self) -> &str {
        match self {
            Response::Generated(text) | Response::Failed(text) => text,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Response::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    kind: Mode,
    input: String,
    response: Response,
}

impl HistoryEntry {
    pub fn new(kind: Mode, input: String, response: Response) -> Self {
        Self {
            kind,
            input,
            response,
        }
    }

    pub fn kind(&self) -> Mode {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn response(&self) -> &Response {
        &self.response
    }
}

/// Past interactions of a single session, oldest first.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Most recent entry first.
    pub fn list_reversed(&self) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
