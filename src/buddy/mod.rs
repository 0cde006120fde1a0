pub mod gateway;
pub mod history;
pub mod prompt;
pub mod session;

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label.trim())
    }
}

/// How verbose the generated answer should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResponseLength {
    Short,
    Medium,
    #[default]
    Long,
}

impl ResponseLength {
    pub const ALL: [ResponseLength; 3] = [
        ResponseLength::Short,
        ResponseLength::Medium,
        ResponseLength::Long,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResponseLength::Short => "Short",
            ResponseLength::Medium => "Medium",
            ResponseLength::Long => "Long",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label.trim())
    }
}

/// Kind of request. Also tags every history entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    #[default]
    Learn,
    Quiz,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Learn, Mode::Quiz];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Learn => "Learn",
            Mode::Quiz => "Quiz",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label.trim())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub response_length: ResponseLength,
}
