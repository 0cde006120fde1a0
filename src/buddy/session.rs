use crate::buddy::gateway::Generator;
use crate::buddy::history::{HistoryEntry, HistoryStore, Response};
use crate::buddy::{prompt, Mode, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("⚠️ Please enter a topic.")]
    BlankTopic,
    #[error("⚠️ Please enter a subject.")]
    BlankSubject,
}

/// Settings and history owned by one chat. Never shared between chats.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub settings: Settings,
    history: HistoryStore,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            history: HistoryStore::new(),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Runs a request of the kind selected by `settings.mode`.
    pub async fn ask<G: Generator + ?Sized>(
        &mut self,
        gateway: &G,
        text: &str,
    ) -> Result<HistoryEntry, InputError> {
        match self.settings.mode {
            Mode::Learn => self.learn(gateway, text).await,
            Mode::Quiz => self.quiz(gateway, text).await,
        }
    }

    pub async fn learn<G: Generator + ?Sized>(
        &mut self,
        gateway: &G,
        topic: &str,
    ) -> Result<HistoryEntry, InputError> {
        let topic = non_blank(topic).ok_or(InputError::BlankTopic)?;
        let prompt = prompt::build_learn_prompt(topic, &self.settings);
        Ok(self.run(gateway, Mode::Learn, topic, &prompt).await)
    }

    pub async fn quiz<G: Generator + ?Sized>(
        &mut self,
        gateway: &G,
        subject: &str,
    ) -> Result<HistoryEntry, InputError> {
        let subject = non_blank(subject).ok_or(InputError::BlankSubject)?;
        let prompt = prompt::build_quiz_prompt(subject, &self.settings);
        Ok(self.run(gateway, Mode::Quiz, subject, &prompt).await)
    }

    // Failed attempts are recorded too, so history mirrors every request the user made.
    async fn run<G: Generator + ?Sized>(
        &mut self,
        gateway: &G,
        kind: Mode,
        input: &str,
        prompt: &str,
    ) -> HistoryEntry {
        let response = match gateway.generate(prompt).await {
            Ok(text) => Response::Generated(text),
            Err(err) => {
                log::warn!("{} request for {:?} failed: {}", kind, input, err);
                Response::Failed(format!("⚠️ Error: {}", err))
            }
        };

        let entry = HistoryEntry::new(kind, input.to_string(), response);
        self.history.append(entry.clone());
        entry
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
