use async_trait::async_trait;
use campground_scan::{NotificationError, NotificationMessage, Notifier};
use tokio::process::Command;
use uuid::Uuid;

/// Program invoked to speak. Ships with macOS.
pub const SAY_PROGRAM: &str = "say";

/// Speaks a fixed phrase once per park with availability.
#[derive(Debug, Clone)]
pub struct SpeechNotifier {
    program: String,
    phrase: String,
}

impl SpeechNotifier {
    /// Speaks `phrase` through [`SAY_PROGRAM`].
    pub fn new(phrase: &str) -> Self {
        Self::with_program(SAY_PROGRAM, phrase)
    }

    /// Speaks `phrase` through another program taking the text as its only argument.
    pub fn with_program(program: &str, phrase: &str) -> Self {
        Self {
            program: program.to_string(),
            phrase: phrase.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for SpeechNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        _target: Option<&str>,
    ) -> Result<String, NotificationError> {
        for _ in &message.lines {
            let status = Command::new(&self.program)
                .arg(&self.phrase)
                .status()
                .await
                .map_err(|e| {
                    NotificationError::Speech(format!("failed to run {}: {}", self.program, e))
                })?;

            if !status.success() {
                return Err(NotificationError::Speech(format!(
                    "{} exited with {}",
                    self.program, status
                )));
            }
        }

        log::info!("🔊 Announced {} park(s) with availability", message.lines.len());
        Ok(format!("say-{}", Uuid::new_v4()))
    }
}
