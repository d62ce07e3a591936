//! Gate for the chat relay: only living players may talk, and only by day.

use tracing::debug;

use crate::errors::DomainError;
use crate::services::mafia::MafiaService;

pub struct ChatGate {
    service: MafiaService,
}

impl ChatGate {
    pub fn new(service: MafiaService) -> Self {
        Self { service }
    }

    /// The line to broadcast for `sender`'s message, prefixed with their
    /// name, or `CannotAct` if they may not chat right now.
    pub fn relay(&self, session: &str, sender: &str, text: &str) -> Result<String, DomainError> {
        if !self.service.can_chat(session, sender)? {
            debug!(session, sender, "Chat message blocked");
            return Err(DomainError::cannot_act(format!(
                "Player '{sender}' can't chat right now"
            )));
        }
        Ok(format_chat_line(sender, text))
    }
}

pub fn format_chat_line(sender: &str, text: &str) -> String {
    format!("[ {sender} ] {text}")
}
