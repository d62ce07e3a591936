//! The operations the transport layer calls into.

use std::sync::Arc;

use lazy_regex::regex_is_match;
use tracing::{instrument, warn};

use crate::config::EngineConfig;
use crate::domain::GameSnapshot;
use crate::errors::DomainError;
use crate::realtime::NotificationStream;
use crate::services::registry::{SeedSource, SessionRegistry};
use crate::services::session::GameSession;

/// Entry point for every player-facing operation, cheap to clone and share
/// across request handlers.
#[derive(Clone)]
pub struct MafiaService {
    registry: Arc<SessionRegistry>,
}

impl MafiaService {
    /// Sessions seeded from OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(Arc::new(SessionRegistry::new(config, SeedSource::Entropy)))
    }

    /// Reproducible role deals: each session's RNG is derived from `seed`
    /// and the session id.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_registry(Arc::new(SessionRegistry::new(config, SeedSource::Fixed(seed))))
    }

    pub fn with_registry(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    /// Join `session`, creating it on first use. The join that fills the
    /// roster starts the game before returning.
    #[instrument(skip(self))]
    pub fn join(&self, session: &str, name: &str) -> Result<(), DomainError> {
        if !regex_is_match!(r"^[A-Za-z0-9]+$", name) {
            warn!("Rejected join: invalid name");
            return Err(DomainError::invalid_name(format!(
                "Name '{name}' must be non-empty and alphanumeric"
            )));
        }
        let result = self.registry.join(session, name).map(|_| ());
        log_rejection("join", &result);
        result
    }

    #[instrument(skip(self))]
    pub fn vote(&self, session: &str, voter: &str, victim: &str) -> Result<(), DomainError> {
        let result = self.session(session)?.vote(voter, victim);
        log_rejection("vote", &result);
        result
    }

    #[instrument(skip(self))]
    pub fn kill(&self, session: &str, mafia: &str, victim: &str) -> Result<(), DomainError> {
        let result = self.session(session)?.kill(mafia, victim);
        log_rejection("kill", &result);
        result
    }

    #[instrument(skip(self))]
    pub fn check_if_mafia(
        &self,
        session: &str,
        detective: &str,
        suspect: &str,
    ) -> Result<bool, DomainError> {
        let result = self.session(session)?.check_if_mafia(detective, suspect);
        log_rejection("check", &result);
        result
    }

    /// Current snapshot. `name` identifies the caller for logging only;
    /// the snapshot is the same for everyone.
    #[instrument(skip(self))]
    pub fn get_state(&self, session: &str, name: &str) -> Result<GameSnapshot, DomainError> {
        Ok(self.session(session)?.snapshot())
    }

    #[instrument(skip(self))]
    pub fn can_chat(&self, session: &str, name: &str) -> Result<bool, DomainError> {
        self.session(session)?.can_chat(name)
    }

    #[instrument(skip(self))]
    pub fn quit(&self, session: &str, name: &str) -> Result<(), DomainError> {
        let result = self.session(session)?.quit(name);
        log_rejection("quit", &result);
        result
    }

    /// The player's event feed. See [`GameSession::subscribe`].
    #[instrument(skip(self))]
    pub fn subscribe(&self, session: &str, name: &str) -> Result<NotificationStream, DomainError> {
        self.session(session)?.subscribe(name)
    }

    /// Role and liveness dump of one session, for operators.
    pub fn describe(&self, session: &str) -> Result<String, DomainError> {
        Ok(self.session(session)?.describe())
    }

    fn session(&self, id: &str) -> Result<Arc<GameSession>, DomainError> {
        self.registry.get(id).inspect_err(|_| {
            warn!(session = id, "Unknown game session");
        })
    }
}

fn log_rejection<T>(action: &str, result: &Result<T, DomainError>) {
    if let Err(err) = result {
        warn!(action, code = %err.code(), detail = err.detail(), "Rejected action");
    }
}
