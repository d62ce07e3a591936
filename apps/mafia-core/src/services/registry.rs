use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::derive_session_seed;
use crate::errors::DomainError;
use crate::services::session::GameSession;

/// A join can race the reaper and land on a session that was just evicted;
/// it then retries against whatever the map holds now.
const JOIN_ATTEMPTS: usize = 3;

/// Where new sessions get their RNG from.
#[derive(Debug, Clone, Copy)]
pub enum SeedSource {
    Entropy,
    /// Per-session seeds derived from this base and the session id.
    Fixed(u64),
}

/// All live sessions, keyed by id.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<GameSession>>,
    config: EngineConfig,
    seeds: SeedSource,
}

impl SessionRegistry {
    pub fn new(config: EngineConfig, seeds: SeedSource) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
            seeds,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The session for `id`, created on first use.
    pub fn get_or_create(&self, id: &str) -> Arc<GameSession> {
        if let Some(existing) = self.sessions.get(id) {
            return existing.value().clone();
        }
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(session = id, "Creating game session");
                Arc::new(GameSession::new(
                    id,
                    self.config.notification_buffer,
                    self.rng_for(id),
                ))
            })
            .value()
            .clone()
    }

    /// Join `name` to `id`, creating the session on first use. Returns the
    /// session the player actually landed in.
    pub fn join(&self, id: &str, name: &str) -> Result<Arc<GameSession>, DomainError> {
        self.join_from(self.get_or_create(id), id, name)
    }

    fn join_from(
        &self,
        mut session: Arc<GameSession>,
        id: &str,
        name: &str,
    ) -> Result<Arc<GameSession>, DomainError> {
        let mut attempt = 1;
        loop {
            match session.join(name) {
                Ok(()) => return Ok(session),
                Err(_) if session.is_evicted() && attempt < JOIN_ATTEMPTS => {
                    debug!(session = id, attempt, "Session evicted under join, retrying");
                    attempt += 1;
                    session = self.get_or_create(id);
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Arc<GameSession>, DomainError> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::session_not_found(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// One retention pass: evict sessions whose TTL has run out at `now`
    /// and close their queues. Returns the evicted ids.
    pub fn reap(&self, now: Instant) -> Vec<String> {
        let candidates: Vec<String> = self
            .sessions
            .iter()
            .filter(|e| e.value().is_expired(now, &self.config))
            .map(|e| e.key().clone())
            .collect();

        let mut evicted = Vec::new();
        for id in candidates {
            // Re-check under the shard lock; a join may have revived the lobby.
            // The session is flagged before it leaves the map, so a join
            // holding a stale handle is rejected instead of lost.
            let removed = self
                .sessions
                .remove_if(&id, |_, session| session.try_evict(now, &self.config));
            if let Some((id, session)) = removed {
                session.shutdown();
                info!(
                    session = %id,
                    finished = session.is_finished(),
                    idle_secs = session.idle_for(now).as_secs(),
                    "Evicted game session"
                );
                evicted.push(id);
            }
        }
        evicted
    }

    fn rng_for(&self, id: &str) -> ChaCha20Rng {
        match self.seeds {
            SeedSource::Entropy => ChaCha20Rng::from_os_rng(),
            SeedSource::Fixed(base) => ChaCha20Rng::seed_from_u64(derive_session_seed(base, id)),
        }
    }
}
