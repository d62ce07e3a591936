//! One live session: the game, its player queues, and its RNG behind a
//! single lock.
//!
//! Mutations take the write lock for the whole call, including role
//! assignment on the 4th join and delivery of the resulting notifications.
//! Delivery is `try_send` on bounded queues, so a slow or absent consumer
//! never holds the lock. Queries take the read lock and see either all or
//! none of a concurrent mutation.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::EngineConfig;
use crate::domain::{Game, GameSnapshot};
use crate::errors::DomainError;
use crate::realtime::{NotificationFanout, NotificationStream};

struct SessionInner {
    game: Game,
    fanout: NotificationFanout,
    rng: ChaCha20Rng,
    finished_at: Option<Instant>,
    last_activity: Instant,
    /// Set once the registry drops this session; every later call is
    /// rejected as if the session did not exist.
    evicted: bool,
}

pub struct GameSession {
    id: String,
    inner: RwLock<SessionInner>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession").field("id", &self.id).finish_non_exhaustive()
    }
}

impl GameSession {
    pub fn new(id: impl Into<String>, notification_buffer: usize, rng: ChaCha20Rng) -> Self {
        let id = id.into();
        Self {
            inner: RwLock::new(SessionInner {
                game: Game::new(id.clone()),
                fanout: NotificationFanout::new(id.clone(), notification_buffer),
                rng,
                finished_at: None,
                last_activity: Instant::now(),
                evicted: false,
            }),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run `op` under the write lock, then flush the notifications it
    /// produced. A rejected `op` changes nothing, so there is nothing to flush.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut SessionInner) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut inner = self.inner.write();
        if inner.evicted {
            return Err(DomainError::session_not_found(&self.id));
        }
        let out = op(&mut inner)?;

        let deliveries = inner.game.drain_deliveries();
        let dropped = inner.fanout.deliver_all(deliveries);
        if dropped > 0 {
            debug!(session = %self.id, dropped, "Some notifications were not queued");
        }

        let now = Instant::now();
        inner.last_activity = now;
        if inner.game.is_finished() && inner.finished_at.is_none() {
            inner.finished_at = Some(now);
        }
        Ok(out)
    }

    pub fn join(&self, name: &str) -> Result<(), DomainError> {
        self.mutate(|inner| {
            let SessionInner {
                game, fanout, rng, ..
            } = inner;
            game.add_player(name, rng)?;
            // Open before the flush so the 4th player's START is queued too.
            fanout.open(name);
            Ok(())
        })
    }

    pub fn vote(&self, voter: &str, victim: &str) -> Result<(), DomainError> {
        self.mutate(|inner| inner.game.add_vote(voter, victim))
    }

    pub fn kill(&self, mafia: &str, victim: &str) -> Result<(), DomainError> {
        self.mutate(|inner| inner.game.kill_player(mafia, victim))
    }

    pub fn check_if_mafia(&self, detective: &str, suspect: &str) -> Result<bool, DomainError> {
        self.mutate(|inner| inner.game.check_if_mafia(detective, suspect))
    }

    pub fn quit(&self, name: &str) -> Result<(), DomainError> {
        self.mutate(|inner| {
            inner.game.delete_player(name)?;
            inner.fanout.close(name);
            Ok(())
        })
    }

    /// Attach to `name`'s notification queue. Departed players have none.
    pub fn subscribe(&self, name: &str) -> Result<NotificationStream, DomainError> {
        let mut inner = self.inner.write();
        if inner.evicted {
            return Err(DomainError::session_not_found(&self.id));
        }
        let connected = inner.game.player(name).is_some_and(|p| p.connected);
        if !connected {
            return Err(DomainError::player_not_found(name));
        }
        inner
            .fanout
            .subscribe(name)
            .ok_or_else(|| DomainError::player_not_found(name))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.read().game.snapshot()
    }

    pub fn can_chat(&self, name: &str) -> Result<bool, DomainError> {
        self.inner.read().game.can_chat(name)
    }

    pub fn is_finished(&self) -> bool {
        self.inner.read().game.is_finished()
    }

    pub fn player_count(&self) -> usize {
        self.inner.read().game.player_count()
    }

    /// Multi-line description of roles and liveness.
    pub fn describe(&self) -> String {
        self.inner.read().game.to_string()
    }

    /// Whether the retention policy allows evicting this session at `now`.
    pub fn is_expired(&self, now: Instant, config: &EngineConfig) -> bool {
        expired(&self.inner.read(), now, config)
    }

    /// Mark the session evicted if it is expired at `now`. Checked and set
    /// under one write lock, so a join either lands first and keeps the
    /// session alive or sees the flag and is rejected.
    pub(crate) fn try_evict(&self, now: Instant, config: &EngineConfig) -> bool {
        let mut inner = self.inner.write();
        if !inner.evicted && expired(&inner, now, config) {
            inner.evicted = true;
        }
        inner.evicted
    }

    pub fn is_evicted(&self) -> bool {
        self.inner.read().evicted
    }

    /// Close every remaining queue and reject further calls; open streams end.
    pub fn shutdown(&self) {
        let mut inner = self.inner.write();
        debug!(session = %self.id, queues = inner.fanout.len(), "Closing session queues");
        inner.evicted = true;
        inner.fanout.close_all();
    }

    /// Age since the last successful mutation.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inner.read().last_activity)
    }
}

fn expired(inner: &SessionInner, now: Instant, config: &EngineConfig) -> bool {
    let elapsed_since = |at: Instant| now.saturating_duration_since(at);

    if let Some(finished_at) = inner.finished_at {
        return elapsed_since(finished_at) >= config.finished_session_ttl;
    }
    let abandoned_lobby = !inner.game.is_started() && inner.game.player_count() == 0;
    abandoned_lobby && elapsed_since(inner.last_activity) >= config.lobby_idle_ttl
}
