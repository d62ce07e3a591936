use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::{Delivery, Notification};
use crate::realtime::subscription::NotificationStream;

/// What happened to a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Queued,
    /// Queue full; the event was dropped.
    Dropped,
    /// No queue, or its stream is gone.
    Closed,
}

struct PlayerQueue {
    sender: mpsc::Sender<Notification>,
    /// Receiver created at join, handed out to the first subscriber.
    pending: Option<mpsc::Receiver<Notification>>,
}

impl PlayerQueue {
    fn open(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            pending: Some(receiver),
        }
    }
}

/// One bounded queue per player of a session.
///
/// Delivery never blocks. The owning session serializes access, so the
/// fanout itself holds no lock.
pub struct NotificationFanout {
    session: String,
    capacity: usize,
    queues: HashMap<String, PlayerQueue>,
}

impl NotificationFanout {
    pub fn new(session: impl Into<String>, capacity: usize) -> Self {
        Self {
            session: session.into(),
            capacity: capacity.max(1),
            queues: HashMap::new(),
        }
    }

    /// Allocate `player`'s queue. Events sent before the first subscribe
    /// are buffered up to capacity.
    pub fn open(&mut self, player: &str) {
        self.queues
            .insert(player.to_string(), PlayerQueue::open(self.capacity));
    }

    /// Hand out `player`'s stream. The first call takes the queue created at
    /// join; later calls replace it, ending the previous stream.
    pub fn subscribe(&mut self, player: &str) -> Option<NotificationStream> {
        let capacity = self.capacity;
        let queue = self.queues.get_mut(player)?;
        if let Some(receiver) = queue.pending.take() {
            return Some(NotificationStream::new(receiver));
        }

        debug!(session = %self.session, player, "Replacing notification stream");
        *queue = PlayerQueue::open(capacity);
        queue.pending.take().map(NotificationStream::new)
    }

    pub fn deliver(&self, player: &str, notification: Notification) -> DeliveryOutcome {
        let Some(queue) = self.queues.get(player) else {
            return DeliveryOutcome::Closed;
        };
        let kind = notification.kind();
        match queue.sender.try_send(notification) {
            Ok(()) => {
                debug!(session = %self.session, player, ?kind, "Notification queued");
                DeliveryOutcome::Queued
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    session = %self.session,
                    player,
                    ?kind,
                    capacity = self.capacity,
                    "Notification queue full, dropping event"
                );
                DeliveryOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => DeliveryOutcome::Closed,
        }
    }

    /// Deliver a batch; returns how many events were dropped on full queues.
    pub fn deliver_all(&self, deliveries: Vec<Delivery>) -> usize {
        deliveries
            .into_iter()
            .map(|d| self.deliver(&d.recipient, d.notification))
            .filter(|outcome| *outcome == DeliveryOutcome::Dropped)
            .count()
    }

    /// Drop `player`'s queue; their stream ends after any buffered events.
    pub fn close(&mut self, player: &str) -> bool {
        self.queues.remove(player).is_some()
    }

    pub fn close_all(&mut self) {
        self.queues.clear();
    }

    pub fn is_open(&self, player: &str) -> bool {
        self.queues.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}
