//! A bot player: reacts to its own notification feed with random legal
//! actions until the game finishes.

use mafia_core::{GameSnapshot, MafiaService, Notification, NotificationStream, Role};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

pub struct Bot {
    pub name: String,
    session: String,
    service: MafiaService,
    stream: NotificationStream,
    rng: StdRng,
    role: Option<Role>,
}

impl Bot {
    pub fn new(
        name: String,
        session: String,
        service: MafiaService,
        stream: NotificationStream,
        rng: StdRng,
    ) -> Self {
        Self {
            name,
            session,
            service,
            stream,
            rng,
            role: None,
        }
    }

    /// Play until FINISH. Returns the bot's role and the FINISH event, or
    /// `None` if the feed ended first.
    pub async fn play(mut self) -> Option<(Role, Notification)> {
        while let Some(event) = self.stream.next().await {
            match &event {
                Notification::Start { game_state, role } => {
                    self.role = Some(*role);
                    self.act_at_night(game_state);
                }
                Notification::NewNight { game_state, .. } => self.act_at_night(game_state),
                Notification::NewDay { game_state, .. } => self.vote(game_state),
                Notification::Finish { .. } => return self.role.map(|role| (role, event)),
            }
        }
        warn!(bot = %self.name, "Feed ended before the game finished");
        None
    }

    fn act_at_night(&mut self, state: &GameSnapshot) {
        if !state.is_alive(&self.name) {
            return;
        }
        let result = match self.role {
            Some(Role::Mafia) => match self.pick(state) {
                Some(victim) => self.service.kill(&self.session, &self.name, &victim),
                None => Ok(()),
            },
            Some(Role::Detective) => match self.pick(state) {
                Some(suspect) => self
                    .service
                    .check_if_mafia(&self.session, &self.name, &suspect)
                    .map(|is_mafia| debug!(bot = %self.name, %suspect, is_mafia, "Checked")),
                None => Ok(()),
            },
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(bot = %self.name, error = %err, "Night action rejected");
        }
    }

    fn vote(&mut self, state: &GameSnapshot) {
        if !state.is_alive(&self.name) {
            return;
        }
        let Some(target) = self.pick(state) else {
            return;
        };
        if let Err(err) = self.service.vote(&self.session, &self.name, &target) {
            warn!(bot = %self.name, error = %err, "Vote rejected");
        }
    }

    /// A random living player other than this bot.
    fn pick(&mut self, state: &GameSnapshot) -> Option<String> {
        let candidates: Vec<&String> = state
            .alive_players
            .iter()
            .filter(|name| **name != self.name)
            .collect();
        candidates.choose(&mut self.rng).map(|name| (*name).clone())
    }
}
