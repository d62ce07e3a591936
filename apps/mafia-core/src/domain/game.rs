//! The session state machine.
//!
//! `Game` is synchronous and lock-free: callers serialize access (see
//! `services::session`). Every operation validates completely before it
//! mutates, so a rejected call leaves the game untouched. Notifications
//! produced by a call are queued in an outbox and drained by the caller
//! once the mutation is done.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rand::Rng;
use tracing::{debug, info};

use crate::domain::notification::Notification;
use crate::domain::roles::{assign_roles, Role};
use crate::domain::rules::{is_game_over, PLAYERS};
use crate::domain::snapshot::GameSnapshot;
use crate::domain::tally::resolve_day_victim;
use crate::errors::domain::{ConflictKind, DomainError};

/// Game progression phases. The terminal state is tracked separately by
/// [`Game::is_finished`] so snapshots keep reporting the last phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Roster still filling up.
    Lobby,
    /// Mafia picks a victim, Detective checks a suspect.
    Night,
    /// Every living player votes.
    Day,
}

/// Per-player state inside a session.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Unset until the game starts.
    pub role: Option<Role>,
    pub alive: bool,
    /// Reset at the start of every Day.
    pub has_voted: bool,
    /// Cleared when the player departs; no more notifications reach them.
    pub connected: bool,
}

impl PlayerRecord {
    fn joined() -> Self {
        Self {
            role: None,
            alive: true,
            has_voted: false,
            connected: true,
        }
    }
}

/// A notification addressed to a single player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub recipient: String,
    pub notification: Notification,
}

#[derive(Debug, Clone)]
pub struct Game {
    session: String,
    players: BTreeMap<String, PlayerRecord>,
    phase: Phase,
    finished: bool,
    /// Night counter, incremented on every Day -> Night.
    date: u32,
    /// Current Day's tally: victim name -> votes.
    votes: HashMap<String, u32>,
    votes_cast: usize,
    /// Current Night's kill target.
    mafia_choice: Option<String>,
    detective_checked: bool,
    outbox: Vec<Delivery>,
}

impl Game {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            players: BTreeMap::new(),
            phase: Phase::Lobby,
            finished: false,
            date: 0,
            votes: HashMap::new(),
            votes_cast: 0,
            mafia_choice: None,
            detective_checked: false,
            outbox: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Lobby
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The lobby counts as daytime, like a freshly created game.
    pub fn is_day(&self) -> bool {
        self.phase != Phase::Night
    }

    pub fn date(&self) -> u32 {
        self.date
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(name)
    }

    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.players.get(name).and_then(|p| p.role)
    }

    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.alive).count()
    }

    /// Living players, sorted by name.
    pub fn alive_players(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|(_, p)| p.alive)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn votes_cast(&self) -> usize {
        self.votes_cast
    }

    pub fn votes_for(&self, name: &str) -> u32 {
        self.votes.get(name).copied().unwrap_or(0)
    }

    pub fn mafia_choice(&self) -> Option<&str> {
        self.mafia_choice.as_deref()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            session: self.session.clone(),
            alive_players: self.alive_players(),
            date: self.date,
            is_day: self.is_day(),
            is_started: self.is_started(),
            is_finished: self.finished,
        }
    }

    /// Whether `name` may post to the session chat right now.
    pub fn can_chat(&self, name: &str) -> Result<bool, DomainError> {
        let player = self
            .players
            .get(name)
            .ok_or_else(|| DomainError::player_not_found(name))?;
        Ok(player.alive && self.phase == Phase::Day && !self.finished)
    }

    /// Take every notification queued since the last drain.
    pub fn drain_deliveries(&mut self) -> Vec<Delivery> {
        std::mem::take(&mut self.outbox)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Register a player. The join that fills the roster deals roles with
    /// `rng` and starts the first Night in the same call.
    pub fn add_player<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<(), DomainError> {
        self.add_player_with(name, |roster| assign_roles(roster, rng))
    }

    /// Same as [`Game::add_player`] with the role dealer supplied by the
    /// caller. `deal` receives the full roster sorted by name.
    pub(crate) fn add_player_with<F>(&mut self, name: &str, deal: F) -> Result<(), DomainError>
    where
        F: FnOnce(&[String]) -> Vec<(String, Role)>,
    {
        if self.is_started() || self.players.len() >= PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyStarted,
                "No more players can be added",
            ));
        }
        if name.is_empty() {
            return Err(DomainError::invalid_name("Name is empty"));
        }
        if self.players.contains_key(name) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateName,
                format!("Player '{name}' already exists"),
            ));
        }

        let assignment = if self.players.len() + 1 == PLAYERS {
            let mut roster: Vec<String> = self.players.keys().cloned().collect();
            roster.push(name.to_string());
            roster.sort();
            Some(deal(&roster))
        } else {
            None
        };

        self.players.insert(name.to_string(), PlayerRecord::joined());
        info!(
            session = %self.session,
            player = name,
            players = self.players.len(),
            "Player joined"
        );

        if let Some(assignment) = assignment {
            self.start(assignment);
        }
        Ok(())
    }

    pub fn add_vote(&mut self, voter: &str, victim: &str) -> Result<(), DomainError> {
        self.require_active()?;
        if self.phase != Phase::Day {
            return Err(DomainError::wrong_phase("Players can't vote during night"));
        }
        let can_vote = self
            .players
            .get(voter)
            .is_some_and(|p| p.alive && !p.has_voted);
        if !can_vote {
            return Err(DomainError::cannot_act("Player can't vote or doesn't exist"));
        }
        if !self.is_alive(victim) {
            return Err(DomainError::invalid_victim(
                "Victim can't be killed or doesn't exist",
            ));
        }

        *self.votes.entry(victim.to_string()).or_default() += 1;
        self.votes_cast += 1;
        if let Some(player) = self.players.get_mut(voter) {
            player.has_voted = true;
        }
        debug!(session = %self.session, voter, victim, votes = self.votes_cast, "Vote recorded");

        self.continue_if_possible();
        Ok(())
    }

    pub fn kill_player(&mut self, mafia: &str, victim: &str) -> Result<(), DomainError> {
        self.require_active()?;
        if self.phase != Phase::Night {
            return Err(DomainError::wrong_phase("Mafia can't kill during day"));
        }
        let can_kill = self.mafia_choice.is_none()
            && self
                .players
                .get(mafia)
                .is_some_and(|p| p.alive && p.role == Some(Role::Mafia));
        if !can_kill {
            return Err(DomainError::cannot_act(
                "Player is not the living mafia or has already chosen",
            ));
        }
        if !self.is_alive(victim) {
            return Err(DomainError::invalid_victim(
                "Victim can't be killed or doesn't exist",
            ));
        }

        self.mafia_choice = Some(victim.to_string());
        debug!(session = %self.session, victim, "Mafia choice recorded");

        self.continue_if_possible();
        Ok(())
    }

    /// Detective's nightly check. The answer reflects the suspect's role at
    /// call time, even if the night then completes and kills them.
    pub fn check_if_mafia(&mut self, detective: &str, suspect: &str) -> Result<bool, DomainError> {
        self.require_active()?;
        if self.phase != Phase::Night {
            return Err(DomainError::wrong_phase("Detective can't check during the day"));
        }
        let can_check = !self.detective_checked
            && self
                .players
                .get(detective)
                .is_some_and(|p| p.alive && p.role == Some(Role::Detective));
        if !can_check {
            return Err(DomainError::cannot_act(
                "Player isn't the living detective or has already checked",
            ));
        }
        if !self.is_alive(suspect) {
            return Err(DomainError::invalid_victim(
                "Suspect is already dead or doesn't exist",
            ));
        }

        let is_mafia = self.role_of(suspect) == Some(Role::Mafia);
        self.detective_checked = true;
        debug!(session = %self.session, suspect, "Detective check recorded");

        self.continue_if_possible();
        Ok(is_mafia)
    }

    /// Player departure.
    ///
    /// In the lobby the player is removed and the seat frees up. Once the
    /// game started the player is killed (if alive), disconnected, and the
    /// finish condition re-evaluated. A departed player is reported as not
    /// found afterwards.
    pub fn delete_player(&mut self, name: &str) -> Result<(), DomainError> {
        let connected = self.players.get(name).is_some_and(|p| p.connected);
        if !connected {
            return Err(DomainError::player_not_found(name));
        }

        if !self.is_started() {
            self.players.remove(name);
            info!(session = %self.session, player = name, "Player left the lobby");
            return Ok(());
        }

        if let Some(player) = self.players.get_mut(name) {
            player.connected = false;
        }
        if self.finished {
            info!(session = %self.session, player = name, "Player left a finished game");
            return Ok(());
        }

        let was_alive = self.kill(name);
        info!(session = %self.session, player = name, was_alive, "Player departed");

        if !self.check_if_finished() {
            self.continue_if_possible();
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    fn start(&mut self, assignment: Vec<(String, Role)>) {
        for (name, role) in assignment {
            if let Some(player) = self.players.get_mut(&name) {
                player.role = Some(role);
            }
        }
        self.begin_night();
        info!(session = %self.session, "Roles assigned, game started");

        let game_state = self.snapshot();
        for (name, player) in &self.players {
            if let (true, Some(role)) = (player.connected, player.role) {
                self.outbox.push(Delivery {
                    recipient: name.clone(),
                    notification: Notification::Start {
                        game_state: game_state.clone(),
                        role,
                    },
                });
            }
        }
    }

    fn is_phase_complete(&self) -> bool {
        match self.phase {
            Phase::Lobby => false,
            Phase::Day => self.votes_cast >= self.alive_count(),
            Phase::Night => {
                let detective_done =
                    self.detective_checked || !self.is_role_alive(Role::Detective);
                self.mafia_choice.is_some() && detective_done
            }
        }
    }

    /// Resolve the current phase if it is complete, then either finish the
    /// game or toggle Day/Night.
    fn continue_if_possible(&mut self) {
        if self.finished || !self.is_phase_complete() {
            return;
        }

        let victim = match self.phase {
            Phase::Lobby => return,
            Phase::Day => resolve_day_victim(&self.votes),
            Phase::Night => self.mafia_choice.clone(),
        };
        // A victim who already departed is not killed twice.
        let killed = victim.filter(|v| self.kill(v));

        if self.check_if_finished() {
            return;
        }

        let killed_player = killed.unwrap_or_default();
        match self.phase {
            Phase::Lobby => {}
            Phase::Day => {
                self.begin_night();
                info!(session = %self.session, date = self.date, killed = %killed_player, "Night falls");
                let game_state = self.snapshot();
                self.broadcast(Notification::NewNight {
                    game_state,
                    killed_player,
                });
            }
            Phase::Night => {
                self.begin_day();
                info!(session = %self.session, date = self.date, killed = %killed_player, "Day breaks");
                let game_state = self.snapshot();
                self.broadcast(Notification::NewDay {
                    game_state,
                    killed_player,
                });
            }
        }
    }

    /// Idempotent: FINISH is emitted at most once.
    fn check_if_finished(&mut self) -> bool {
        if self.finished {
            return true;
        }
        if !self.is_started() {
            return false;
        }
        if !is_game_over(self.is_role_alive(Role::Mafia), self.alive_count()) {
            return false;
        }

        self.finished = true;
        let mafia = self.name_of(Role::Mafia).unwrap_or_default();
        info!(
            session = %self.session,
            mafia_alive = self.is_alive(&mafia),
            alive = self.alive_count(),
            "Game finished"
        );
        let game_state = self.snapshot();
        self.broadcast(Notification::Finish { game_state, mafia });
        true
    }

    fn begin_night(&mut self) {
        self.phase = Phase::Night;
        self.date += 1;
        self.mafia_choice = None;
        self.detective_checked = false;
    }

    fn begin_day(&mut self) {
        self.phase = Phase::Day;
        self.votes.clear();
        self.votes_cast = 0;
        for player in self.players.values_mut() {
            player.has_voted = false;
        }
    }

    fn broadcast(&mut self, notification: Notification) {
        for (name, player) in &self.players {
            if player.connected {
                self.outbox.push(Delivery {
                    recipient: name.clone(),
                    notification: notification.clone(),
                });
            }
        }
    }

    /// Returns true if the player was alive and is now dead.
    fn kill(&mut self, name: &str) -> bool {
        match self.players.get_mut(name) {
            Some(player) if player.alive => {
                player.alive = false;
                true
            }
            _ => false,
        }
    }

    fn require_active(&self) -> Result<(), DomainError> {
        if self.finished {
            return Err(DomainError::game_finished());
        }
        if !self.is_started() {
            return Err(DomainError::not_started());
        }
        Ok(())
    }

    fn is_alive(&self, name: &str) -> bool {
        self.players.get(name).is_some_and(|p| p.alive)
    }

    fn is_role_alive(&self, role: Role) -> bool {
        self.players
            .values()
            .any(|p| p.alive && p.role == Some(role))
    }

    fn name_of(&self, role: Role) -> Option<String> {
        self.players
            .iter()
            .find(|(_, p)| p.role == Some(role))
            .map(|(name, _)| name.clone())
    }
}

#[cfg(test)]
impl Game {
    /// Jump to a fresh Day with the current roster, skipping the Night.
    pub(crate) fn force_day(&mut self) {
        self.begin_day();
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Game Info:")?;
        writeln!(f, "Session: {}", self.session)?;
        writeln!(f, "Players:")?;
        for (name, player) in &self.players {
            let role = player.role.map_or("Unassigned", Role::as_str);
            let status = if player.alive { "alive" } else { "dead" };
            writeln!(f, "{name}: {role}, {status}")?;
        }
        Ok(())
    }
}
