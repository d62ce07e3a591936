pub mod chat;
pub mod mafia;
pub mod reaper;
pub mod registry;
pub mod session;

pub use chat::ChatGate;
pub use mafia::MafiaService;
pub use reaper::spawn_reaper;
pub use registry::{SeedSource, SessionRegistry};
pub use session::GameSession;
