mod config;
mod id;
mod rooms;
mod sessions;
mod util;

pub use config::*;
pub use id::*;
pub use rooms::*;
pub use sessions::*;

/// The watchparty collab system, facilitating room management and session coordination.
pub struct Collab {
    pub config: Config,
    pub sessions: SessionCoordinator,
}

impl Collab {
    pub fn new(config: Config) -> Self {
        let sessions = SessionCoordinator::new(&config);

        Self { config, sessions }
    }
}

impl Default for Collab {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
