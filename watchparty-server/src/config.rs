use std::path::PathBuf;

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 3000;
/// Where the pages of the web client are served from by default.
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory containing `index.html`, `room.html` and their assets
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.into(),
        }
    }
}
