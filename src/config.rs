use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the JSON catalog export
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Directory holding one watchlist file per user
    #[serde(default = "default_watchlist_dir")]
    pub watchlist_dir: String,

    /// User whose watchlist is restored at startup
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> String {
    "./assets/movies.json".to_string()
}

fn default_watchlist_dir() -> String {
    "./watchlists".to_string()
}

fn default_user() -> String {
    "JohnDoe".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
