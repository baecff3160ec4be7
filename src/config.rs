use anyhow::Context;

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to the first
    /// command-line argument for the port and then to the default.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://chattqw.db".to_string());

        let port = match std::env::var("PORT").ok().or_else(|| std::env::args().nth(1)) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        Ok(AppConfig { database_url, port })
    }
}
