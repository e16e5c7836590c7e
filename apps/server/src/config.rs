/// Server configuration, read from the environment.
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Path to the portfolio configuration document
    pub portfolio_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("FOLIO_LISTEN_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            portfolio_path: std::env::var("FOLIO_PORTFOLIO_PATH")
                .unwrap_or_else(|_| "portfolio.json".to_string()),
        }
    }
}
