use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Absent → in-memory stores (data is lost on restart).
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    /// Base URL of the balance aggregator backend.
    pub finance_api_url: Option<String>,
    pub finance_timeout_secs: u64,

    /// Default trailing window, in months, fed to analytics.
    pub analytics_months_back: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: non_empty_var("DATABASE_URL"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|extra| split_origins(&extra))
                .unwrap_or_default(),

            finance_api_url: non_empty_var("FINANCE_API_URL"),
            finance_timeout_secs: env::var("FINANCE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),

            analytics_months_back: env::var("ANALYTICS_MONTHS_BACK")
                .unwrap_or_else(|_| "3".into())
                .parse()
                .unwrap_or(3),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            finance_api_url: None,
            finance_timeout_secs: 30,
            analytics_months_back: 3,
        }
    }
}
