use std::env;
use std::time::Duration;

use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_WEB_HOST: &str = "github.com";

/// TCP connection establishment timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Per-request timeout covering DNS + connect + response body.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Maximum concurrent requests against the API from one `Source`.
const DEFAULT_MAX_IN_FLIGHT: usize = 8;
/// Maximum redirect hops before aborting.
pub const MAX_REDIRECTS: usize = 5;

#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Explicit client configuration, passed into constructors.
///
/// Environment variables read by [`Config::from_env`]:
/// - `GITHUB_TOKEN` / `GH_TOKEN`: selects the authenticated path (optional)
/// - `GITHUB_API_URL`: API base URL (default `https://api.github.com`)
/// - `REPO_PROBE_TIMEOUT_SECS`: per-request timeout
/// - `REPO_PROBE_MAX_IN_FLIGHT`: concurrent request cap
#[derive(Clone, Debug)]
pub struct Config {
    pub token: Option<Token>,
    pub api_base: String,
    pub web_host: String,
    pub request_timeout: Duration,
    pub max_in_flight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            web_host: DEFAULT_WEB_HOST.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        match resolve_token() {
            Some(token) => {
                debug!("GitHub token configured");
                config = config.with_token(token);
            }
            None => warn!(
                "No GitHub token found. Using unauthenticated API (60 req/hour). Set GITHUB_TOKEN for higher limits."
            ),
        }

        if let Some(api_base) = non_empty_var("GITHUB_API_URL") {
            config = config.with_api_base(&api_base);
        }

        if let Some(secs) = non_empty_var("REPO_PROBE_TIMEOUT_SECS")
            .and_then(|v| parse_or_warn::<u64>("REPO_PROBE_TIMEOUT_SECS", &v))
            .filter(|&secs| secs > 0)
        {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(n) = non_empty_var("REPO_PROBE_MAX_IN_FLIGHT")
            .and_then(|v| parse_or_warn::<usize>("REPO_PROBE_MAX_IN_FLIGHT", &v))
            .filter(|&n| n > 0)
        {
            config.max_in_flight = n;
        }

        config.without_insecure_token()
    }

    /// Drop the token when the API base is not HTTPS, falling back to the public path.
    fn without_insecure_token(mut self) -> Self {
        if self.token.is_some() && !self.api_base.starts_with("https://") {
            warn!(
                api = %self.api_base,
                "GITHUB_API_URL is not HTTPS; ignoring token and using unauthenticated access"
            );
            self.token = None;
        }
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Token::new(token));
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    value
        .parse()
        .inspect_err(|_| warn!(var = name, value, "ignoring unparseable setting"))
        .ok()
}

fn resolve_token() -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .iter()
        .find_map(|var| non_empty_var(var))
}
