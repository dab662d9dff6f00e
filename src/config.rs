//! Runtime Configuration
//!
//! Backend location, resolved once at startup.

/// Backend used when the app is served from a local dev server
pub const LOCAL_API_URL: &str = "http://localhost:8001";
/// Backend used when nothing else is configured
pub const PRODUCTION_API_URL: &str = "https://syedahafsa58-todo-phase2.hf.space";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
}

impl AppConfig {
    /// Resolve from the page location and the build-time `TASKNEST_API_URL`
    pub fn from_env() -> Self {
        let hostname = web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        let api_url = resolve_api_url(&hostname, option_env!("TASKNEST_API_URL"));
        log::info!("API configuration: hostname={:?} api_url={}", hostname, api_url);
        Self { api_url }
    }
}

pub fn resolve_api_url(hostname: &str, configured: Option<&str>) -> String {
    let url = match hostname {
        "localhost" | "127.0.0.1" => LOCAL_API_URL,
        _ => configured.filter(|u| !u.trim().is_empty()).unwrap_or(PRODUCTION_API_URL),
    };
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_wins_over_configured() {
        assert_eq!(resolve_api_url("localhost", Some("https://api.example.com")), LOCAL_API_URL);
        assert_eq!(resolve_api_url("127.0.0.1", None), LOCAL_API_URL);
    }

    #[test]
    fn test_configured_url_trimmed() {
        assert_eq!(
            resolve_api_url("tasks.example.com", Some("https://api.example.com/")),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(resolve_api_url("tasks.example.com", None), PRODUCTION_API_URL);
        assert_eq!(resolve_api_url("tasks.example.com", Some("  ")), PRODUCTION_API_URL);
    }
}
