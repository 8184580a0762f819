use std::time::Duration;

use kinit_auth::Locale;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL; request paths are appended to it.
    pub base_url: String,
    pub timeout: Duration,
    /// Quiet period before a keyword search is sent.
    pub search_debounce: Duration,
    pub locale: Locale,
    pub landing_path: String,
    pub login_path: String,
    pub forbidden_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            locale: Locale::default(),
            landing_path: "/dashboard/workplace".to_string(),
            login_path: "/login".to_string(),
            forbidden_path: "/403".to_string(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    ///
    /// - `KINIT_API_BASE_URL`
    /// - `KINIT_API_TIMEOUT_MS`
    /// - `KINIT_SEARCH_DEBOUNCE_MS`
    /// - `KINIT_LOCALE` (`zh-CN`, `en-US`)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("KINIT_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(timeout) = millis(&lookup, "KINIT_API_TIMEOUT_MS") {
            config.timeout = timeout;
        }
        if let Some(debounce) = millis(&lookup, "KINIT_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = debounce;
        }
        if let Some(tag) = lookup("KINIT_LOCALE") {
            match Locale::from_tag(&tag) {
                Some(locale) => config.locale = locale,
                None => tracing::warn!(value = %tag, "unknown KINIT_LOCALE; using default"),
            }
        }

        config
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(key, value = %raw, "invalid duration; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        assert_eq!(ClientConfig::from_lookup(lookup(&[])), ClientConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KINIT_API_BASE_URL", "https://admin.example.com/api/"),
            ("KINIT_API_TIMEOUT_MS", "2500"),
            ("KINIT_SEARCH_DEBOUNCE_MS", "150"),
            ("KINIT_LOCALE", "en-US"),
        ]));

        assert_eq!(config.base_url, "https://admin.example.com/api");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.locale, Locale::EnUs);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("KINIT_API_TIMEOUT_MS", "soon"),
            ("KINIT_LOCALE", "klingon"),
        ]));

        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.locale, Locale::ZhCn);
    }
}
