use serde::{Deserialize, Serialize};

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration injected by the host page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::from_lookup(read_window_env)
    }

    /// Build from a key lookup. Each setting accepts the upper-case key used
    /// in the `window.ENV` block of `index.html` first, then the lower-case
    /// variant.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str, lower: &str| {
            lookup(upper)
                .or_else(|| lookup(lower))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let supabase_url = get("SUPABASE_URL", "supabase_url")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SUPABASE_URL.to_string());

        Self {
            supabase_url,
            supabase_anon_key: get("SUPABASE_ANON_KEY", "supabase_anon_key").unwrap_or_default(),
            log_level: get("LOG_LEVEL", "log_level")
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.supabase_url, table)
    }

    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.supabase_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.supabase_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.supabase_url.clone()
        };

        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_base,
            urlencoding::encode(&self.supabase_anon_key)
        )
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_window_env(key: &str) -> Option<String> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }
    js_sys::Reflect::get(&env, &key.into()).ok()?.as_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_env_missing() {
        let c = EnvConfig::from_lookup(|_| None);
        assert_eq!(c.supabase_url, "http://localhost:54321");
        assert_eq!(c.supabase_anon_key, "");
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn test_upper_case_key_wins_over_lower_case() {
        let c = EnvConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://a.supabase.co"),
            ("supabase_url", "https://b.supabase.co"),
            ("supabase_anon_key", "anon"),
            ("LOG_LEVEL", "debug"),
        ]));
        assert_eq!(c.supabase_url, "https://a.supabase.co");
        assert_eq!(c.supabase_anon_key, "anon");
        assert_eq!(c.log_level, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let c = EnvConfig::from_lookup(lookup_from(&[("SUPABASE_URL", "  "), ("LOG_LEVEL", "")]));
        assert_eq!(c.supabase_url, "http://localhost:54321");
        assert_eq!(c.log_level, "info");
    }

    #[test]
    fn test_rest_url_trims_trailing_slash() {
        let c = EnvConfig::from_lookup(lookup_from(&[("SUPABASE_URL", "https://p.supabase.co/")]));
        assert_eq!(c.rest_url("note"), "https://p.supabase.co/rest/v1/note");
    }

    #[test]
    fn test_realtime_url_switches_scheme_and_encodes_key() {
        let c = EnvConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://p.supabase.co"),
            ("SUPABASE_ANON_KEY", "a+b/c"),
        ]));
        assert_eq!(
            c.realtime_url(),
            "wss://p.supabase.co/realtime/v1/websocket?apikey=a%2Bb%2Fc&vsn=1.0.0"
        );

        let local = EnvConfig::from_lookup(|_| None);
        assert!(local.realtime_url().starts_with("ws://localhost:54321/realtime/v1/websocket"));
    }
}
