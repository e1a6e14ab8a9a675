//! Server configuration loaded from environment variables.

use crate::ack::GeminiConfig;

/// Default HTTP port for `fbd serve`.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (from FEEDBACK_DESK_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    /// Passed as the `verbose` flag on every persistence write
    /// (from FEEDBACK_DESK_VERBOSE_STORAGE).
    pub verbose_storage: bool,
    /// Generation settings (from GEMINI_API_KEY and friends).
    pub gemini: Option<GeminiConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("FEEDBACK_DESK_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .filter(|origins| !origins.is_empty());

        let verbose_storage = std::env::var("FEEDBACK_DESK_VERBOSE_STORAGE")
            .map(|s| parse_flag(&s))
            .unwrap_or(false);

        Self {
            cors_origins,
            verbose_storage,
            gemini: GeminiConfig::from_env(),
        }
    }

    /// Config for local development and tests: permissive CORS, quiet storage, no generation key.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_verbose_storage(mut self, verbose: bool) -> Self {
        self.verbose_storage = verbose;
        self
    }
}

fn parse_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn flag_parsing_accepts_common_truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v} should be truthy");
        }
        for v in ["0", "false", "", "nope"] {
            assert!(!parse_flag(v), "{v} should be falsy");
        }
    }

    #[test]
    fn local_config_has_no_generation_key() {
        let config = ServerConfig::local();
        assert!(config.gemini.is_none());
        assert!(config.cors_origins.is_none());
        assert!(!config.verbose_storage);
    }
}
