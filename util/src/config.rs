//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. Only the server
//! binary reads it; library components receive the typed sub-configs
//! ([`LlmSettings`], [`PlagiarismSettings`]) through their constructors.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

/// Settings for the external generative-model endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// Upper bound for a single generate call.
    pub timeout: Duration,
    /// Maximum number of comparison calls in flight for one grading request.
    pub max_concurrency: usize,
    /// Total attempts per call, `1` disables retrying.
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
            timeout: Duration::from_secs(30),
            max_concurrency: 4,
            max_attempts: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Settings for the plagiarism detector.
#[derive(Debug, Clone, PartialEq)]
pub struct PlagiarismSettings {
    /// Jaccard similarity strictly above this value flags a pair.
    pub threshold: f64,
}

impl Default for PlagiarismSettings {
    fn default() -> Self {
        Self { threshold: 0.8 }
    }
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub submissions_file: Option<String>,
    pub llm: LlmSettings,
    pub plagiarism: PlagiarismSettings,
    /// Values from the environment that were ignored in favour of their defaults.
    pub malformed: Vec<MalformedValue>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// An environment value that could not be used and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedValue {
    pub key: String,
    pub value: String,
}

pub const DEFAULT_LOG_LEVEL: &str = "api=info,marker=info,plagiarism=info";

/// Reads typed values from the environment and remembers the ones it had to reject.
///
/// The configuration is loaded before any tracing subscriber exists, so rejected values
/// are collected here and reported later by [`AppConfig::report_malformed`].
#[derive(Default)]
struct EnvReader {
    malformed: Vec<MalformedValue>,
}

impl EnvReader {
    /// Parses `key`, falling back to `default` when unset or malformed.
    fn parsed_or<T: FromStr>(&mut self, key: &str, default: T) -> T {
        self.valid_or(key, default, |_| true)
    }

    /// Like [`Self::parsed_or`], but a value rejected by `accept` also counts as malformed.
    fn valid_or<T: FromStr>(&mut self, key: &str, default: T, accept: impl Fn(&T) -> bool) -> T {
        let Ok(raw) = env::var(key) else {
            return default;
        };
        match raw.trim().parse::<T>() {
            Ok(value) if accept(&value) => value,
            _ => {
                self.malformed.push(MalformedValue {
                    key: key.to_string(),
                    value: raw,
                });
                default
            }
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every field has a default, so this never fails.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let llm_defaults = LlmSettings::default();
        let plagiarism_defaults = PlagiarismSettings::default();
        let mut reader = EnvReader::default();

        let port = reader.parsed_or("PORT", 3000);
        let llm = LlmSettings {
            base_url: env::var("LLM_BASE_URL").unwrap_or(llm_defaults.base_url),
            model: env::var("LLM_MODEL").unwrap_or(llm_defaults.model),
            timeout: Duration::from_secs(reader.valid_or(
                "LLM_TIMEOUT_SECS",
                llm_defaults.timeout.as_secs(),
                |secs| *secs > 0,
            )),
            max_concurrency: reader.valid_or(
                "LLM_MAX_CONCURRENCY",
                llm_defaults.max_concurrency,
                |n| *n > 0,
            ),
            max_attempts: reader.valid_or("LLM_MAX_ATTEMPTS", llm_defaults.max_attempts, |n| {
                *n > 0
            }),
            retry_backoff: Duration::from_millis(reader.parsed_or("LLM_RETRY_BACKOFF_MS", 500)),
        };
        let plagiarism = PlagiarismSettings {
            threshold: reader.parsed_or("PLAGIARISM_THRESHOLD", plagiarism_defaults.threshold),
        };

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "assessment-core".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port,
            submissions_file: env::var("SUBMISSIONS_FILE").ok().filter(|s| !s.is_empty()),
            llm,
            plagiarism,
            malformed: reader.malformed,
        }
    }

    /// Emits one warning per ignored environment value.
    ///
    /// Call once a subscriber is installed.
    pub fn report_malformed(&self) {
        for entry in &self.malformed {
            tracing::warn!(
                key = %entry.key,
                value = %entry.value,
                "ignoring malformed configuration value"
            );
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_submissions_file(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.submissions_file = value);
    }

    pub fn set_llm(value: LlmSettings) {
        AppConfig::set_field(|cfg| cfg.llm = value);
    }

    pub fn set_plagiarism_threshold(value: f64) {
        AppConfig::set_field(|cfg| cfg.plagiarism.threshold = value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn clear_vars() {
        for key in [
            "PORT",
            "LLM_BASE_URL",
            "LLM_TIMEOUT_SECS",
            "LLM_MAX_CONCURRENCY",
            "LLM_MAX_ATTEMPTS",
            "LLM_RETRY_BACKOFF_MS",
            "LOG_LEVEL",
            "PLAGIARISM_THRESHOLD",
            "SUBMISSIONS_FILE",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear_vars();
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.llm, LlmSettings::default());
        assert_eq!(cfg.plagiarism.threshold, 0.8);
        assert!(cfg.submissions_file.is_none());
        assert_eq!(cfg.log_level, DEFAULT_LOG_LEVEL);
        assert!(cfg.malformed.is_empty());
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear_vars();
        unsafe {
            env::set_var("LLM_BASE_URL", "http://llm.internal:8080");
            env::set_var("LLM_TIMEOUT_SECS", "5");
            env::set_var("LLM_MAX_CONCURRENCY", "2");
            env::set_var("PLAGIARISM_THRESHOLD", "0.65");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.llm.base_url, "http://llm.internal:8080");
        assert_eq!(cfg.llm.timeout, Duration::from_secs(5));
        assert_eq!(cfg.llm.max_concurrency, 2);
        assert_eq!(cfg.plagiarism.threshold, 0.65);
        clear_vars();
    }

    #[test]
    #[serial]
    fn malformed_values_fall_back() {
        clear_vars();
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("LLM_MAX_CONCURRENCY", "0");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.llm.max_concurrency, 4);
        let keys: Vec<&str> = cfg.malformed.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["PORT", "LLM_MAX_CONCURRENCY"]);
        assert_eq!(cfg.malformed[0].value, "not-a-port");
        clear_vars();
    }

    #[test]
    #[serial]
    fn zero_timeout_falls_back_to_default() {
        clear_vars();
        unsafe { env::set_var("LLM_TIMEOUT_SECS", "0") };
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.llm.timeout, Duration::from_secs(30));
        assert_eq!(cfg.malformed.len(), 1);
        assert_eq!(cfg.malformed[0].key, "LLM_TIMEOUT_SECS");
        clear_vars();
    }

    #[test]
    #[serial]
    fn malformed_values_are_reported_once_a_subscriber_exists() {
        clear_vars();
        unsafe { env::set_var("PORT", "eighty") };
        let cfg = AppConfig::from_env();
        clear_vars();

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || cfg.report_malformed());

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("PORT"), "{output}");
        assert!(output.contains("eighty"), "{output}");
    }
}
