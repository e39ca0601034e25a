/// Upper bound for worker threads when sizing the pool automatically
pub const MAX_AUTO_THREADS: usize = 32;

/// Upper bound for an explicit worker thread count read from the environment
pub const MAX_THREADS: usize = 128;

/// Default number of scale attempts per well
pub const DEFAULT_SCALE_ATTEMPTS: usize = 3;

fn parse_usize(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_bool_u8(value: Option<String>, default: bool) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Runtime settings for a [`crate::Decoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Worker threads; 0 sizes the pool from the available parallelism
    pub threads: usize,
    /// Scale attempts per well before giving up
    pub scale_attempts: usize,
    /// Emit a trace event for every decode attempt
    pub log_attempts: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            scale_attempts: DEFAULT_SCALE_ATTEMPTS,
            log_attempts: false,
        }
    }
}

impl DecoderConfig {
    /// Read settings from `TUBESCAN_THREADS`, `TUBESCAN_SCALE_ATTEMPTS` and
    /// `TUBESCAN_DEBUG`, falling back to the defaults for anything unset or
    /// unparsable.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`DecoderConfig::from_env`] with variables resolved by `lookup`
    ///
    /// Threads are capped at [`MAX_THREADS`] and scale attempts kept in `1..=16`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            threads: parse_usize(lookup("TUBESCAN_THREADS"), defaults.threads).min(MAX_THREADS),
            scale_attempts: parse_usize(lookup("TUBESCAN_SCALE_ATTEMPTS"), defaults.scale_attempts)
                .clamp(1, 16),
            log_attempts: parse_bool_u8(lookup("TUBESCAN_DEBUG"), defaults.log_attempts),
        }
    }

    /// Set the worker thread count
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the number of scale attempts per well
    pub fn with_scale_attempts(mut self, attempts: usize) -> Self {
        self.scale_attempts = attempts.max(1);
        self
    }

    /// Enable or disable per-attempt tracing
    pub fn with_log_attempts(mut self, enabled: bool) -> Self {
        self.log_attempts = enabled;
        self
    }

    /// Thread count the pool will actually use
    pub fn resolved_threads(&self) -> usize {
        if self.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .clamp(1, MAX_AUTO_THREADS)
        } else {
            self.threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.threads, 0);
        assert_eq!(config.scale_attempts, DEFAULT_SCALE_ATTEMPTS);
        assert!(!config.log_attempts);
    }

    #[test]
    fn test_resolved_threads() {
        let auto = DecoderConfig::default().resolved_threads();
        assert!((1..=MAX_AUTO_THREADS).contains(&auto));
        assert_eq!(DecoderConfig::default().with_threads(3).resolved_threads(), 3);
    }

    #[test]
    fn test_scale_attempts_at_least_one() {
        assert_eq!(DecoderConfig::default().with_scale_attempts(0).scale_attempts, 1);
    }

    fn vars(pairs: &[(&str, &str)]) -> DecoderConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DecoderConfig::from_vars(|name| map.get(name).cloned())
    }

    #[test]
    fn test_env_parsing_falls_back() {
        assert_eq!(parse_usize(None, 7), 7);
        assert!(parse_bool_u8(None, true));
        assert_eq!(vars(&[]), DecoderConfig::default());
        let garbage = vars(&[
            ("TUBESCAN_THREADS", "many"),
            ("TUBESCAN_SCALE_ATTEMPTS", "-2"),
            ("TUBESCAN_DEBUG", "yes"),
        ]);
        assert_eq!(garbage, DecoderConfig::default());
    }

    #[test]
    fn test_env_values_are_clamped() {
        let high = vars(&[
            ("TUBESCAN_THREADS", "500"),
            ("TUBESCAN_SCALE_ATTEMPTS", "99"),
            ("TUBESCAN_DEBUG", "1"),
        ]);
        assert_eq!(high.threads, MAX_THREADS);
        assert_eq!(high.scale_attempts, 16);
        assert!(high.log_attempts);

        let low = vars(&[("TUBESCAN_SCALE_ATTEMPTS", "0"), ("TUBESCAN_DEBUG", "0")]);
        assert_eq!(low.scale_attempts, 1);
        assert!(!low.log_attempts);
    }

    #[test]
    fn test_env_values_are_trimmed() {
        let config = vars(&[("TUBESCAN_THREADS", " 4 "), ("TUBESCAN_SCALE_ATTEMPTS", "5\n")]);
        assert_eq!(config.threads, 4);
        assert_eq!(config.scale_attempts, 5);
    }
}
