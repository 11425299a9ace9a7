use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Delays that drive a game from one round to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimings {
    /// Wait between the host starting the game and the first round.
    pub host_grace: Duration,
    pub round_duration: Duration,
    pub inter_round_delay: Duration,
}

impl Default for RoundTimings {
    fn default() -> Self {
        Self {
            host_grace: Duration::from_millis(3_000),
            round_duration: Duration::from_millis(30_000),
            inter_round_delay: Duration::from_millis(10_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub words_file: String,
    pub word_length: usize,
    pub timings: RoundTimings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 3000)?,
            words_file: env::var("WORDS_FILE")
                .unwrap_or_else(|_| "./resources/word_list.txt".to_string()),
            word_length: parse_var("WORD_LENGTH", 5)?,
            timings: RoundTimings {
                host_grace: Duration::from_millis(parse_var("HOST_GRACE_MS", 3_000)?),
                round_duration: Duration::from_millis(parse_var("ROUND_DURATION_MS", 30_000)?),
                inter_round_delay: Duration::from_millis(parse_var("INTER_ROUND_DELAY_MS", 10_000)?),
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let timings = RoundTimings::default();
        assert_eq!(timings.host_grace, Duration::from_secs(3));
        assert_eq!(timings.round_duration, Duration::from_secs(30));
        assert_eq!(timings.inter_round_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_parse_var_falls_back_to_default() {
        let value: u64 = parse_var("WORD_ROOMS_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
