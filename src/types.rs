use std::str::FromStr;
use serde::Deserialize;

/// How the watched file is consumed.
///
/// - `Push`: a background task polls on an interval and delivers new bytes
///   over a bounded queue (default behaviour).
/// - `Pull`: the caller drives every check; nothing runs in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    Push,
    Pull,
}

impl Default for WatchMode {
    fn default() -> Self {
        WatchMode::Push
    }
}

impl FromStr for WatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "push" => Ok(WatchMode::Push),
            "pull" => Ok(WatchMode::Pull),
            other => Err(format!(
                "invalid mode: {other} (expected \"push\" or \"pull\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("PUSH".parse::<WatchMode>(), Ok(WatchMode::Push));
        assert_eq!(" pull ".parse::<WatchMode>(), Ok(WatchMode::Pull));
        assert!("inotify".parse::<WatchMode>().is_err());
        assert_eq!(WatchMode::default(), WatchMode::Push);
    }
}
