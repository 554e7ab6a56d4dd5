// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TailError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TailError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.interval_secs == 0 {
        return Err(TailError::ConfigError(
            "[watch].interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.watch.chunk_size == 0 {
        return Err(TailError::ConfigError(
            "[watch].chunk_size must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(path) = &cfg.watch.path {
        if path.as_os_str().is_empty() {
            return Err(TailError::ConfigError(
                "[watch].path must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::WatchSection;
    use crate::errors::ErrorKind;
    use crate::types::WatchMode;

    #[test]
    fn defaults_are_valid() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.mode(), WatchMode::Push);
        assert_eq!(cfg.interval().as_secs(), 1);
        assert_eq!(cfg.chunk_size(), 32 * 1024);
        assert!(cfg.from_start());
        assert!(cfg.path().is_none());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let raw = RawConfigFile {
            watch: WatchSection {
                interval_secs: 0,
                ..WatchSection::default()
            },
        };
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let raw = RawConfigFile {
            watch: WatchSection {
                chunk_size: 0,
                ..WatchSection::default()
            },
        };
        let err = ConfigFile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }
}
