use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::logger::error::LoggerError;

/// A filter directive that is known to parse, e.g. `info` or `prac_core=debug,info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerLevel(String);

impl LoggerLevel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn filter(&self) -> Result<EnvFilter, LoggerError> {
        EnvFilter::try_new(&self.0).map_err(|_| LoggerError::InvalidLogLevel(self.0.clone()))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        LoggerLevel("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = LoggerLevel(s.trim().to_ascii_lowercase());
        if level.0.is_empty() {
            return Err(LoggerError::InvalidLogLevel(s.to_string()));
        }
        level.filter()?;
        Ok(level)
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        assert_eq!("WARN".parse::<LoggerLevel>().unwrap().as_str(), "warn");
        assert!("prac_core=debug,info".parse::<LoggerLevel>().is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "".parse::<LoggerLevel>(),
            Err(LoggerError::InvalidLogLevel(_))
        ));
        assert!("prac_core=loud".parse::<LoggerLevel>().is_err());
    }
}
