use clap::ValueEnum;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level, mapped onto a [`log`] level filter.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Debug,
    Error,
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // lowercase, same spelling as RUST_LOG directives
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Verbosity;
    use log::LevelFilter;

    #[test]
    fn display_lowercase() {
        assert_eq!("debug", Verbosity::Debug.to_string());
        assert_eq!("info", Verbosity::default().to_string());
    }

    #[test]
    fn level_filter() {
        assert_eq!(LevelFilter::Warn, LevelFilter::from(Verbosity::Warn));
        assert_eq!(LevelFilter::Info, LevelFilter::from(Verbosity::default()));
    }
}
