use std::{fmt};
use std::str::{FromStr};

/// How writes through a [`crate::Token`] key are stored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Concealment {
    /// The slot is hidden from enumeration.
    #[default]
    Hidden,

    /// The slot is an ordinary visible property.
    Visible,
}

impl Concealment {
    /// Whether slots written under this policy are enumerable.
    pub fn visible(self) -> bool { self == Self::Visible }
}

impl FromStr for Concealment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Ok(Self::Hidden),
            "visible" => Ok(Self::Visible),
            other => Err(format!("unknown concealment {:?}, expected \"hidden\" or \"visible\"", other)),
        }
    }
}

impl fmt::Display for Concealment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self { Self::Hidden => "hidden", Self::Visible => "visible" })
    }
}

// ----------------------------------------------------------------------------

/// Settings of a [`crate::Registry`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Applied by `proto` and `constant` writes with a token key.
    pub concealment: Concealment,
}

impl Config {
    /// The environment variable read by [`Config::from_env()`].
    pub const CONCEALMENT_VAR: &'static str = "ILK_CONCEALMENT";

    /// Reads the settings from the environment, falling back to the default
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(Self::CONCEALMENT_VAR) {
            match value.parse() {
                Ok(concealment) => { config.concealment = concealment; },
                Err(msg) => { tracing::warn!(var = Self::CONCEALMENT_VAR, "{}", msg); },
            }
        }
        config
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_concealment() {
        assert_eq!("hidden".parse::<Concealment>(), Ok(Concealment::Hidden));
        assert_eq!(" Visible\n".parse::<Concealment>(), Ok(Concealment::Visible));
        assert!("secret".parse::<Concealment>().is_err());
    }

    #[test]
    fn default_hides() {
        assert_eq!(Config::default().concealment, Concealment::Hidden);
        assert!(!Concealment::Hidden.visible());
    }
}
