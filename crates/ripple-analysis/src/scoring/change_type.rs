//! Change classification and its scoring weight.

use std::str::FromStr;

use ripple_core::errors::DependencyError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Breaking,
    Enhancement,
    Bugfix,
    Refactor,
}

impl ChangeType {
    pub fn weight(&self) -> f64 {
        match self {
            Self::Breaking => 1.0,
            Self::Enhancement => 0.6,
            Self::Bugfix => 0.4,
            Self::Refactor => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::Enhancement => "enhancement",
            Self::Bugfix => "bugfix",
            Self::Refactor => "refactor",
        }
    }

    pub fn is_breaking(&self) -> bool {
        matches!(self, Self::Breaking)
    }
}

impl FromStr for ChangeType {
    type Err = DependencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breaking" => Ok(Self::Breaking),
            "enhancement" => Ok(Self::Enhancement),
            "bugfix" => Ok(Self::Bugfix),
            "refactor" => Ok(Self::Refactor),
            _ => Err(DependencyError::UnknownChangeType {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Breaking".parse::<ChangeType>().unwrap(), ChangeType::Breaking);
        assert_eq!(" bugfix ".parse::<ChangeType>().unwrap(), ChangeType::Bugfix);
    }

    #[test]
    fn unknown_change_type_is_an_error() {
        let err = "cosmetic".parse::<ChangeType>().unwrap_err();
        assert!(matches!(err, DependencyError::UnknownChangeType { .. }));
    }

    #[test]
    fn weights_are_ordered_by_severity() {
        assert!(ChangeType::Breaking.weight() > ChangeType::Enhancement.weight());
        assert!(ChangeType::Enhancement.weight() > ChangeType::Bugfix.weight());
        assert!(ChangeType::Bugfix.weight() > ChangeType::Refactor.weight());
    }
}
