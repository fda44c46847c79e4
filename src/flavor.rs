use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EesError;

/// Neutrino species that scatter elastically on electrons.
///
/// The string forms (`"nue"`, `"nuebar"`, ...) match the names used by the
/// rate-generation tool and in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Nue,
    Nuebar,
    Numu,
    Numubar,
    Nutau,
    Nutaubar,
}

impl Flavor {
    /// All six flavors in table order
    pub const ALL: [Flavor; 6] = [
        Flavor::Nue,
        Flavor::Nuebar,
        Flavor::Numu,
        Flavor::Numubar,
        Flavor::Nutau,
        Flavor::Nutaubar,
    ];

    /// Position of this flavor in [`Flavor::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Flavor::Nue => 0,
            Flavor::Nuebar => 1,
            Flavor::Numu => 2,
            Flavor::Numubar => 3,
            Flavor::Nutau => 4,
            Flavor::Nutaubar => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Nue => "nue",
            Flavor::Nuebar => "nuebar",
            Flavor::Numu => "numu",
            Flavor::Numubar => "numubar",
            Flavor::Nutau => "nutau",
            Flavor::Nutaubar => "nutaubar",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = EesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flavor::ALL
            .iter()
            .copied()
            .find(|flavor| flavor.as_str() == s)
            .ok_or_else(|| EesError::InvalidFlavor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for flavor in Flavor::ALL {
            assert_eq!(flavor.as_str().parse::<Flavor>().unwrap(), flavor);
            assert_eq!(flavor.to_string(), flavor.as_str());
        }
    }

    #[test]
    fn test_unknown_flavor_rejected() {
        let err = "nuet".parse::<Flavor>().unwrap_err();
        assert!(matches!(err, EesError::InvalidFlavor(ref name) if name == "nuet"));
        assert!("NUE".parse::<Flavor>().is_err());
        assert!("".parse::<Flavor>().is_err());
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, flavor) in Flavor::ALL.iter().enumerate() {
            assert_eq!(flavor.index(), i);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Flavor::Numubar).unwrap();
        assert_eq!(json, "\"numubar\"");
        let back: Flavor = serde_json::from_str("\"nutau\"").unwrap();
        assert_eq!(back, Flavor::Nutau);
    }
}
