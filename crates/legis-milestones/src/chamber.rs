//! Originating chamber designation

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Chamber the originating bill was introduced in
///
/// Parsing is lenient: anything other than `assembly` or `senate`
/// (case-insensitive), including a missing value, becomes [`Chamber::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Chamber {
    /// New York State Assembly
    Assembly,
    /// New York State Senate
    Senate,
    /// No chamber known
    #[default]
    Unknown,
}

impl Chamber {
    /// Parse an optional chamber value
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("assembly") => Self::Assembly,
            Some("senate") => Self::Senate,
            _ => Self::Unknown,
        }
    }

    /// Lowercase name, `None` for [`Chamber::Unknown`]
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Assembly => Some("assembly"),
            Self::Senate => Some("senate"),
            Self::Unknown => None,
        }
    }

    /// Whether a chamber is known
    #[inline]
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl FromStr for Chamber {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)))
    }
}

impl From<Option<String>> for Chamber {
    fn from(value: Option<String>) -> Self {
        Self::parse(value.as_deref())
    }
}

impl From<Chamber> for Option<String> {
    fn from(chamber: Chamber) -> Self {
        chamber.as_str().map(str::to_string)
    }
}

impl Display for Chamber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unknown"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_chambers() {
        assert_eq!(Chamber::parse(Some("assembly")), Chamber::Assembly);
        assert_eq!(Chamber::parse(Some(" Senate ")), Chamber::Senate);
    }

    #[test]
    fn malformed_values_are_unknown() {
        assert_eq!(Chamber::parse(None), Chamber::Unknown);
        assert_eq!(Chamber::parse(Some("")), Chamber::Unknown);
        assert_eq!(Chamber::parse(Some("house")), Chamber::Unknown);
    }

    #[test]
    fn serde_roundtrips_through_nullable_string() {
        let c: Chamber = serde_json::from_str("\"SENATE\"").unwrap();
        assert_eq!(c, Chamber::Senate);
        let c: Chamber = serde_json::from_str("null").unwrap();
        assert_eq!(c, Chamber::Unknown);
        assert_eq!(serde_json::to_string(&Chamber::Assembly).unwrap(), "\"assembly\"");
        assert_eq!(serde_json::to_string(&Chamber::Unknown).unwrap(), "null");
    }
}
