//! Composite drill-down keys

use crate::error::{DrillDownError, DrillDownResult};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// `"{dimension}:{group}"` key, e.g. `vendor:ACME CORP`
///
/// The dimension may not contain `:`; the group may.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrillKey {
    dimension: String,
    group: String,
}

impl DrillKey {
    /// Create key
    ///
    /// # Errors
    /// `DrillDownError::InvalidKey` if the dimension is empty or contains `:`
    pub fn new(dimension: impl Into<String>, group: impl Into<String>) -> DrillDownResult<Self> {
        let dimension = dimension.into();
        let group = group.into();
        if dimension.is_empty() {
            return Err(DrillDownError::invalid_key(
                format!("{dimension}:{group}"),
                "empty dimension",
            ));
        }
        if dimension.contains(':') {
            return Err(DrillDownError::invalid_key(
                format!("{dimension}:{group}"),
                "dimension contains ':'",
            ));
        }
        Ok(Self { dimension, group })
    }

    /// Dimension part
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Group value part
    #[inline]
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl Display for DrillKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dimension, self.group)
    }
}

impl FromStr for DrillKey {
    type Err = DrillDownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dimension, group) = s
            .split_once(':')
            .ok_or_else(|| DrillDownError::invalid_key(s, "missing ':' separator"))?;
        Self::new(dimension, group)
    }
}
