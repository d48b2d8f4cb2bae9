//! Name matching policies for the uniqueness check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How a submitted name is compared against stored names.
///
/// Both modes are case-sensitive. `Containment` treats any stored name that
/// contains the candidate as a clash, so "Art" collides with "Arto Hellas".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatch {
    /// Stored name contains the candidate.
    #[default]
    Containment,
    /// Stored name equals the candidate.
    Exact,
}

impl NameMatch {
    /// Returns `true` if `candidate` clashes with `stored` under this policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use phonebook_core::NameMatch;
    ///
    /// assert!(NameMatch::Containment.matches("Arto Hellas", "Art"));
    /// assert!(!NameMatch::Exact.matches("Arto Hellas", "Art"));
    /// ```
    pub fn matches(self, stored: &str, candidate: &str) -> bool {
        match self {
            NameMatch::Containment => stored.contains(candidate),
            NameMatch::Exact => stored == candidate,
        }
    }
}

impl fmt::Display for NameMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMatch::Containment => write!(f, "containment"),
            NameMatch::Exact => write!(f, "exact"),
        }
    }
}

impl FromStr for NameMatch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "containment" | "contains" => Ok(NameMatch::Containment),
            "exact" => Ok(NameMatch::Exact),
            other => Err(Error::validation(format!(
                "unknown name match policy '{other}' (expected 'containment' or 'exact')"
            ))),
        }
    }
}
