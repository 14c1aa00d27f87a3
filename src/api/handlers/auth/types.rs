//! Privilege levels granted by the bootstrap flow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session capability scope for an issued token.
///
/// Admin dominates base: classification checks admin membership first and
/// stops at the first match, so a principal in both groups gets `Admin`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeLevel {
    Base,
    Admin,
}

impl PrivilegeLevel {
    /// Numeric level stored alongside the session row.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Base => 0,
            Self::Admin => 5,
        }
    }
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PrivilegeLevel;

    #[test]
    fn admin_outranks_base() {
        assert!(PrivilegeLevel::Admin > PrivilegeLevel::Base);
        assert!(PrivilegeLevel::Admin.as_i16() > PrivilegeLevel::Base.as_i16());
    }

    #[test]
    fn level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(PrivilegeLevel::Admin).ok(),
            Some(serde_json::json!("admin"))
        );
        assert_eq!(
            serde_json::to_value(PrivilegeLevel::Base).ok(),
            Some(serde_json::json!("base"))
        );
    }

    #[test]
    fn level_displays_lowercase() {
        assert_eq!(PrivilegeLevel::Admin.to_string(), "admin");
        assert_eq!(PrivilegeLevel::Base.to_string(), "base");
    }
}
