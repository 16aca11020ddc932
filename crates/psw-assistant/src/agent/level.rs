//! Resource levels the budgeting agent staffs with

use std::fmt;
use std::str::FromStr;

use psw_models::{ReferenceData, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ResourceLevel {
    Partner,
    #[serde(rename = "Senior Manager")]
    SeniorManager,
    Manager,
    Senior,
    #[default]
    Staff,
    Associate,
}

impl ResourceLevel {
    pub const ALL: [ResourceLevel; 6] = [
        ResourceLevel::Partner,
        ResourceLevel::SeniorManager,
        ResourceLevel::Manager,
        ResourceLevel::Senior,
        ResourceLevel::Staff,
        ResourceLevel::Associate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Partner => "Partner",
            Self::SeniorManager => "Senior Manager",
            Self::Manager => "Manager",
            Self::Senior => "Senior",
            Self::Staff => "Staff",
            Self::Associate => "Associate",
        }
    }

    /// Name of the rate-card role this level bills at
    ///
    /// Associates have no role of their own and use Staff rates.
    pub fn role_name(&self) -> &'static str {
        match self {
            Self::Associate => "Staff",
            other => other.as_str(),
        }
    }

    pub fn role<'a>(&self, reference: &'a ReferenceData) -> Option<&'a Role> {
        reference.role_by_name(self.role_name())
    }
}

impl fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(&['-', '_'][..], " ");
        ResourceLevel::ALL
            .into_iter()
            .find(|level| level.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown resource level '{}' (expected one of: {})",
                    s,
                    ResourceLevel::ALL.map(|l| l.as_str()).join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_map_to_roles() {
        let reference = ReferenceData::standard();
        assert_eq!(ResourceLevel::Manager.role(&reference).unwrap().id, "T004");
        assert_eq!(ResourceLevel::SeniorManager.role(&reference).unwrap().id, "T005");
        assert_eq!(ResourceLevel::Associate.role(&reference).unwrap().id, "T007");
        for level in ResourceLevel::ALL {
            assert!(level.role(&reference).is_some(), "{} has no role", level);
        }
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("senior-manager".parse::<ResourceLevel>(), Ok(ResourceLevel::SeniorManager));
        assert_eq!(" Partner ".parse::<ResourceLevel>(), Ok(ResourceLevel::Partner));
        assert!("intern".parse::<ResourceLevel>().is_err());
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&ResourceLevel::SeniorManager).unwrap();
        assert_eq!(json, "\"Senior Manager\"");
    }
}
