//! Shared traits, identifiers, and the company scope selector.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel author recorded when no user is logged in.
pub const SYSTEM_USER: &str = "system";

/// Exposes a stable identifier for entities stored in the snapshot.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh identifier for newly created records.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Narrows which company's records participate in a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompanyScope {
    #[default]
    All,
    Company(String),
}

impl CompanyScope {
    pub fn company(id: impl Into<String>) -> Self {
        CompanyScope::Company(id.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CompanyScope::All)
    }

    /// Returns `true` when a record owned by `company_id` is inside the scope.
    pub fn includes(&self, company_id: &str) -> bool {
        match self {
            CompanyScope::All => true,
            CompanyScope::Company(id) => id == company_id,
        }
    }

    pub fn company_id(&self) -> Option<&str> {
        match self {
            CompanyScope::All => None,
            CompanyScope::Company(id) => Some(id.as_str()),
        }
    }
}

impl FromStr for CompanyScope {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(CompanyScope::All)
        } else {
            Ok(CompanyScope::Company(trimmed.to_string()))
        }
    }
}

impl fmt::Display for CompanyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompanyScope::All => f.write_str("all"),
            CompanyScope::Company(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_all_case_insensitively() {
        assert_eq!("ALL".parse::<CompanyScope>().unwrap(), CompanyScope::All);
        assert_eq!("".parse::<CompanyScope>().unwrap(), CompanyScope::All);
        assert_eq!(
            " 2 ".parse::<CompanyScope>().unwrap(),
            CompanyScope::company("2")
        );
    }

    #[test]
    fn scope_includes_only_matching_company() {
        let scope = CompanyScope::company("1");
        assert!(scope.includes("1"));
        assert!(!scope.includes("2"));
        assert!(CompanyScope::All.includes("2"));
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
