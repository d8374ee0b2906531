//! Sensitive-data categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// A category of personal data the privacy filter knows how to detect.
///
/// Declaration order is the fixed priority used to break ties between
/// overlapping matches of different categories: earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    /// Dutch citizen service number (Burgerservicenummer)
    Bsn,
    Phone,
    Email,
    /// Postal code and street address
    Address,
    /// IBANs and currency amounts
    Financial,
    Names,
    Dates,
    HealthData,
}

impl CategoryId {
    /// Every category, in priority order
    pub const ALL: [CategoryId; 8] = [
        CategoryId::Bsn,
        CategoryId::Phone,
        CategoryId::Email,
        CategoryId::Address,
        CategoryId::Financial,
        CategoryId::Names,
        CategoryId::Dates,
        CategoryId::HealthData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Bsn => "bsn",
            CategoryId::Phone => "phone",
            CategoryId::Email => "email",
            CategoryId::Address => "address",
            CategoryId::Financial => "financial",
            CategoryId::Names => "names",
            CategoryId::Dates => "dates",
            CategoryId::HealthData => "health_data",
        }
    }

    /// Low-precision heuristic categories are opt-in.
    pub fn is_default_enabled(&self) -> bool {
        !matches!(
            self,
            CategoryId::Names | CategoryId::Dates | CategoryId::HealthData
        )
    }

    /// Position in the priority order (0 is highest)
    pub fn priority(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CategoryId::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| PolicyError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_follows_declaration_order() {
        assert!(CategoryId::Bsn < CategoryId::Phone);
        assert!(CategoryId::Phone < CategoryId::Email);
        assert!(CategoryId::Email < CategoryId::Address);
        assert!(CategoryId::Address < CategoryId::Financial);
        assert!(CategoryId::Financial < CategoryId::Names);
        assert_eq!(CategoryId::Bsn.priority(), 0);
        assert_eq!(CategoryId::HealthData.priority(), 7);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("bsn".parse::<CategoryId>().unwrap(), CategoryId::Bsn);
        assert_eq!(
            "Health-Data".parse::<CategoryId>().unwrap(),
            CategoryId::HealthData
        );
        assert!("iban".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CategoryId::HealthData).unwrap();
        assert_eq!(json, "\"health_data\"");
        for category in CategoryId::ALL {
            let parsed: CategoryId =
                serde_json::from_str(&format!("\"{}\"", category.as_str())).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_default_enabled() {
        let enabled: Vec<_> = CategoryId::ALL
            .into_iter()
            .filter(|c| c.is_default_enabled())
            .collect();
        assert_eq!(
            enabled,
            vec![
                CategoryId::Bsn,
                CategoryId::Phone,
                CategoryId::Email,
                CategoryId::Address,
                CategoryId::Financial
            ]
        );
    }
}
