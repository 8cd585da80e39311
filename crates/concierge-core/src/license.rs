//! License report types returned by the license-status endpoint
//!
//! Reports arrive as `{ full_name, licenses: { <discipline>: [record, ...] } }`.
//! Display order of disciplines is fixed: referee, coach, safety, then any
//! discipline the client does not know about.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Validity of a single license
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LicenseStatus {
    /// Valid and not close to expiring
    #[default]
    Active,
    /// Expires within the backend's warning window
    ExpiringSoon,
    /// Expires within the backend's critical window
    Critical,
    /// No longer valid
    Expired,
}

/// Badge color for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl LicenseStatus {
    /// Parse a wire value. Anything unrecognized is shown as active.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "expiring_soon" => Self::ExpiringSoon,
            "critical" => Self::Critical,
            "expired" => Self::Expired,
            _ => Self::Active,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ExpiringSoon => "expiring_soon",
            Self::Critical => "critical",
            Self::Expired => "expired",
        }
    }

    /// Human-readable badge text
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Critical => "Expires Very Soon!",
            Self::Expired => "Expired",
        }
    }

    pub fn badge_color(&self) -> BadgeColor {
        match self {
            Self::Active => BadgeColor::Green,
            Self::ExpiringSoon => BadgeColor::Yellow,
            Self::Critical => BadgeColor::Orange,
            Self::Expired => BadgeColor::Red,
        }
    }

    /// Critical badges are drawn with extra weight
    pub fn is_emphasized(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl Serialize for LicenseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for LicenseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::from_wire).unwrap_or_default())
    }
}

/// Licensing category records are grouped under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Discipline {
    Referee,
    Coach,
    Safety,
    Other(String),
}

impl Discipline {
    pub fn from_key(key: &str) -> Self {
        match key {
            "referee" => Self::Referee,
            "coach" => Self::Coach,
            "safety" => Self::Safety,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Referee => "referee",
            Self::Coach => "coach",
            Self::Safety => "safety",
            Self::Other(key) => key,
        }
    }

    /// Sort rank; unknown disciplines come after the known ones
    pub fn priority(&self) -> u8 {
        match self {
            Self::Referee => 0,
            Self::Coach => 1,
            Self::Safety => 2,
            Self::Other(_) => 3,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Referee => "Referee",
            Self::Coach => "Coach",
            Self::Safety => "Safety & Compliance",
            Self::Other(key) => key,
        }
    }
}

/// One license held by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub name: String,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default)]
    pub status: LicenseStatus,
}

/// License-status response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseReport {
    pub full_name: String,

    #[serde(default)]
    pub licenses: BTreeMap<String, Vec<LicenseRecord>>,
}

impl LicenseReport {
    /// Disciplines in display order with their records
    pub fn grouped(&self) -> Vec<(Discipline, &[LicenseRecord])> {
        let mut groups: Vec<(Discipline, &[LicenseRecord])> = self
            .licenses
            .iter()
            .map(|(key, records)| (Discipline::from_key(key), records.as_slice()))
            .collect();

        // BTreeMap iteration already orders unknown keys by name; the sort is stable
        groups.sort_by_key(|(discipline, _)| discipline.priority());
        groups
    }

    /// True when the user holds no licenses at all
    pub fn is_empty(&self) -> bool {
        self.licenses.values().all(|records| records.is_empty())
    }

    pub fn license_count(&self) -> usize {
        self.licenses.values().map(Vec::len).sum()
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
