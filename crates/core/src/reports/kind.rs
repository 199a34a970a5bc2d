//! Record kinds and the kind selector of a report request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four record collections the engine reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Church accounts: service offerings plus the church's own expenditure.
    Offerings,
    /// Construction project costs and approval fees.
    Construction,
    /// Sunday-school collections.
    SundaySchool,
    /// Generic expenditure ledger.
    Expenditure,
}

impl RecordKind {
    /// Every kind, in report section order.
    pub const ALL: [Self; 4] = [
        Self::Offerings,
        Self::Construction,
        Self::SundaySchool,
        Self::Expenditure,
    ];

    /// Stable identifier used in URLs, filenames, and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offerings => "offerings",
            Self::Construction => "construction",
            Self::SundaySchool => "sunday-school",
            Self::Expenditure => "expenditure",
        }
    }

    /// Heading used for the kind's section in rendered reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Offerings => "Church Accounts",
            Self::Construction => "Construction",
            Self::SundaySchool => "Sunday School",
            Self::Expenditure => "Expenditure",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "offerings" | "church-accounts" | "church_accounts" => Ok(Self::Offerings),
            "construction" | "construction_records" => Ok(Self::Construction),
            "sunday-school" | "sunday_school" | "sundayschool" => Ok(Self::SundaySchool),
            "expenditure" | "expenditures" | "expenditure_records" => Ok(Self::Expenditure),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Which kinds a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindSelector {
    /// A single kind.
    Single(RecordKind),
    /// Every known kind, one section each.
    All,
}

impl KindSelector {
    /// Kinds covered by this selector, in section order.
    #[must_use]
    pub fn kinds(self) -> Vec<RecordKind> {
        match self {
            Self::Single(kind) => vec![kind],
            Self::All => RecordKind::ALL.to_vec(),
        }
    }

    /// Identifier used in filenames and cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single(kind) => kind.as_str(),
            Self::All => "all",
        }
    }
}

impl fmt::Display for KindSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KindSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("offerings", RecordKind::Offerings)]
    #[case("church-accounts", RecordKind::Offerings)]
    #[case("construction", RecordKind::Construction)]
    #[case("construction_records", RecordKind::Construction)]
    #[case("sunday-school", RecordKind::SundaySchool)]
    #[case("sundaySchool", RecordKind::SundaySchool)]
    #[case("Expenditure", RecordKind::Expenditure)]
    #[case("expenditure_records", RecordKind::Expenditure)]
    fn test_kind_from_str(#[case] input: &str, #[case] expected: RecordKind) {
        assert_eq!(input.parse::<RecordKind>().unwrap(), expected);
    }

    #[test]
    fn test_kind_round_trips_through_identifier() {
        for kind in RecordKind::ALL {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("tithes".parse::<RecordKind>().is_err());
        assert!("".parse::<KindSelector>().is_err());
    }

    #[test]
    fn test_selector_kinds() {
        assert_eq!("ALL".parse::<KindSelector>().unwrap(), KindSelector::All);
        assert_eq!(KindSelector::All.kinds(), RecordKind::ALL.to_vec());
        assert_eq!(
            KindSelector::Single(RecordKind::Construction).kinds(),
            vec![RecordKind::Construction]
        );
        assert_eq!(KindSelector::All.to_string(), "all");
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&RecordKind::SundaySchool).unwrap();
        assert_eq!(json, "\"sunday-school\"");
    }
}
