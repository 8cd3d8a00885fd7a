//! Severity categories and the score bands that produce them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label attached to a severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityCategory {
    Critical,
    High,
    Medium,
    Low,
    Minimal,
}

impl SeverityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityCategory::Critical => "Critical",
            SeverityCategory::High => "High",
            SeverityCategory::Medium => "Medium",
            SeverityCategory::Low => "Low",
            SeverityCategory::Minimal => "Minimal",
        }
    }
}

impl fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(SeverityCategory::Critical),
            "high" => Ok(SeverityCategory::High),
            "medium" => Ok(SeverityCategory::Medium),
            "low" => Ok(SeverityCategory::Low),
            "minimal" => Ok(SeverityCategory::Minimal),
            other => Err(format!("unknown severity category '{other}'")),
        }
    }
}

/// Mapping from calibrated score to category.
///
/// `ThreeBand` matches the calibrated score layout (High 90+, Medium 80+).
/// `FiveBand` spreads the range evenly and is meant for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScheme {
    #[default]
    ThreeBand,
    FiveBand,
}

const THREE_BAND: &[SeverityCategory] = &[
    SeverityCategory::High,
    SeverityCategory::Medium,
    SeverityCategory::Low,
];

const FIVE_BAND: &[SeverityCategory] = &[
    SeverityCategory::Critical,
    SeverityCategory::High,
    SeverityCategory::Medium,
    SeverityCategory::Low,
    SeverityCategory::Minimal,
];

impl CategoryScheme {
    /// Non-finite scores fall into the lowest band.
    pub fn categorize(self, score: f64) -> SeverityCategory {
        match self {
            CategoryScheme::ThreeBand => {
                if score >= 90.0 {
                    SeverityCategory::High
                } else if score >= 80.0 {
                    SeverityCategory::Medium
                } else {
                    SeverityCategory::Low
                }
            }
            CategoryScheme::FiveBand => {
                if score >= 80.0 {
                    SeverityCategory::Critical
                } else if score >= 60.0 {
                    SeverityCategory::High
                } else if score >= 40.0 {
                    SeverityCategory::Medium
                } else if score >= 20.0 {
                    SeverityCategory::Low
                } else {
                    SeverityCategory::Minimal
                }
            }
        }
    }

    /// Categories this scheme can produce, most severe first.
    pub fn categories(self) -> &'static [SeverityCategory] {
        match self {
            CategoryScheme::ThreeBand => THREE_BAND,
            CategoryScheme::FiveBand => FIVE_BAND,
        }
    }

    pub fn accepts(self, category: SeverityCategory) -> bool {
        self.categories().contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_band_boundaries() {
        let s = CategoryScheme::ThreeBand;
        assert_eq!(s.categorize(100.0), SeverityCategory::High);
        assert_eq!(s.categorize(90.0), SeverityCategory::High);
        assert_eq!(s.categorize(89.99), SeverityCategory::Medium);
        assert_eq!(s.categorize(80.0), SeverityCategory::Medium);
        assert_eq!(s.categorize(79.9), SeverityCategory::Low);
        assert_eq!(s.categorize(10.0), SeverityCategory::Low);
        assert_eq!(s.categorize(5.0), SeverityCategory::Low);
    }

    #[test]
    fn five_band_boundaries() {
        let s = CategoryScheme::FiveBand;
        assert_eq!(s.categorize(80.0), SeverityCategory::Critical);
        assert_eq!(s.categorize(79.0), SeverityCategory::High);
        assert_eq!(s.categorize(60.0), SeverityCategory::High);
        assert_eq!(s.categorize(45.0), SeverityCategory::Medium);
        assert_eq!(s.categorize(20.0), SeverityCategory::Low);
        assert_eq!(s.categorize(19.9), SeverityCategory::Minimal);
    }

    #[test]
    fn five_band_critical_starts_at_eighty() {
        let s = CategoryScheme::FiveBand;
        assert_eq!(s.categorize(89.99), SeverityCategory::Critical);
        assert_eq!(s.categorize(80.0), SeverityCategory::Critical);
        assert_eq!(s.categorize(79.99), SeverityCategory::High);
        // The three-band table keeps its own cut at 90.
        assert_eq!(CategoryScheme::ThreeBand.categorize(89.99), SeverityCategory::Medium);
    }

    #[test]
    fn nan_is_lowest_band() {
        assert_eq!(
            CategoryScheme::ThreeBand.categorize(f64::NAN),
            SeverityCategory::Low
        );
        assert_eq!(
            CategoryScheme::FiveBand.categorize(f64::NAN),
            SeverityCategory::Minimal
        );
    }

    #[test]
    fn accepts_only_own_categories() {
        assert!(CategoryScheme::ThreeBand.accepts(SeverityCategory::High));
        assert!(!CategoryScheme::ThreeBand.accepts(SeverityCategory::Critical));
        assert!(!CategoryScheme::ThreeBand.accepts(SeverityCategory::Minimal));
        assert!(CategoryScheme::FiveBand.accepts(SeverityCategory::Minimal));
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&SeverityCategory::Medium).unwrap(),
            "\"Medium\""
        );
        assert_eq!(
            serde_json::from_str::<CategoryScheme>("\"five_band\"").unwrap(),
            CategoryScheme::FiveBand
        );
        assert_eq!(CategoryScheme::default(), CategoryScheme::ThreeBand);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<SeverityCategory>(), Ok(SeverityCategory::High));
        assert!("severe".parse::<SeverityCategory>().is_err());
    }
}
