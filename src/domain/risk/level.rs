//! Risk level scale

use std::fmt;

use serde::Serialize;

/// Education-security risk rating of a community, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Satisfactory,
    Moderate,
    High,
    VeryHigh,
    Insurmountable,
}

impl RiskLevel {
    /// Every level, most severe first (legend order)
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Insurmountable,
        RiskLevel::VeryHigh,
        RiskLevel::High,
        RiskLevel::Moderate,
        RiskLevel::Satisfactory,
    ];

    /// Level assumed when a record carries an unknown label
    pub const DEFAULT: RiskLevel = RiskLevel::Satisfactory;

    /// Label as published in the attribute dataset
    pub fn label(&self) -> &'static str {
        match self {
            Self::Insurmountable => "Непереборний",
            Self::VeryHigh => "Дуже високий",
            Self::High => "Високий",
            Self::Moderate => "Помірний",
            Self::Satisfactory => "Задовільний",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    /// Resolves a raw label, falling back to [`RiskLevel::DEFAULT`]
    pub fn resolve(label: Option<&str>) -> Self {
        label.and_then(Self::from_label).unwrap_or(Self::DEFAULT)
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::from_label(level.label()), Some(level));
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_default() {
        assert_eq!(RiskLevel::resolve(Some("Невідомий")), RiskLevel::Satisfactory);
        assert_eq!(RiskLevel::resolve(None), RiskLevel::Satisfactory);
        assert_eq!(RiskLevel::resolve(Some(" Високий ")), RiskLevel::High);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(RiskLevel::Insurmountable > RiskLevel::VeryHigh);
        assert!(RiskLevel::Moderate > RiskLevel::Satisfactory);
        assert_eq!(RiskLevel::ALL.iter().max(), Some(&RiskLevel::Insurmountable));
    }
}
