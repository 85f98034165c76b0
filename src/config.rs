// src/config.rs
use std::env;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::AnalyzerError;
use crate::holiday_calendar::Country;

/// Any *substring* (case-insensitive) that indicates a paid absence.
static DEFAULT_ABSENCE_KEYWORDS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "vacation",
        "annual leave",
        "long service award",
        "military leave",
        "sick leave",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

pub const ENV_COUNTRY: &str = "ATTENDANCE_COUNTRY";
pub const ENV_DAILY_HOURS: &str = "ATTENDANCE_DAILY_HOURS";
pub const ENV_ABSENCE_KEYWORDS: &str = "ATTENDANCE_ABSENCE_KEYWORDS";
pub const ENV_LOW_PCT_THRESHOLD: &str = "ATTENDANCE_LOW_PCT_THRESHOLD";

/// Runtime configuration, fixed for the whole run (never per-call).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Single holiday calendar applied to every employee.
    pub country: Country,
    /// Work-day length used for all expected-hours figures.
    pub daily_expected_hours: Decimal,
    /// Lower-cased absence keywords, matched as substrings of the event text.
    pub absence_keywords: Vec<String>,
    /// Presentation-layer threshold below which percentages are flagged.
    pub low_pct_threshold: Decimal,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            country: Country::Estonia,
            daily_expected_hours: dec!(8.0),
            absence_keywords: DEFAULT_ABSENCE_KEYWORDS.clone(),
            low_pct_threshold: dec!(0.60),
        }
    }
}

impl AnalyzerConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset. Validation failures abort the run before
    /// any computation begins.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        let mut config = Self::default();

        if let Ok(code) = env::var(ENV_COUNTRY) {
            config.country = Country::from_code(&code)?;
        }
        if let Ok(raw) = env::var(ENV_DAILY_HOURS) {
            config.daily_expected_hours = parse_decimal(ENV_DAILY_HOURS, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_ABSENCE_KEYWORDS) {
            config.absence_keywords = parse_keywords(&raw);
        }
        if let Ok(raw) = env::var(ENV_LOW_PCT_THRESHOLD) {
            config.low_pct_threshold = parse_decimal(ENV_LOW_PCT_THRESHOLD, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.daily_expected_hours <= Decimal::ZERO {
            return Err(AnalyzerError::Configuration(format!(
                "daily expected hours must be positive, got {}",
                self.daily_expected_hours
            )));
        }
        if self.low_pct_threshold <= Decimal::ZERO || self.low_pct_threshold > Decimal::ONE {
            return Err(AnalyzerError::Configuration(format!(
                "low-percentage threshold must be within (0, 1], got {}",
                self.low_pct_threshold
            )));
        }
        if self.absence_keywords.is_empty() {
            return Err(AnalyzerError::Configuration(
                "absence keyword list must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_decimal(name: &str, raw: &str) -> Result<Decimal, AnalyzerError> {
    Decimal::from_str(raw.trim()).map_err(|_| {
        AnalyzerError::Configuration(format!("{name} is not a valid number: '{raw}'"))
    })
}

/// Comma-separated keyword list; entries are trimmed and lower-cased.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.country, Country::Estonia);
        assert_eq!(config.daily_expected_hours, dec!(8.0));
        assert!(config.absence_keywords.contains(&"sick leave".to_string()));
    }

    #[test]
    fn non_positive_daily_hours_is_rejected() {
        let config = AnalyzerConfig {
            daily_expected_hours: Decimal::ZERO,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::Configuration(_))
        ));
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let config = AnalyzerConfig {
            low_pct_threshold: dec!(1.5),
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::Configuration(_))
        ));
    }

    #[test]
    fn keyword_list_is_trimmed_and_lowercased() {
        let keywords = parse_keywords(" Vacation , SICK LEAVE ,, parental leave ");
        assert_eq!(keywords, vec!["vacation", "sick leave", "parental leave"]);
    }
}
