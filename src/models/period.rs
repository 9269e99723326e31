use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static PERIOD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("Invalid period regex"));

/// One `<option>` of the remote period dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
    pub disabled: bool,
}

/// A `YYYYMM` period identifier. The month is kept as published and is not
/// range checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if !PERIOD_REGEX.is_match(value) {
            return None;
        }
        let year = value[..4].parse().ok()?;
        let month = value[4..].parse().ok()?;
        Some(Period { year, month })
    }

    pub fn code(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl PeriodOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
            disabled: false,
        }
    }

    /// `None` unless the value is exactly six digits.
    pub fn period(&self) -> Option<Period> {
        Period::parse(&self.value)
    }
}
