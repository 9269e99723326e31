use once_cell::sync::Lazy;
use regex::Regex;

static DASH_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("Invalid dash date regex")
});

static SLASH_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})/([0-9]{2})/([0-9]{2})$").expect("Invalid slash date regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl CellDate {
    /// Zero-padded `[year, month, day]` cells.
    pub fn to_cells(&self) -> [String; 3] {
        [
            format!("{:04}", self.year),
            format!("{:02}", self.month),
            format!("{:02}", self.day),
        ]
    }
}

/// Recognise `YYYY-MM-DD` or `YYYY/MM/DD`. Month must be 1-12 and day 1-31;
/// whether the day exists in that month is not checked.
pub fn parse_cell_date(text: &str) -> Option<CellDate> {
    let captures = DASH_DATE_REGEX
        .captures(text)
        .or_else(|| SLASH_DATE_REGEX.captures(text))?;

    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some(CellDate { year, month, day })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_both_separators() {
        let dash = parse_cell_date("2024-09-15").unwrap();
        let slash = parse_cell_date("2024/09/15").unwrap();
        assert_eq!(dash, slash);
        assert_eq!(dash.to_cells(), ["2024", "09", "15"]);
    }

    #[test]
    fn rejects_out_of_range_and_mixed() {
        assert_eq!(parse_cell_date("2024-13-40"), None);
        assert_eq!(parse_cell_date("2024-00-10"), None);
        assert_eq!(parse_cell_date("2024-01-00"), None);
        assert_eq!(parse_cell_date("2024-09/15"), None);
        assert_eq!(parse_cell_date("24-09-15"), None);
        assert_eq!(parse_cell_date("Fecha"), None);
    }

    #[test]
    fn does_not_check_days_in_month() {
        assert!(parse_cell_date("2024-02-31").is_some());
    }
}
