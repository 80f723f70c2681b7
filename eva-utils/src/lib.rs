//! Shared utility functions for EVA crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a NaiveDate as "MM/DD/YY", the short form used in incentive lists.
    pub fn format_date_short(date: &NaiveDate) -> String {
        date.format("%m/%d/%y").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| DateError::new(s))
    }

    /// Parse a dataset date leniently.
    ///
    /// Accepted forms, in order: `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
    /// `YYYY-MM-DD HH:MM:SS`, `MM/DD/YY` and `MM/DD/YYYY`. Any time of day is
    /// dropped.
    pub fn parse_any_date(s: &str) -> Result<NaiveDate, DateError> {
        let s = s.trim();
        if let Ok(date) = parse_date(s) {
            return Ok(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.date_naive());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(dt.date());
            }
        }
        // %Y happily reads "19" as year 19, so pick the year width up front
        let year_part = s.rsplit('/').next().unwrap_or("");
        let format = if year_part.len() == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
        NaiveDate::parse_from_str(s, format).map_err(|_| DateError::new(s))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_format_short() {
            let date = NaiveDate::from_ymd_opt(2020, 6, 5).unwrap();
            assert_eq!(format_date_short(&date), "06/05/20");
        }

        #[test]
        fn test_parse_any_date_forms() {
            let expected = NaiveDate::from_ymd_opt(2019, 5, 14).unwrap();
            assert_eq!(parse_any_date("2019-05-14").unwrap(), expected);
            assert_eq!(parse_any_date("2019-05-14T08:30:00Z").unwrap(), expected);
            assert_eq!(parse_any_date("2019-05-14T08:30:00").unwrap(), expected);
            assert_eq!(parse_any_date("2019-05-14 08:30:00").unwrap(), expected);
            assert_eq!(parse_any_date("05/14/19").unwrap(), expected);
            assert_eq!(parse_any_date("05/14/2019").unwrap(), expected);
            assert_eq!(parse_any_date(" 2019-05-14 ").unwrap(), expected);
        }

        #[test]
        fn test_parse_any_date_rejects_garbage() {
            assert!(parse_any_date("").is_err());
            assert!(parse_any_date("not a date").is_err());
            assert!(parse_any_date("2019-13-01").is_err());
            assert!(parse_any_date("02/30/20").is_err());
        }

        #[test]
        fn test_parse_date_is_strict() {
            assert!(parse_date("05/14/19").is_err());
            assert!(parse_date("2019-05-14T08:30:00").is_err());
        }
    }
}

/// Month names, used only when rendering.
///
/// Everything upstream of a renderer indexes months as `0..=11`.
pub mod months {
    use serde::{Deserialize, Serialize};
    use std::str::FromStr;

    /// Language used for month labels.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Locale {
        #[default]
        En,
        Fr,
    }

    impl FromStr for Locale {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_ascii_lowercase().as_str() {
                "en" | "english" => Ok(Locale::En),
                "fr" | "french" => Ok(Locale::Fr),
                other => Err(format!("unsupported locale: {}", other)),
            }
        }
    }

    const EN: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ];

    const FR: [&str; 12] = [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
        "septembre", "octobre", "novembre", "décembre",
    ];

    /// Localized name of a zero-based month index. Out of range indices yield `None`.
    pub fn month_name(month0: u32, locale: Locale) -> Option<&'static str> {
        let table = match locale {
            Locale::En => &EN,
            Locale::Fr => &FR,
        };
        table.get(month0 as usize).copied()
    }

    /// Short label such as "Mar 2016" / "mars 2016".
    pub fn month_label(year: i32, month0: u32, locale: Locale) -> String {
        match month_name(month0, locale) {
            Some(name) => match locale {
                Locale::En => format!("{} {}", &name[..3], year),
                Locale::Fr => format!("{} {}", name, year),
            },
            None => format!("{}-??", year),
        }
    }

}

/// Error types
pub mod error {
    use thiserror::Error;

    /// A date string that could not be parsed.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    #[error("Date error: cannot parse {0:?}")]
    pub struct DateError(pub String);

    impl DateError {
        pub fn new(input: &str) -> Self {
            DateError(input.to_string())
        }
    }
}
