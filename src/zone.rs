//! Fixed-width census geography codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every census geography (output area, ward, …) is identified by a
/// fixed-width code of this many characters.
pub const ZONE_CODE_WIDTH: usize = 10;

/// A 10-character zone code. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneCode(String);

impl ZoneCode {
    /// Extract the zone code from the first column of a raw data line.
    ///
    /// The published files prefix the code with a single character (a quote
    /// in most extracts), so the code is characters 1..=10 of the column.
    /// Returns `None` when the column is too short to hold them.
    pub fn from_data_column(column: &str) -> Option<ZoneCode> {
        let code: String = column.chars().skip(1).take(ZONE_CODE_WIDTH).collect();
        if code.chars().count() < ZONE_CODE_WIDTH {
            return None;
        }
        Some(ZoneCode(code))
    }

    /// Build a code from an arbitrary label, space-padding short labels and
    /// truncating long ones to the fixed width. Used when reassigning the
    /// zone of an aggregated record (e.g. naming a merged ward).
    pub fn padded(label: &str) -> ZoneCode {
        let mut code: String = label.chars().take(ZONE_CODE_WIDTH).collect();
        while code.chars().count() < ZONE_CODE_WIDTH {
            code.push(' ');
        }
        ZoneCode(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ten_characters_after_the_prefix() {
        let zone = ZoneCode::from_data_column("'00AAFA0001").unwrap();
        assert_eq!(zone.as_str(), "00AAFA0001");

        // trailing text beyond the code is ignored
        let zone = ZoneCode::from_data_column("\"00AAFA0001extra").unwrap();
        assert_eq!(zone.as_str(), "00AAFA0001");
    }

    #[test]
    fn short_columns_are_rejected() {
        assert!(ZoneCode::from_data_column("X").is_none());
        assert!(ZoneCode::from_data_column("").is_none());
        assert!(ZoneCode::from_data_column("'00AAFA000").is_none());
    }

    #[test]
    fn padded_fills_and_truncates() {
        assert_eq!(ZoneCode::padded("ward7").as_str(), "ward7     ");
        assert_eq!(ZoneCode::padded("0123456789abc").as_str(), "0123456789");
        assert_eq!(ZoneCode::padded("").as_str(), "          ");
    }
}
