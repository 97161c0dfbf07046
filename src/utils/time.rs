use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in hourtrack.
pub fn date_to_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses strictly `yyyy-MM-dd` dates, the form dates are stored in.
pub fn parse_date_key(value: &str) -> TrackerResult<NaiveDate> {
    if value.len() != 10 {
        return Err(TrackerError::date_format(value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| TrackerError::date_format(value))
}

/// Serde adapter storing a [NaiveDate] as `yyyy-MM-dd`.
pub mod date_key_ser {
    use chrono::NaiveDate;
    use serde::{self, de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::date_to_key(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_date_key(&s).map_err(D::Error::custom)
    }
}
