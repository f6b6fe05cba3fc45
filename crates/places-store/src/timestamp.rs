use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Fixed-width UTC text so `last_visit < ?` compares chronologically
const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// Fraction is optional when reading, rows written by older tools may lack it
const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Years that fit the four-digit year field of `WRITE_FORMAT`
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

#[derive(Error, Debug)]
#[error("Timestamp year {0} can't be stored, only years 0 to 9999 are supported")]
pub struct TimestampOutOfRange(pub i32);

/// How `last_visit` lives in the `timestamp` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoredTimestamp(pub DateTime<Utc>);

impl StoredTimestamp {
    /// Fails outside `YEAR_RANGE`, where chrono widens the year and the
    /// text no longer sorts with the rest of the column
    pub fn encode(&self) -> Result<String, TimestampOutOfRange> {
        let year = self.0.year();
        if !YEAR_RANGE.contains(&year) {
            return Err(TimestampOutOfRange(year));
        }
        Ok(self.0.format(WRITE_FORMAT).to_string())
    }

    pub fn decode(text: &str) -> Result<Self, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(text, READ_FORMAT)?;
        Ok(Self(Utc.from_utc_datetime(&naive)))
    }
}

impl ToSql for StoredTimestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = self
            .encode()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(text))
    }
}

impl FromSql for StoredTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::decode(text).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
