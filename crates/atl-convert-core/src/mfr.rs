//! Parser for MyFlightRadar24 CSV export files.
//!
//! Columns are matched by header name so that extra columns in newer exports
//! are ignored. Malformed rows are skipped with a warning rather than
//! aborting the run; the row numbers in the warnings refer to the file
//! including its header line.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use log::warn;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ConvertError;

#[derive(Debug, Clone, Deserialize)]
pub struct MfrFlight {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Flight number")]
    pub flight_number: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Dep time")]
    pub dep_time: String,
    #[serde(rename = "Duration")]
    pub duration: String,
    #[serde(rename = "Airline", default)]
    pub airline: String,
    #[serde(rename = "Aircraft", default)]
    pub aircraft: String,
    #[serde(rename = "Registration", default)]
    pub registration: String,
    #[serde(rename = "Seat number", default)]
    pub seat_number: String,
    #[serde(rename = "Seat type", default)]
    pub seat_type: String,
    #[serde(rename = "Flight class", default)]
    pub flight_class: String,
    #[serde(rename = "Note", default)]
    pub note: String,
}

impl MfrFlight {
    /// Local departure timestamp parsed from the `Date` and `Dep time`
    /// columns (`%m/%d/%y` and `%H:%M:%S`).
    pub fn departure(&self) -> Option<NaiveDateTime> {
        let combined = format!("{} {}", self.date, self.dep_time);
        NaiveDateTime::parse_from_str(&combined, "%m/%d/%y %H:%M:%S").ok()
    }

    /// Flight duration parsed from the `HH:MM:SS` column.
    pub fn flight_duration(&self) -> Option<Duration> {
        let mut parts = self.duration.splitn(3, ':');
        let h: i64 = parts.next()?.parse().ok()?;
        let m: i64 = parts.next()?.parse().ok()?;
        let s: i64 = parts.next().unwrap_or("0").parse().ok()?;
        Some(Duration::seconds(h * 3600 + m * 60 + s))
    }

    /// Duration truncated to `HH:MM`, the granularity Air Travel Log wants.
    pub fn duration_hm(&self) -> &str {
        match self.duration.rsplit_once(':') {
            Some((head, _)) => head,
            None => &self.duration,
        }
    }
}

pub struct MfrParser;

impl MfrParser {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<MfrFlight>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open export file {}", path.display()))?;
        Ok(Self::parse(file)?)
    }

    pub fn parse<R: Read>(reader: R) -> Result<Vec<MfrFlight>, ConvertError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let mut flights = Vec::new();
        for (idx, result) in rdr.deserialize::<MfrFlight>().enumerate() {
            match result {
                Ok(flight) => flights.push(flight),
                Err(e) => warn!("skipping malformed export row {}: {}", idx + 2, e),
            }
        }
        Ok(flights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Date,Flight number,From,To,Dep time,Arr time,Duration,Airline,Aircraft,Registration,Seat number,Seat type,Flight class,Flight reason,Note";

    fn sample_row() -> String {
        format!(
            "{}\n06/01/23,AS3308,\"Seattle / Tacoma International (SEA/KSEA)\",\"Spokane International (GEG/KGEG)\",10:00:00,11:02:00,01:02:00,\"Alaska Airlines (AS/ASA)\",\"Embraer E175 (E75L)\",N622QX,12F,1,1,1,\"quick hop\"\n",
            HEADER
        )
    }

    #[test]
    fn test_parse_row() {
        let flights = MfrParser::parse(Cursor::new(sample_row())).unwrap();
        assert_eq!(flights.len(), 1);
        let f = &flights[0];
        assert_eq!(f.flight_number, "AS3308");
        assert_eq!(f.registration, "N622QX");
        assert_eq!(f.seat_number, "12F");
        assert_eq!(f.note, "quick hop");
    }

    #[test]
    fn test_departure_and_duration() {
        let flights = MfrParser::parse(Cursor::new(sample_row())).unwrap();
        let f = &flights[0];
        let dep = f.departure().unwrap();
        assert_eq!(dep.format("%Y-%m-%d %H:%M").to_string(), "2023-06-01 10:00");
        assert_eq!(f.flight_duration().unwrap(), Duration::minutes(62));
        assert_eq!(f.duration_hm(), "01:02");
    }

    #[test]
    fn test_malformed_row_skipped() {
        let data = format!("{}\nnot,a,flight\n", HEADER);
        let flights = MfrParser::parse(Cursor::new(data)).unwrap();
        assert!(flights.is_empty());
    }

    #[test]
    fn test_extra_columns_ignored() {
        let data = format!(
            "{},Dep_id,Arr_id\n06/01/23,AS3308,\"A (A/AAAA)\",\"B (B/BBBB)\",10:00:00,11:02:00,01:02:00,\"X (X/XXX)\",\"Y (Y1)\",N1,1A,1,1,1,\"\",5,6\n",
            HEADER
        );
        let flights = MfrParser::parse(Cursor::new(data)).unwrap();
        assert_eq!(flights.len(), 1);
    }
}
