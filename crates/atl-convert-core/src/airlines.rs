//! Loader for the OpenFlights `airlines.dat` reference table.
//!
//! The file is headerless CSV with the layout
//! `id,name,alias,iata,icao,callsign,country,active`. Airlines are keyed by
//! both their IATA and ICAO codes where present. Several defunct carriers
//! share recycled IATA codes in the upstream data; the first record wins so
//! that lookups stay deterministic between runs.

use log::{debug, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::ConvertError;

#[derive(Debug, Clone, PartialEq)]
pub struct Airline {
    pub name: String,
    pub iata: String,
    pub icao: String,
    pub callsign: String,
    pub country: String,
    pub active: bool,
}

#[derive(Debug)]
pub struct AirlineDb {
    by_code: HashMap<String, Airline>,
}

/// OpenFlights uses `\N` for NULL fields.
fn field(record: &csv::StringRecord, idx: usize) -> String {
    match record.get(idx) {
        Some(r"\N") | None => String::new(),
        Some(v) => v.to_string(),
    }
}

impl AirlineDb {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvertError::ReferenceNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let db = Self::parse(file)?;
        debug!(
            "loaded {} airline codes from {}",
            db.len(),
            path.display()
        );
        Ok(db)
    }

    pub fn parse<R: Read>(reader: R) -> Result<Self, ConvertError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut by_code = HashMap::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!("airlines.dat line {}: {}", idx + 1, e);
                    continue;
                }
            };

            let airline = Airline {
                name: field(&record, 1),
                iata: field(&record, 3),
                icao: field(&record, 4),
                callsign: field(&record, 5),
                country: field(&record, 6),
                active: record.get(7) == Some("Y"),
            };

            for code in [airline.iata.clone(), airline.icao.clone()] {
                if code.is_empty() || code == "-" {
                    continue;
                }
                match by_code.entry(code) {
                    Entry::Vacant(e) => {
                        e.insert(airline.clone());
                    }
                    Entry::Occupied(e) => {
                        debug!(
                            "duplicate airline code {}; keeping \"{}\", ignoring \"{}\"",
                            e.key(),
                            e.get().name,
                            airline.name
                        );
                    }
                }
            }
        }

        Ok(Self { by_code })
    }

    /// Looks up an airline by IATA or ICAO code.
    pub fn get(&self, code: &str) -> Option<&Airline> {
        self.by_code.get(code)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
4,\"Alaska Airlines\",\\N,\"AS\",\"ASA\",\"ALASKA\",\"United States\",\"Y\"
24,\"American Airlines\",\\N,\"AA\",\"AAL\",\"AMERICAN\",\"United States\",\"Y\"
99,\"Ghost Carrier\",\\N,\"AS\",\"GST\",\"GHOST\",\"Nowhere\",\"N\"
";

    #[test]
    fn test_lookup_by_iata_and_icao() {
        let db = AirlineDb::parse(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(db.get("AS").unwrap().name, "Alaska Airlines");
        assert_eq!(db.get("ASA").unwrap().name, "Alaska Airlines");
        assert_eq!(db.get("AAL").unwrap().name, "American Airlines");
        assert!(db.get("ZZ").is_none());
    }

    #[test]
    fn test_duplicate_code_first_wins() {
        let db = AirlineDb::parse(Cursor::new(SAMPLE)).unwrap();
        // "AS" appears twice upstream; the first record must win.
        assert_eq!(db.get("AS").unwrap().name, "Alaska Airlines");
        // The ghost carrier is still reachable through its unclaimed ICAO code.
        assert_eq!(db.get("GST").unwrap().name, "Ghost Carrier");
    }

    #[test]
    fn test_null_fields_skipped() {
        let data = "1,\"No Codes\",\\N,\\N,\\N,\\N,\"Nowhere\",\"N\"\n";
        let db = AirlineDb::parse(Cursor::new(data)).unwrap();
        assert!(db.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = AirlineDb::load("/nonexistent/airlines.dat").unwrap_err();
        assert!(matches!(err, ConvertError::ReferenceNotFound(_)));
    }
}
