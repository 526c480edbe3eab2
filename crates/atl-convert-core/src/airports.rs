//! Loader for the OpenFlights `airports.dat` reference table.
//!
//! Headerless CSV with the layout `id,name,city,country,iata,icao,latitude,
//! longitude,altitude,offset,dst,timezone,type,source`. Airports are keyed by
//! ICAO code, which the export's `From`/`To` strings always carry.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::ConvertError;

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub name: String,
    pub city: String,
    pub country: String,
    pub iata: String,
    pub icao: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Raw UTC offset in hours, e.g. `-5` or `5.75`.
    pub utc_offset: Option<f64>,
    /// IANA zone name, e.g. `America/New_York`. May be `\N` upstream.
    pub tz_name: String,
}

/// Timezone of an airport, resolved from the reference data.
///
/// Prefers the IANA zone name (DST-correct via chrono-tz); airports whose
/// zone name is missing fall back to the static UTC-offset column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AirportZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl AirportZone {
    /// Interprets a wall-clock timestamp in this zone. Ambiguous local times
    /// (DST fold) take the earlier mapping; nonexistent ones return `None`.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            AirportZone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            AirportZone::Fixed(off) => off.from_local_datetime(&naive).single(),
        }
    }

    /// Converts an absolute instant to wall-clock time in this zone.
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            AirportZone::Named(tz) => instant.with_timezone(tz).naive_local(),
            AirportZone::Fixed(off) => instant.with_timezone(off).naive_local(),
        }
    }
}

impl Airport {
    /// Resolves the airport's timezone, or `None` when neither the zone name
    /// nor the offset column is usable.
    pub fn timezone(&self) -> Option<AirportZone> {
        if let Ok(tz) = self.tz_name.parse::<Tz>() {
            return Some(AirportZone::Named(tz));
        }
        let offset = self.utc_offset?;
        FixedOffset::east_opt((offset * 3600.0).round() as i32).map(AirportZone::Fixed)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug)]
pub struct AirportDb {
    by_icao: HashMap<String, Airport>,
}

fn field(record: &csv::StringRecord, idx: usize) -> String {
    match record.get(idx) {
        Some(r"\N") | None => String::new(),
        Some(v) => v.to_string(),
    }
}

fn num_field(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record.get(idx).and_then(|v| v.parse().ok())
}

impl AirportDb {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvertError::ReferenceNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let db = Self::parse(file)?;
        debug!("loaded {} airports from {}", db.len(), path.display());
        Ok(db)
    }

    pub fn parse<R: Read>(reader: R) -> Result<Self, ConvertError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut by_icao = HashMap::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!("airports.dat line {}: {}", idx + 1, e);
                    continue;
                }
            };

            let airport = Airport {
                name: field(&record, 1),
                city: field(&record, 2),
                country: field(&record, 3),
                iata: field(&record, 4),
                icao: field(&record, 5),
                latitude: num_field(&record, 6),
                longitude: num_field(&record, 7),
                utc_offset: num_field(&record, 9),
                tz_name: field(&record, 11),
            };

            if airport.icao.is_empty() {
                continue;
            }
            match by_icao.entry(airport.icao.clone()) {
                Entry::Vacant(e) => {
                    e.insert(airport);
                }
                Entry::Occupied(e) => {
                    debug!("duplicate airport ICAO {}; keeping first entry", e.key());
                }
            }
        }

        Ok(Self { by_icao })
    }

    pub fn get(&self, icao: &str) -> Option<&Airport> {
        self.by_icao.get(icao)
    }

    pub fn len(&self) -> usize {
        self.by_icao.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_icao.is_empty()
    }
}
