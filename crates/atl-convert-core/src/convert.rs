//! Field derivation: turns parsed export rows into Air Travel Log rows.
//!
//! The converter holds references to the two reference tables and never
//! mutates them. Unresolvable codes produce blank output fields and a
//! warning; the row itself is always emitted so the output row count matches
//! the input.

use chrono::{Duration, NaiveDateTime, Utc};
use log::warn;
use regex::Regex;
use std::sync::OnceLock;

use crate::airports::Airport;
use crate::atl::AtlRow;
use crate::geo::haversine_km;
use crate::mfr::MfrFlight;
use crate::{AirlineDb, AirportDb};

static CODE_RE: OnceLock<Regex> = OnceLock::new();

/// The `(IATA/ICAO)` group of an airport, airline or aircraft display
/// string, e.g. `"Seattle / Tacoma International (SEA/KSEA)"` -> `SEA/KSEA`.
fn code_group(name: &str) -> Option<&str> {
    let re = CODE_RE.get_or_init(|| Regex::new(r".+\((.+)\)").unwrap());
    re.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// IATA code when available, otherwise the sole code in the group.
pub fn extract_code(name: &str) -> &str {
    code_group(name)
        .and_then(|g| g.split('/').next())
        .unwrap_or("")
}

/// ICAO code (last segment of the code group).
pub fn extract_icao(name: &str) -> &str {
    code_group(name)
        .and_then(|g| g.split('/').next_back())
        .unwrap_or("")
}

/// Carrier code prefix of a flight number: three letters when the flight
/// number starts with an ICAO-style prefix (`ASA123`), otherwise the first
/// two characters (`AS3308`, `U21234`).
pub fn carrier_code(flight_number: &str) -> &str {
    let alpha = flight_number
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    let take = if alpha >= 3 { 3 } else { 2 };
    match flight_number.char_indices().nth(take) {
        Some((idx, _)) => &flight_number[..idx],
        None => flight_number,
    }
}

/// Splits an aircraft display string like `"Embraer E175 (E75L)"` into
/// name and code.
fn name_and_code(display: &str) -> (String, String) {
    let name = display.split('(').next().unwrap_or("").trim().to_string();
    let code = extract_code(display).to_string();
    (name, code)
}

/// MyFlightRadar24 numeric seat type -> Air Travel Log (name, code).
fn seat_type(code: &str) -> (&'static str, &'static str) {
    match code {
        "1" => ("Window", "W"),
        "2" => ("Middle", "M"),
        "3" => ("Aisle", "A"),
        _ => ("Unknown", "U"),
    }
}

/// MyFlightRadar24 numeric flight class -> Air Travel Log (name, code).
fn flight_class(code: &str) -> (&'static str, &'static str) {
    match code {
        "1" => ("Economy", "Y"),
        "2" => ("Business", "J"),
        "3" => ("First", "F"),
        "4" => ("Premium Economy", "W"),
        "5" => ("Private", "P"),
        _ => ("", ""),
    }
}

pub struct Converter<'a> {
    airlines: &'a AirlineDb,
    airports: &'a AirportDb,
}

impl<'a> Converter<'a> {
    pub fn new(airlines: &'a AirlineDb, airports: &'a AirportDb) -> Self {
        Self { airlines, airports }
    }

    /// Converts all rows, preserving input order.
    pub fn convert(&self, flights: &[MfrFlight]) -> Vec<AtlRow> {
        flights.iter().map(|f| self.convert_row(f)).collect()
    }

    pub fn convert_row(&self, flight: &MfrFlight) -> AtlRow {
        let origin = self.lookup_airport(&flight.from);
        let dest = self.lookup_airport(&flight.to);

        let distance_km = match (
            origin.and_then(Airport::coordinates),
            dest.and_then(Airport::coordinates),
        ) {
            (Some((lat1, lon1)), Some((lat2, lon2))) => {
                Some(haversine_km(lat1, lon1, lat2, lon2))
            }
            _ => None,
        };

        let departure = flight.departure();
        if departure.is_none() {
            warn!(
                "flight {}: unparseable departure \"{} {}\"",
                flight.flight_number, flight.date, flight.dep_time
            );
        }
        let dep_local = departure
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let arr_local = match (departure, flight.flight_duration(), origin, dest) {
            (Some(dep), Some(dur), Some(o), Some(d)) => {
                arrival_local(dep, dur, o, d).unwrap_or_default()
            }
            _ => String::new(),
        };

        let airline_code = carrier_code(&flight.flight_number).to_string();
        let airline_name = match self.airlines.get(&airline_code) {
            Some(a) => a.name.clone(),
            None => {
                if !airline_code.is_empty() {
                    warn!(
                        "flight {}: unknown airline code {}",
                        flight.flight_number, airline_code
                    );
                }
                String::new()
            }
        };

        let (op_name, op_code) = {
            let (embedded_name, code) = name_and_code(&flight.airline);
            let name = match self.airlines.get(&code) {
                Some(a) => a.name.clone(),
                None => embedded_name,
            };
            (name, code)
        };

        let (equipment_name, equipment_code) = name_and_code(&flight.aircraft);
        let (seat_type_name, seat_type_code) = seat_type(&flight.seat_type);
        let (class_name, class_code) = flight_class(&flight.flight_class);
        let duration_hm = flight.duration_hm().to_string();

        AtlRow {
            flight_number: flight.flight_number.clone(),
            origin_code: extract_code(&flight.from).to_string(),
            destination_code: extract_code(&flight.to).to_string(),
            distance_km: distance_km
                .map(|d| format!("{:.1}", d))
                .unwrap_or_default(),
            std: dep_local.clone(),
            sta: arr_local.clone(),
            scheduled_duration: duration_hm.clone(),
            // MyFlightRadar24 doesn't track actual flight times
            atd: dep_local,
            ata: arr_local,
            actual_duration: duration_hm,
            airline_code,
            airline_name,
            registration: flight.registration.clone(),
            equipment_code,
            equipment_name,
            manufacturer_code: String::new(),
            manufacturer_name: String::new(),
            seat_number: flight.seat_number.clone(),
            seat_type_code: seat_type_code.to_string(),
            seat_type_name: seat_type_name.to_string(),
            flight_class_code: class_code.to_string(),
            flight_class_name: class_name.to_string(),
            operating_carrier_code: op_code,
            operating_carrier_name: op_name,
            ignore_in_statistics: String::new(),
            remark: flight.note.clone(),
        }
    }

    fn lookup_airport(&self, display: &str) -> Option<&Airport> {
        let icao = extract_icao(display);
        let airport = self.airports.get(icao);
        if airport.is_none() {
            warn!("unknown airport in \"{}\"", display);
        }
        airport
    }
}

/// Wall-clock arrival time at the destination: departure localised in the
/// origin zone, plus the flight duration, converted to the destination zone.
/// `None` when either zone is unresolvable.
fn arrival_local(
    dep: NaiveDateTime,
    duration: Duration,
    origin: &Airport,
    dest: &Airport,
) -> Option<String> {
    let dep_zoned = origin.timezone()?.localize(dep)?;
    let arr_utc = (dep_zoned + duration).with_timezone(&Utc);
    let arr_local = dest.timezone()?.to_local(arr_utc);
    Some(arr_local.format("%Y-%m-%d %H:%M").to_string())
}
