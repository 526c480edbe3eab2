//! Core library for converting MyFlightRadar24 CSV exports into the
//! tab-separated import format used by the Air Travel Log iOS app.
//!
//! The pipeline is strictly linear: load the OpenFlights reference tables,
//! parse the export rows, derive the missing fields (arrival timestamps,
//! airline codes, great-circle distance), and write the TSV output. Reference
//! data is loaded once per run and is read-only afterwards.

pub mod airlines;
pub mod airports;
pub mod atl;
pub mod convert;
pub mod geo;
pub mod mfr;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("reference data file not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub use airlines::{Airline, AirlineDb};
pub use airports::{Airport, AirportDb, AirportZone};
pub use atl::{AtlRow, AtlWriter};
pub use convert::Converter;
pub use mfr::{MfrFlight, MfrParser};
