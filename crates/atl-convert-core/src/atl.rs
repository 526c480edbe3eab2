//! Writer for the Air Travel Log import format: tab-separated values with a
//! header row, one row per flight, input order preserved.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::ConvertError;

/// One row of the Air Travel Log import schema. Field order matches the
/// column order the app expects. All fields are strings; blank means the app
/// should leave the value unset for manual correction later.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AtlRow {
    #[serde(rename = "FlightNumber")]
    pub flight_number: String,
    #[serde(rename = "OriginCode")]
    pub origin_code: String,
    #[serde(rename = "DestinationCode")]
    pub destination_code: String,
    #[serde(rename = "DistanceInKm")]
    pub distance_km: String,
    #[serde(rename = "STD")]
    pub std: String,
    #[serde(rename = "STA")]
    pub sta: String,
    #[serde(rename = "ScheduledDuration")]
    pub scheduled_duration: String,
    #[serde(rename = "ATD")]
    pub atd: String,
    #[serde(rename = "ATA")]
    pub ata: String,
    #[serde(rename = "ActualDuration")]
    pub actual_duration: String,
    #[serde(rename = "AirlineCode")]
    pub airline_code: String,
    #[serde(rename = "AirlineName")]
    pub airline_name: String,
    #[serde(rename = "Registration")]
    pub registration: String,
    #[serde(rename = "EquipmentCode")]
    pub equipment_code: String,
    #[serde(rename = "EquipmentName")]
    pub equipment_name: String,
    #[serde(rename = "ManufacturerCode")]
    pub manufacturer_code: String,
    #[serde(rename = "ManufacturerName")]
    pub manufacturer_name: String,
    #[serde(rename = "SeatNumber")]
    pub seat_number: String,
    #[serde(rename = "SeatTypeCode")]
    pub seat_type_code: String,
    #[serde(rename = "SeatTypeName")]
    pub seat_type_name: String,
    #[serde(rename = "FlightClassCode")]
    pub flight_class_code: String,
    #[serde(rename = "FlightClassName")]
    pub flight_class_name: String,
    #[serde(rename = "OperatingCarrierCode")]
    pub operating_carrier_code: String,
    #[serde(rename = "OperatingCarrierName")]
    pub operating_carrier_name: String,
    #[serde(rename = "IgnoreInStatistics")]
    pub ignore_in_statistics: String,
    #[serde(rename = "Remark")]
    pub remark: String,
}

pub struct AtlWriter;

impl AtlWriter {
    pub fn write_file<P: AsRef<Path>>(path: P, rows: &[AtlRow]) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        Self::write(file, rows)?;
        Ok(())
    }

    pub fn write<W: Write>(writer: W, rows: &[AtlRow]) -> Result<(), ConvertError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(writer);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_tabs() {
        let row = AtlRow {
            flight_number: "AS3308".into(),
            origin_code: "SEA".into(),
            destination_code: "GEG".into(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        AtlWriter::write(&mut buf, &[row]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("FlightNumber\tOriginCode\tDestinationCode\tDistanceInKm\tSTD\tSTA"));
        assert!(header.ends_with("IgnoreInStatistics\tRemark"));

        let data = lines.next().unwrap();
        assert!(data.starts_with("AS3308\tSEA\tGEG\t"));
        assert_eq!(data.split('\t').count(), header.split('\t').count());
    }

    #[test]
    fn test_row_count_preserved() {
        let rows = vec![AtlRow::default(), AtlRow::default(), AtlRow::default()];
        let mut buf = Vec::new();
        AtlWriter::write(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // header + 3 data rows
        assert_eq!(text.lines().count(), 4);
    }
}
