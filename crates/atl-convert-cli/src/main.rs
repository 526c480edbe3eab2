use anyhow::{Context, Result};
use atl_convert_core::{AirlineDb, AirportDb, AtlWriter, Converter, MfrParser};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// MyFlightRadar24 CSV export file to convert
    infile: PathBuf,

    /// Output filename for the Air Travel Log TSV file. Defaults to the
    /// input filename with an .atltsv extension.
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Path to the OpenFlights airlines.dat file
    #[arg(long, default_value = "airlines.dat")]
    airlines: PathBuf,

    /// Path to the OpenFlights airports.dat file
    #[arg(long, default_value = "airports.dat")]
    airports: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !cli.infile.exists() {
        anyhow::bail!("input file {} was not found", cli.infile.display());
    }

    let airlines = AirlineDb::load(&cli.airlines)
        .context("download airlines.dat from https://openflights.org/data")?;
    let airports = AirportDb::load(&cli.airports)
        .context("download airports.dat from https://openflights.org/data")?;

    let flights = MfrParser::parse_file(&cli.infile)?;
    let rows = Converter::new(&airlines, &airports).convert(&flights);

    let outfile = cli
        .outfile
        .unwrap_or_else(|| cli.infile.with_extension("atltsv"));
    AtlWriter::write_file(&outfile, &rows)?;

    println!("Converted {} flights -> {}", rows.len(), outfile.display());
    Ok(())
}
