//! Township boundary extractor.
//!
//! Converts the national township shapefile into a GeoJSON
//! `FeatureCollection` holding only the townships of one county.

use std::path::PathBuf;

use anyhow::{Context, Result};
use boundary::extract_to_file;
use city_common::{logging::init_tracing, CityFilter};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "boundary-extractor")]
#[command(about = "Filter MOI township boundaries down to one county")]
struct Args {
    /// Township shapefile (.shp; the .dbf must sit next to it)
    #[arg(long, env = "BOUNDARY_INPUT", default_value = "data/town_shp/TOWN_MOI_1140318.shp")]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(long, env = "BOUNDARY_OUTPUT", default_value = "data/taoyuan_towns_moi.json")]
    output: PathBuf,

    /// Attribute column holding the county name
    #[arg(long, default_value = "COUNTYNAME")]
    field: String,

    /// County to keep (exact match)
    #[arg(long, env = "BOUNDARY_COUNTY", default_value = "桃園市")]
    county: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let city = CityFilter::new(args.field, args.county);
    let extraction = extract_to_file(&args.input, &args.output, &city).with_context(|| {
        format!(
            "Failed to extract {} from {}",
            city.target,
            args.input.display()
        )
    })?;

    info!(
        path = %args.output.display(),
        features = extraction.matched(),
        "Saved to {}",
        args.output.display()
    );

    Ok(())
}
