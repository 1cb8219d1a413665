use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ecoasset",
    about = "Ecological asset area and geohash index CLI",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to config file (defaults to ./ecoasset.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the area (m²) of polygons in a GeoJSON or WKT document
    Area {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Inline expression
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,

        /// Input format; auto-detected if omitted
        #[arg(long, value_enum)]
        input: Option<InputFormat>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Encode a latitude/longitude into a geohash
    Encode {
        /// Latitude in degrees
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_hyphen_values = true)]
        lon: f64,

        /// Geohash precision (1-9); defaults to the configured precision
        #[arg(short = 'p', long)]
        precision: Option<u8>,
    },

    /// Decode a geohash into the center of its cell
    Decode {
        /// Geohash string
        geohash: String,

        /// Also print the cell bounds
        #[arg(long)]
        bbox: bool,
    },

    /// Register every polygon of a GeoJSON or WKT document and print its index key
    Index {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Inline expression
        #[arg(short = 'e', long = "expr")]
        expr: Option<String>,

        /// Input format; auto-detected if omitted
        #[arg(long, value_enum)]
        input: Option<InputFormat>,

        /// Geohash precision (1-9); defaults to the configured precision
        #[arg(short = 'p', long)]
        precision: Option<u8>,

        /// Write the registry snapshot (JSON) to this path
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List the geohash cells covering a bounding box
    Cover {
        /// Southern latitude in degrees
        #[arg(allow_hyphen_values = true)]
        min_lat: f64,

        /// Western longitude in degrees
        #[arg(allow_hyphen_values = true)]
        min_lon: f64,

        /// Northern latitude in degrees
        #[arg(allow_hyphen_values = true)]
        max_lat: f64,

        /// Eastern longitude in degrees
        #[arg(allow_hyphen_values = true)]
        max_lon: f64,

        /// Geohash precision (1-9); defaults to the configured precision
        #[arg(short = 'p', long)]
        precision: Option<u8>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Geojson,
    Wkt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
