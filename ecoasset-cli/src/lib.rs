//! ecoasset CLI library.
//!
//! This crate provides the types, command handlers, and utilities that
//! power the `ecoasset` binary. Library consumers can construct a [`Cli`]
//! programmatically and call [`run`], or call individual command handlers
//! from [`commands`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let index = config.index;

    match cli.command {
        Commands::Area {
            file,
            expr,
            input,
            format,
        } => commands::area::run(file.as_deref(), expr.as_deref(), input, format),

        Commands::Encode {
            lat,
            lon,
            precision,
        } => commands::encode::run(lat, lon, precision.unwrap_or(index.precision)),

        Commands::Decode { geohash, bbox } => commands::decode::run(&geohash, bbox),

        Commands::Index {
            file,
            expr,
            input,
            precision,
            snapshot,
            format,
        } => {
            let index = match precision {
                Some(p) => index.with_precision(p),
                None => index,
            };
            commands::index::run(
                file.as_deref(),
                expr.as_deref(),
                input,
                index,
                snapshot.as_deref(),
                format,
            )
        }

        Commands::Cover {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
            precision,
        } => commands::cover::run(
            min_lat,
            min_lon,
            max_lat,
            max_lon,
            precision.unwrap_or(index.precision),
            &index.covering,
        ),

        Commands::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
    }
}
