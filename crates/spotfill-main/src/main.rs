// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Spotfill.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod cli;
mod config;
mod run;

use anyhow::{Context, Result};
use clap::Parser;
use spotfill_core::ApiPriceSource;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;
use crate::config::SpotfillConfig;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .with_context(|| "Failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let config = SpotfillConfig::load(&cli)?;

    let source = ApiPriceSource::new(config.source.base_url.clone(), config.timeout())?;
    let summary = run::run(&config, &source)?;

    if summary.still_missing > 0 {
        warn!(
            "{} hourly slots could not be repaired",
            summary.still_missing
        );
    }
    info!(
        "Done: {} hourly slots ({} repaired), {} days, {} rows stored in {}",
        summary.slots,
        summary.missing_before_repair.saturating_sub(summary.still_missing),
        summary.days,
        summary.rows_written,
        config.output.database_path.display()
    );
    if summary.chart_written {
        info!("Chart saved to {}", config.output.chart_path.display());
    }

    Ok(())
}
