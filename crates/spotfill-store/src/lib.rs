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

//! SQLite persistence of daily price aggregates
//!
//! Rows live in `precios_diarios(fecha TEXT PRIMARY KEY, precio_promedio REAL, precio_7d REAL)`
//! and are upserted by date, so re-running a window overwrites the previous values.

pub mod db;
pub mod error;

pub use db::DailyPriceStore;
pub use error::{Result, StoreError};
