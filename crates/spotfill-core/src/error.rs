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

//! Error types for the price pipeline

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotfillError {
    #[error("http client error: {0}")]
    Client(String),

    #[error("request to price API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("price API returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to decode price API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid date key {0:?}")]
    InvalidDate(String),

    #[error("invalid hour label {label:?} for {date}")]
    InvalidHour { date: String, label: String },

    #[error("invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, SpotfillError>;
