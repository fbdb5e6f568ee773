// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Spotfill.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create database directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored row has invalid date {0:?}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
