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

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::{debug, info};

use spotfill_core::DailyAggregate;

use crate::error::{Result, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Keyed table of daily and rolling average prices
#[derive(Debug)]
pub struct DailyPriceStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl DailyPriceStore {
    /// Open (or create) the database file and make sure the table exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        debug!("Opened price database at {}", path.display());
        Self::init(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS precios_diarios (
                fecha           TEXT PRIMARY KEY,
                precio_promedio REAL,
                precio_7d       REAL
            );",
        )?;
        Ok(Self { conn, path })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or overwrite one row per date inside a single transaction.
    /// Either every row is written or none is.
    pub fn upsert_all(&mut self, days: &[DailyAggregate]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO precios_diarios (fecha, precio_promedio, precio_7d)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(fecha) DO UPDATE SET
                    precio_promedio = excluded.precio_promedio,
                    precio_7d = excluded.precio_7d",
            )?;

            for day in days {
                stmt.execute(params![
                    day.date.format(DATE_FORMAT).to_string(),
                    day.daily_average,
                    day.rolling_average,
                ])?;
            }
        }
        tx.commit()?;

        info!("Upserted {} daily price rows", days.len());
        Ok(days.len())
    }

    /// All stored rows ordered by date
    pub fn load_all(&self) -> Result<Vec<DailyAggregate>> {
        let mut stmt = self.conn.prepare(
            "SELECT fecha, precio_promedio, precio_7d FROM precios_diarios ORDER BY fecha ASC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(fecha, daily_average, rolling_average)| {
                let date = NaiveDate::parse_from_str(&fecha, DATE_FORMAT)
                    .map_err(|_| StoreError::InvalidDate(fecha.clone()))?;
                Ok(DailyAggregate {
                    date,
                    daily_average,
                    rolling_average,
                })
            })
            .collect()
    }

    pub fn count(&self) -> Result<u64> {
        let count: u64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM precios_diarios", [], |row| row.get(0))?;
        Ok(count)
    }
}
