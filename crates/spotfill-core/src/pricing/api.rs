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

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{error, info};

use super::PriceSource;
use crate::error::{Result, SpotfillError};
use crate::types::{DateWindow, RawPrices};

pub const DEFAULT_BASE_URL: &str =
    "https://l2h237eh53.execute-api.us-east-1.amazonaws.com/dev/precios";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct PriceResponse {
    data: RawPrices,
}

/// Hourly price REST API client
#[derive(Debug, Clone)]
pub struct ApiPriceSource {
    client: Client,
    base_url: String,
}

impl ApiPriceSource {
    /// Without a `timeout` the request blocks until the server answers
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpotfillError::Client(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PriceSource for ApiPriceSource {
    /// GET `<base_url>?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`, both days inclusive.
    /// Any non-success status is an error; there is no retry.
    fn fetch(&self, window: &DateWindow) -> Result<RawPrices> {
        let start = window.start.format(DATE_FORMAT).to_string();
        let end = window.end.format(DATE_FORMAT).to_string();

        info!("Fetching prices {} to {} from {}", start, end, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("start_date", &start), ("end_date", &end)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            error!("Price API returned HTTP {}", status);
            return Err(SpotfillError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let payload: PriceResponse = serde_json::from_str(&body)?;

        info!(
            "Received prices for {} days ({} hourly entries)",
            payload.data.len(),
            payload.data.values().map(std::collections::BTreeMap::len).sum::<usize>()
        );

        Ok(payload.data)
    }
}
