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

pub mod api;

pub use api::{ApiPriceSource, DEFAULT_BASE_URL};

use crate::error::Result;
use crate::types::{DateWindow, RawPrices};

/// Anything that can return the raw hourly price map for a window.
/// The HTTP API in production, a fixed map in tests.
pub trait PriceSource {
    fn fetch(&self, window: &DateWindow) -> Result<RawPrices>;
}

/// Price source backed by an already loaded payload
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: RawPrices,
}

impl StaticPriceSource {
    #[must_use]
    pub fn new(prices: RawPrices) -> Self {
        Self { prices }
    }
}

impl PriceSource for StaticPriceSource {
    fn fetch(&self, _window: &DateWindow) -> Result<RawPrices> {
        Ok(self.prices.clone())
    }
}
