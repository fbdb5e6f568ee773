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

//! Console previews of the repaired data.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, presets::UTF8_FULL};
use spotfill_core::{DailyAggregate, RepairReport, RepairedSeries, SlotSource};

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn price_cell(price: Option<f64>) -> Cell {
    match price {
        Some(price) => Cell::new(format!("{price:.2}")).set_alignment(CellAlignment::Right),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

fn source_label(source: SlotSource) -> &'static str {
    match source {
        SlotSource::Observed => "observed",
        SlotSource::ForwardFilled => "forward-filled",
        SlotSource::DayAverage => "day average",
        SlotSource::Missing => "missing",
    }
}

/// Timestamps that had no price before repair, one per line
#[must_use]
pub fn missing_listing(report: &RepairReport) -> String {
    if report.missing_before_repair.is_empty() {
        return "Missing values before repair: none".to_owned();
    }

    let mut output = format!(
        "Missing values before repair ({}):",
        report.missing_before_repair.len()
    );
    for timestamp in &report.missing_before_repair {
        output.push_str("\n  ");
        output.push_str(&timestamp.format("%Y-%m-%d %H:%M").to_string());
    }
    output
}

/// First `rows` slots of the repaired hourly series
#[must_use]
pub fn hourly_table(series: &RepairedSeries, rows: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Fecha", "Hora", "Precio", "Source"]));

    for slot in series.slots.iter().take(rows) {
        let source = Cell::new(source_label(slot.source));
        table.add_row(vec![
            Cell::new(slot.timestamp.format("%Y-%m-%d")),
            Cell::new(slot.timestamp.format("%H:%M")),
            price_cell(slot.price),
            match slot.source {
                SlotSource::Observed => source,
                SlotSource::Missing => source.fg(Color::Red),
                SlotSource::ForwardFilled | SlotSource::DayAverage => source.fg(Color::Yellow),
            },
        ]);
    }

    table.to_string()
}

/// First `rows` days of the daily aggregate table
#[must_use]
pub fn daily_table(days: &[DailyAggregate], rows: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header(&["Fecha", "Precio promedio", "Precio 7d"]));

    for day in days.iter().take(rows) {
        table.add_row(vec![
            Cell::new(day.date.format("%Y-%m-%d")),
            price_cell(day.daily_average),
            price_cell(day.rolling_average),
        ]);
    }

    table.to_string()
}
