//! Typed views of the API envelopes.
//!
//! These mirror the JSON one-to-one. String-typed numbers stay strings; use
//! the `*_count` accessors on [`LotInfo`] to parse them.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    num::ParseIntError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub status: String,
}

impl ApiInfo {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// A named region (PSI) or area (forecast) with its map label position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaMetadata {
    pub name: String,
    pub label_location: LabelLocation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("metadata lists '{0}' more than once")]
    DuplicateName(String),

    #[error("item {item} references unknown area '{name}'")]
    UnknownArea { item: usize, name: String },

    #[error("item {item} has negative value {value} for {measure}.{region}")]
    NegativeReading { item: usize, measure: String, region: String, value: f64 },

    #[error("item {item} has a valid period ending before it starts ({start} > {end})")]
    InvertedPeriod { item: usize, start: DateTime<FixedOffset>, end: DateTime<FixedOffset> },

    #[error("carpark {carpark} has unparseable {field} '{value}'")]
    BadLotCount { carpark: String, field: &'static str, value: String },
}

fn known_names(metadata: &[AreaMetadata]) -> Result<HashSet<&str>, ModelError> {
    let mut names = HashSet::with_capacity(metadata.len());
    for area in metadata {
        if !names.insert(area.name.as_str()) {
            return Err(ModelError::DuplicateName(area.name.clone()));
        }
    }
    Ok(names)
}

// ---------------------------------------------------------------------------
// PSI

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiResponse {
    pub region_metadata: Vec<AreaMetadata>,
    pub items: Vec<PsiItem>,
    pub api_info: ApiInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiItem {
    pub timestamp: DateTime<FixedOffset>,
    pub update_timestamp: DateTime<FixedOffset>,
    /// Measurement name (e.g. `pm25_sub_index`) to region name to value.
    pub readings: BTreeMap<String, BTreeMap<String, f64>>,
}

impl PsiItem {
    pub fn reading(&self, measure: &str, region: &str) -> Option<f64> {
        self.readings.get(measure)?.get(region).copied()
    }
}

impl PsiResponse {
    pub fn latest(&self) -> Option<&PsiItem> {
        self.items.first()
    }

    /// Checks that every reading names a known region and is non-negative.
    pub fn validate(&self) -> Result<(), ModelError> {
        let names = known_names(&self.region_metadata)?;

        for (idx, item) in self.items.iter().enumerate() {
            for (measure, by_region) in &item.readings {
                for (region, value) in by_region {
                    if !names.contains(region.as_str()) {
                        return Err(ModelError::UnknownArea { item: idx, name: region.clone() });
                    }
                    if *value < 0.0 {
                        return Err(ModelError::NegativeReading {
                            item: idx,
                            measure: measure.clone(),
                            region: region.clone(),
                            value: *value,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 2-hour forecast

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub area_metadata: Vec<AreaMetadata>,
    pub items: Vec<ForecastItem>,
    pub api_info: ApiInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidPeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaForecast {
    pub area: String,
    pub forecast: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub timestamp: DateTime<FixedOffset>,
    pub update_timestamp: DateTime<FixedOffset>,
    pub valid_period: ValidPeriod,
    pub forecasts: Vec<AreaForecast>,
}

impl ForecastItem {
    pub fn forecast_for(&self, area: &str) -> Option<&str> {
        self.forecasts.iter().find(|f| f.area == area).map(|f| f.forecast.as_str())
    }
}

impl ForecastResponse {
    pub fn latest(&self) -> Option<&ForecastItem> {
        self.items.first()
    }

    /// Checks area references and that each valid period is ordered.
    pub fn validate(&self) -> Result<(), ModelError> {
        let names = known_names(&self.area_metadata)?;

        for (idx, item) in self.items.iter().enumerate() {
            let period = &item.valid_period;
            if period.start > period.end {
                return Err(ModelError::InvertedPeriod {
                    item: idx,
                    start: period.start,
                    end: period.end,
                });
            }
            if let Some(unknown) = item.forecasts.iter().find(|f| !names.contains(f.area.as_str())) {
                return Err(ModelError::UnknownArea { item: idx, name: unknown.area.clone() });
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Carpark availability

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarparkResponse {
    pub items: Vec<CarparkItem>,
    pub api_info: ApiInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarparkItem {
    pub timestamp: DateTime<FixedOffset>,
    pub carpark_data: Vec<Carpark>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carpark {
    pub carpark_info: Vec<LotInfo>,
    pub carpark_number: String,
    /// Local time, no offset in the payload.
    pub update_datetime: NaiveDateTime,
}

/// Lot counts arrive as strings and are kept that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotInfo {
    pub total_lots: String,
    pub lot_type: String,
    pub lots_available: String,
}

impl LotInfo {
    pub fn total_lots_count(&self) -> Result<u32, ParseIntError> {
        self.total_lots.trim().parse()
    }

    pub fn lots_available_count(&self) -> Result<u32, ParseIntError> {
        self.lots_available.trim().parse()
    }
}

impl CarparkItem {
    pub fn carpark(&self, number: &str) -> Option<&Carpark> {
        self.carpark_data.iter().find(|c| c.carpark_number == number)
    }
}

impl CarparkResponse {
    pub fn latest(&self) -> Option<&CarparkItem> {
        self.items.first()
    }

    /// Checks that every lot count parses as a non-negative integer.
    pub fn validate(&self) -> Result<(), ModelError> {
        for carpark in self.items.iter().flat_map(|item| &item.carpark_data) {
            for lot in &carpark.carpark_info {
                let checks = [
                    ("total_lots", &lot.total_lots, lot.total_lots_count()),
                    ("lots_available", &lot.lots_available, lot.lots_available_count()),
                ];
                for (field, value, parsed) in checks {
                    if parsed.is_err() {
                        return Err(ModelError::BadLotCount {
                            carpark: carpark.carpark_number.clone(),
                            field,
                            value: value.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
