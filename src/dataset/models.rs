use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::indicators::Indicator;

// API response DTOs (kept here so services and api share them)

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IndicatorInfo {
    pub name: String,
    pub top: String,
    pub bottom: String,
    pub invert: bool,
}

impl From<&Indicator> for IndicatorInfo {
    fn from(indicator: &Indicator) -> Self {
        Self {
            name: indicator.name.to_string(),
            top: indicator.top.to_string(),
            bottom: indicator.bottom.to_string(),
            invert: indicator.invert,
        }
    }
}

/// Entry of the city picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CityOption {
    /// City name, suffixed with " *" when it belongs to a selected state
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One line of the chart
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CitySeries {
    pub city: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SeriesResponse {
    pub indicator: IndicatorInfo,
    pub series: Vec<CitySeries>,
    /// Set when nothing matches the filters
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DatasetSummary {
    pub source: String,
    pub observations: usize,
    pub states: usize,
    pub cities: usize,
    pub loaded_at: DateTime<Utc>,
}
