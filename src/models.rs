use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One CSV cell after best-effort dynamic typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Empty,
}

/// One row of an input table, keyed by header name. Fields may be missing.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        self.cells.insert(key.into(), value);
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.cells.get(key)? {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Best-effort integer read: numeric cells truncate, text cells parse.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.cells.get(key)? {
            RawValue::Number(n) if n.is_finite() => Some(*n as i64),
            RawValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|v| matches!(v, RawValue::Empty))
    }
}

/// One state's numbers for one year, annotated with the running total of
/// teachers over all of that state's years up to and including this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateYearRecord {
    pub state_name: String,
    pub year: i32,
    pub leaders: Option<i64>,
    pub epps: Option<i64>,
    pub teachers_this_year: i64,
    pub cumulative_teachers: i64,
}

/// National aggregate for one year. Fields that fail the numeric parse stay
/// `None` and display as zero downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalYearRecord {
    pub year: i32,
    pub total_leaders: Option<i64>,
    pub total_epps: Option<i64>,
    pub total_states_active: Option<i64>,
    pub total_teachers: Option<i64>,
}

/// Named polygon set from the geographic boundary source. Rings are lon/lat
/// coordinate loops, consumed opaquely by the map view.
#[derive(Debug, Clone)]
pub struct BoundaryRegion {
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone)]
pub struct BoundaryCollection {
    pub regions: Vec<BoundaryRegion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YearResponse {
    pub year: i32,
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Debug, Deserialize)]
pub struct TimelineRequest {
    pub action: String,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub year: i32,
    pub mode: String,
    /// True when this event moved the selected year (and views re-rendered).
    pub changed: bool,
    pub map_svg: Option<String>,
    pub metrics_html: Option<String>,
    pub timeline_html: String,
}

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub state: String,
    pub entering: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegionClickRequest {
    pub state: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TooltipResponse {
    pub tooltip: Option<String>,
    pub map_svg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResizeRequest {
    pub width: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MapResponse {
    pub map_svg: String,
}
