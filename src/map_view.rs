use crate::metrics::format_number;
use crate::models::{BoundaryCollection, StateYearRecord};
use crate::store::AggregateStore;
use crate::ui::html_escape;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MAP_WIDTH: f64 = 960.0;

/// Discrete color scale over ascending inclusive lower bounds, plus a
/// distinct no-data color for absent or zero values.
#[derive(Debug, Clone)]
pub struct ColorScale {
    thresholds: Vec<i64>,
    colors: Vec<String>,
    no_data: String,
}

impl ColorScale {
    pub fn new(thresholds: Vec<i64>, colors: Vec<&str>, no_data: &str) -> Self {
        assert_eq!(colors.len(), thresholds.len() + 1, "one color per bucket");
        assert!(
            thresholds.windows(2).all(|pair| pair[0] < pair[1]),
            "thresholds must be strictly ascending"
        );
        Self {
            thresholds,
            colors: colors.into_iter().map(str::to_string).collect(),
            no_data: no_data.to_string(),
        }
    }

    /// The canonical cumulative-teachers scale.
    pub fn teachers_default() -> Self {
        Self::new(
            vec![1, 301, 601, 901],
            vec!["#f5f5f5", "#F0F9E8", "#76CABB", "#4BA8C9", "#26347E"],
            "#f5f5f5",
        )
    }

    /// Bucket index for a value: the count of thresholds at or below it.
    pub fn bucket(&self, value: i64) -> usize {
        self.thresholds.iter().take_while(|&&t| value >= t).count()
    }

    pub fn color_for(&self, value: Option<i64>) -> &str {
        match value {
            Some(v) if v > 0 => &self.colors[self.bucket(v)],
            _ => &self.no_data,
        }
    }

    pub fn thresholds(&self) -> &[i64] {
        &self.thresholds
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

struct MapRegion {
    name: String,
    rings: Vec<Vec<(f64, f64)>>,
    path_d: String,
}

/// The choropleth. Owns the cached boundary geometry (resize never
/// refetches), the per-region fill map for the rendered year, and the
/// hover/pin interaction state.
pub struct MapView {
    store: Arc<AggregateStore>,
    scale: ColorScale,
    regions: Vec<MapRegion>,
    fills: HashMap<String, String>,
    rendered_year: i32,
    /// Hover and pin interactions only respond at this year (the latest
    /// year in the domain).
    interactive_year: i32,
    hovered: Option<String>,
    pinned: Option<String>,
    width: f64,
    height: f64,
    svg: String,
}

impl MapView {
    pub fn new(
        store: Arc<AggregateStore>,
        boundaries: BoundaryCollection,
        scale: ColorScale,
        width: f64,
        initial_year: i32,
    ) -> Self {
        let (_, max_year) = store.year_domain();
        let regions = boundaries
            .regions
            .into_iter()
            .map(|region| MapRegion {
                name: region.name,
                rings: region.rings,
                path_d: String::new(),
            })
            .collect();
        let mut view = Self {
            store,
            scale,
            regions,
            fills: HashMap::new(),
            rendered_year: initial_year,
            interactive_year: max_year,
            hovered: None,
            pinned: None,
            width: width.max(1.0),
            height: 1.0,
            svg: String::new(),
        };
        view.project();
        view.update_for_year(initial_year);
        view
    }

    /// Re-color every region from the store's records for `year`. The fill
    /// map is replaced wholesale, so repeated calls with the same year are
    /// idempotent and never accumulate nodes.
    pub fn update_for_year(&mut self, year: i32) {
        self.fills = self
            .store
            .state_records_for_year(year)
            .into_iter()
            .map(|record| {
                (
                    record.state_name.clone(),
                    self.scale
                        .color_for(Some(record.cumulative_teachers))
                        .to_string(),
                )
            })
            .collect();
        self.rendered_year = year;
        self.render();
    }

    /// Recompute the projection for a new viewport width from the cached
    /// geometry.
    pub fn resize(&mut self, width: f64) {
        if width <= 0.0 {
            return;
        }
        self.width = width;
        self.project();
        self.render();
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn rendered_year(&self) -> i32 {
        self.rendered_year
    }

    /// Pointer entered a region. Returns tooltip content when the region is
    /// interactive right now; a pinned region suppresses hover entirely.
    pub fn hover_enter(&mut self, state_name: &str) -> Option<String> {
        if self.pinned.as_deref() == Some(state_name) {
            return None;
        }
        let tooltip = self.interactive_tooltip(state_name)?;
        self.hovered = Some(state_name.to_string());
        self.render();
        Some(tooltip)
    }

    /// Pointer left a region. Ignored for the pinned region.
    pub fn hover_leave(&mut self, state_name: &str) {
        if self.pinned.as_deref() == Some(state_name) {
            return;
        }
        if self.hovered.as_deref() == Some(state_name) {
            self.hovered = None;
            self.render();
        }
    }

    /// Click-to-stick. Clicking the pinned region unpins it; clicking any
    /// other region moves the single pin there and returns its tooltip.
    pub fn click(&mut self, state_name: &str) -> Option<String> {
        if self.rendered_year != self.interactive_year {
            return None;
        }
        let was_pinned = self.pinned.as_deref() == Some(state_name);
        self.pinned = None;
        self.hovered = None;
        let tooltip = if was_pinned {
            None
        } else {
            self.tooltip_for(state_name)
        };
        if tooltip.is_some() {
            self.pinned = Some(state_name.to_string());
        }
        self.render();
        tooltip
    }

    pub fn pinned_region(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    fn interactive_tooltip(&self, state_name: &str) -> Option<String> {
        if self.rendered_year != self.interactive_year {
            return None;
        }
        self.tooltip_for(state_name)
    }

    fn tooltip_for(&self, state_name: &str) -> Option<String> {
        let record = self.store.state_record(state_name, self.interactive_year)?;
        let series = self.store.state_series(state_name).unwrap_or(&[]);
        Some(render_tooltip(state_name, record, series))
    }

    // Fit the lon/lat bounding box to the viewport, latitude flipped.
    fn project(&mut self) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for region in &self.regions {
            for ring in &region.rings {
                for &(x, y) in ring {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let scale = self.width / span_x;
        self.height = self.width * span_y / span_x;

        for region in &mut self.regions {
            let mut d = String::new();
            for ring in &region.rings {
                for (i, &(x, y)) in ring.iter().enumerate() {
                    let px = (x - min_x) * scale;
                    let py = (max_y - y) * scale;
                    let cmd = if i == 0 { 'M' } else { 'L' };
                    d.push_str(&format!("{cmd}{px:.1},{py:.1}"));
                }
                d.push('Z');
            }
            region.path_d = d;
        }
    }

    fn render(&mut self) {
        let mut out = format!(
            r#"<svg class="map-svg" viewBox="0 0 {:.0} {:.0}" preserveAspectRatio="xMidYMid meet">"#,
            self.width, self.height
        );
        for region in &self.regions {
            let fill = self
                .fills
                .get(&region.name)
                .map(String::as_str)
                .unwrap_or_else(|| self.scale.color_for(None));
            let emphasized = self.pinned.as_deref() == Some(region.name.as_str())
                || self.hovered.as_deref() == Some(region.name.as_str());
            let opacity = if emphasized { "0.8" } else { "1" };
            out.push_str(&format!(
                r##"<path class="state" data-state="{name}" d="{d}" fill="{fill}" opacity="{opacity}" stroke="#fff" stroke-width="0.5" vector-effect="non-scaling-stroke"></path>"##,
                name = html_escape(&region.name),
                d = region.path_d,
            ));
        }
        out.push_str("</svg>");
        self.svg = out;
    }
}

fn render_tooltip(state_name: &str, record: &StateYearRecord, series: &[StateYearRecord]) -> String {
    let mut out = format!(
        r#"<div class="tooltip-header"><span class="tooltip-state-name">{}</span></div>"#,
        html_escape(state_name)
    );
    let cards: [(&str, Option<i64>, fn(&StateYearRecord) -> i64); 3] = [
        ("EPP Leaders", record.leaders, |r| r.leaders.unwrap_or(0)),
        ("EPPs", record.epps, |r| r.epps.unwrap_or(0)),
        (
            "Teachers Impacted",
            Some(record.cumulative_teachers),
            |r| r.cumulative_teachers,
        ),
    ];
    for (label, value, accessor) in cards {
        let sparkline = if series.len() >= 2 {
            let points: Vec<(i32, i64)> =
                series.iter().map(|r| (r.year, accessor(r))).collect();
            format!(
                r#"<div class="sparkline-container">{}</div>"#,
                sparkline_svg(&points, 64.0, 20.0)
            )
        } else {
            String::new()
        };
        out.push_str(&format!(
            r#"<div class="tooltip-metric-card"><div class="tooltip-metric-content"><div><div class="tooltip-metric-label">{label}</div><div class="tooltip-metric-value">{value}</div></div>{sparkline}</div></div>"#,
            value = format_number(value.unwrap_or(0)),
        ));
    }
    out
}

fn sparkline_svg(points: &[(i32, i64)], width: f64, height: f64) -> String {
    let margin = 2.0;
    let inner_w = width - margin * 2.0;
    let inner_h = height - margin * 2.0;
    let min_year = points.iter().map(|p| p.0).min().unwrap_or(0) as f64;
    let max_year = points.iter().map(|p| p.0).max().unwrap_or(0) as f64;
    let max_value = points.iter().map(|p| p.1).max().unwrap_or(0).max(1) as f64;
    let year_span = (max_year - min_year).max(1.0);

    let project = |(year, value): (i32, i64)| {
        let x = margin + (year as f64 - min_year) / year_span * inner_w;
        let y = margin + inner_h - (value as f64 / max_value) * inner_h;
        (x, y)
    };

    let mut d = String::new();
    for (i, &point) in points.iter().enumerate() {
        let (x, y) = project(point);
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{x:.1},{y:.1}"));
    }

    let mut out = format!(
        r##"<svg class="metric-sparkline" width="{width:.0}" height="{height:.0}"><path class="sparkline-line" fill="none" stroke="#0f6455" stroke-width="1.5" d="{d}"></path>"##
    );
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        for point in [first, last] {
            let (x, y) = project(point);
            out.push_str(&format!(
                r##"<circle class="sparkline-point" cx="{x:.1}" cy="{y:.1}" r="1.75" fill="#0f6455"></circle>"##
            ));
        }
    }
    out.push_str("</svg>");
    out
}
