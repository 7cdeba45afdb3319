use crate::config::Config;
use crate::coordinator::YearCoordinator;
use crate::errors::LoadError;
use crate::fetch;
use crate::legend;
use crate::map_view::{ColorScale, DEFAULT_MAP_WIDTH, MapView};
use crate::metrics::MetricsView;
use crate::models::{BoundaryCollection, RawRow};
use crate::normalize;
use crate::store::AggregateStore;
use crate::timeline::{TimelineControl, TimelineEvent, TimelineMode};
use crate::ui;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Everything behind the page: the read-only store, the year coordinator,
/// and the three views. Owned explicitly and passed by handle; no ambient
/// globals.
pub struct Dashboard {
    store: Arc<AggregateStore>,
    coordinator: YearCoordinator,
    map: Option<Arc<Mutex<MapView>>>,
    map_error: Option<String>,
    metrics: Arc<Mutex<MetricsView>>,
    timeline: TimelineControl,
    header: HashMap<String, String>,
    legend_html: String,
}

/// Startup pipeline: fetch the three tables and the boundary payload
/// concurrently, then build the dashboard. A required-table failure is
/// fatal; UI text and boundaries degrade.
pub async fn load(client: &Client, config: &Config) -> Result<Dashboard, LoadError> {
    let (state_rows, national_rows, ui_rows, boundaries) = tokio::join!(
        fetch::fetch_table(client, "state data", &config.state_data_url),
        fetch::fetch_table(client, "national data", &config.national_data_url),
        fetch::fetch_table(client, "ui text", &config.ui_text_url),
        fetch::fetch_boundaries(client, &config.boundary_urls),
    );

    let ui_rows = match ui_rows {
        Ok(rows) => Some(rows),
        Err(err) => {
            warn!("ui text unavailable, using defaults: {err}");
            None
        }
    };

    Dashboard::initialize(&state_rows?, &national_rows?, ui_rows.as_deref(), boundaries)
}

impl Dashboard {
    pub fn initialize(
        state_rows: &[RawRow],
        national_rows: &[RawRow],
        ui_rows: Option<&[RawRow]>,
        boundaries: Result<BoundaryCollection, LoadError>,
    ) -> Result<Self, LoadError> {
        let store = Arc::new(normalize::build_store(state_rows, national_rows)?);
        let (min_year, max_year) = store.year_domain();
        info!("dashboard initialized with year domain {min_year}-{max_year}");

        let scale = ColorScale::teachers_default();
        let legend_html = legend::render_legend(&scale);
        let header = ui_rows.map(normalize::ui_text_map).unwrap_or_default();

        // Metrics seed: the minimum year with no growth comparison.
        let metrics = Arc::new(Mutex::new(MetricsView::new(
            store.national_for_year(min_year),
            None,
        )));

        // A boundary failure degrades the map to an error panel; the other
        // views still render.
        let (map, map_error) = match boundaries {
            Ok(boundaries) => (
                Some(Arc::new(Mutex::new(MapView::new(
                    Arc::clone(&store),
                    boundaries,
                    scale,
                    DEFAULT_MAP_WIDTH,
                    min_year,
                )))),
                None,
            ),
            Err(err) => {
                warn!("map disabled: {err}");
                (None, Some(err.to_string()))
            }
        };

        let mut coordinator = YearCoordinator::new(Arc::clone(&store));
        if let Some(map) = &map {
            let view = Arc::clone(map);
            coordinator.on_map_update(move |year| {
                lock(&view).update_for_year(year);
            });
        }
        let view = Arc::clone(&metrics);
        coordinator.on_metrics_update(move |_year, current, previous| {
            lock(&view).update(current.as_ref(), previous.as_ref());
        });

        Ok(Self {
            store,
            coordinator,
            map,
            map_error,
            metrics,
            timeline: TimelineControl::new(min_year, max_year),
            header,
            legend_html,
        })
    }

    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub fn selected_year(&self) -> i32 {
        self.coordinator.selected_year()
    }

    pub fn year_domain(&self) -> (i32, i32) {
        self.coordinator.year_domain()
    }

    pub fn timeline_mode(&self) -> TimelineMode {
        self.timeline.mode()
    }

    /// Drive the timeline; when it emits a year, fan it out through the
    /// coordinator. Returns whether the selected year moved.
    pub fn timeline_event(&mut self, event: TimelineEvent) -> bool {
        match self.timeline.handle(event) {
            Some(year) => {
                self.coordinator.set_year(year);
                true
            }
            None => false,
        }
    }

    pub fn hover(&mut self, state_name: &str, entering: bool) -> Option<String> {
        let map = self.map.as_ref()?;
        let mut view = lock(map);
        if entering {
            view.hover_enter(state_name)
        } else {
            view.hover_leave(state_name);
            None
        }
    }

    pub fn region_click(&mut self, state_name: &str) -> Option<String> {
        self.map.as_ref().and_then(|map| lock(map).click(state_name))
    }

    pub fn resize_map(&mut self, width: f64) {
        if let Some(map) = &self.map {
            lock(map).resize(width);
        }
    }

    pub fn map_html(&self) -> String {
        match &self.map {
            Some(map) => lock(map).svg().to_string(),
            None => ui::render_error_panel(
                "Error loading map data. Please try refreshing the page.",
                self.map_error.as_deref().unwrap_or("boundary data unavailable"),
            ),
        }
    }

    pub fn metrics_html(&self) -> String {
        lock(&self.metrics).html().to_string()
    }

    pub fn timeline_html(&self) -> String {
        self.timeline.render()
    }

    pub fn legend_html(&self) -> &str {
        &self.legend_html
    }

    pub fn render_page(&self) -> String {
        ui::render_index(
            &self.header,
            &self.metrics_html(),
            &self.map_html(),
            self.legend_html(),
            &self.timeline_html(),
        )
    }
}

// A poisoned view lock only happens if a render panicked; keep serving the
// last consistent state instead of propagating the panic.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundaryRegion, RawValue};

    fn state_row(name: &str, year: i32, teachers: i64) -> RawRow {
        let mut row = RawRow::default();
        row.insert("state-full", RawValue::Text(name.to_string()));
        row.insert("year", RawValue::Number(year as f64));
        row.insert("leaders", RawValue::Number(2.0));
        row.insert("epps", RawValue::Number(3.0));
        row.insert("teachers", RawValue::Number(teachers as f64));
        row
    }

    fn national_row(year: i32, teachers: i64) -> RawRow {
        let mut row = RawRow::default();
        row.insert("year", RawValue::Number(year as f64));
        row.insert("total-leaders", RawValue::Number(100.0 + year as f64));
        row.insert("total-epps", RawValue::Number(40.0));
        row.insert("total-states-active", RawValue::Number(20.0));
        row.insert("total-teachers", RawValue::Number(teachers as f64));
        row
    }

    fn boundaries() -> BoundaryCollection {
        BoundaryCollection {
            regions: vec![BoundaryRegion {
                name: "Ohio".to_string(),
                rings: vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]],
            }],
        }
    }

    fn dashboard() -> Dashboard {
        let state_rows: Vec<RawRow> = (2015..=2025)
            .map(|year| state_row("Ohio", year, 100))
            .collect();
        let national_rows: Vec<RawRow> = (2015..=2025)
            .map(|year| national_row(year, (year - 2014) as i64 * 100))
            .collect();
        Dashboard::initialize(&state_rows, &national_rows, None, Ok(boundaries()))
            .expect("initialize")
    }

    #[test]
    fn initial_render_is_the_minimum_year_with_no_growth() {
        let dashboard = dashboard();
        assert_eq!(dashboard.selected_year(), 2015);
        assert_eq!(dashboard.year_domain(), (2015, 2025));
        let metrics = dashboard.metrics_html();
        assert!(metrics.contains("100")); // 2015 teachers
        assert!(!metrics.contains("metric-growth"));
    }

    #[test]
    fn timeline_release_updates_both_views() {
        let mut dashboard = dashboard();
        assert!(dashboard.timeline_event(TimelineEvent::Release(2020)));
        assert_eq!(dashboard.selected_year(), 2020);
        let metrics = dashboard.metrics_html();
        // 2020 national teachers and growth vs. 2019.
        assert!(metrics.contains("600"));
        assert!(metrics.contains("+20%"));
        // Ohio cumulative at 2020 is 600, the 301-600 bucket.
        assert!(dashboard.map_html().contains("#76CABB"));
    }

    #[test]
    fn repeated_release_at_same_year_changes_nothing() {
        let mut dashboard = dashboard();
        assert!(dashboard.timeline_event(TimelineEvent::Release(2020)));
        assert!(!dashboard.timeline_event(TimelineEvent::Release(2020)));
    }

    #[test]
    fn boundary_failure_degrades_only_the_map() {
        let state_rows = vec![state_row("Ohio", 2020, 10)];
        let national_rows = vec![national_row(2020, 10)];
        let dashboard = Dashboard::initialize(
            &state_rows,
            &national_rows,
            None,
            Err(LoadError::new("geographic boundaries", "all sources failed")),
        )
        .expect("initialize");
        assert!(dashboard.map_html().contains("error-message"));
        assert!(dashboard.metrics_html().contains("metric-card"));
        assert!(dashboard.timeline_html().contains("timeline-slider"));
    }

    #[test]
    fn missing_required_table_fails_initialization() {
        let national_rows = vec![national_row(2020, 10)];
        assert!(Dashboard::initialize(&[], &national_rows, None, Ok(boundaries())).is_err());
    }

    #[test]
    fn page_render_contains_all_three_containers() {
        let dashboard = dashboard();
        let page = dashboard.render_page();
        assert!(page.contains(r#"id="metrics""#));
        assert!(page.contains(r#"id="map""#));
        assert!(page.contains(r#"id="timeline""#));
        assert!(page.contains("legend-container"));
    }
}
