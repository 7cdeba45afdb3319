use crate::models::NationalYearRecord;
use crate::store::AggregateStore;
use std::sync::Arc;

pub type MapUpdateFn = Box<dyn FnMut(i32) + Send>;
pub type MetricsUpdateFn =
    Box<dyn FnMut(i32, Option<NationalYearRecord>, Option<NationalYearRecord>) + Send>;

/// The single authority for the selected year. Year changes originate in the
/// timeline, land here, and fan out synchronously to the registered view
/// callbacks. Callbacks must not call back into `set_year`.
pub struct YearCoordinator {
    store: Arc<AggregateStore>,
    selected: i32,
    min_year: i32,
    max_year: i32,
    map_update: Option<MapUpdateFn>,
    metrics_update: Option<MetricsUpdateFn>,
}

impl YearCoordinator {
    pub fn new(store: Arc<AggregateStore>) -> Self {
        let (min_year, max_year) = store.year_domain();
        Self {
            store,
            selected: min_year,
            min_year,
            max_year,
            map_update: None,
            metrics_update: None,
        }
    }

    /// Register the map's update callback. Last registration wins;
    /// re-initializing the view replaces it rather than stacking listeners.
    pub fn on_map_update(&mut self, callback: impl FnMut(i32) + Send + 'static) {
        self.map_update = Some(Box::new(callback));
    }

    /// Register the metrics callback; receives the new year plus the current
    /// and previous-year national records. Last registration wins.
    pub fn on_metrics_update(
        &mut self,
        callback: impl FnMut(i32, Option<NationalYearRecord>, Option<NationalYearRecord>)
        + Send
        + 'static,
    ) {
        self.metrics_update = Some(Box::new(callback));
    }

    pub fn selected_year(&self) -> i32 {
        self.selected
    }

    pub fn year_domain(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }

    /// Clamp into the domain, record the new selection, and push it to the
    /// views. Returns the year actually applied.
    pub fn set_year(&mut self, year: i32) -> i32 {
        let year = year.clamp(self.min_year, self.max_year);
        self.selected = year;

        if let Some(update) = self.map_update.as_mut() {
            update(year);
        }
        if let Some(update) = self.metrics_update.as_mut() {
            let current = self.store.national_for_year(year).cloned();
            let previous = self.store.national_for_year(year - 1).cloned();
            update(year, current, previous);
        }
        year
    }
}
