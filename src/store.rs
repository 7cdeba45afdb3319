use crate::models::{NationalYearRecord, StateYearRecord};
use std::collections::{BTreeMap, HashMap};

/// Load-once, read-only snapshot of the normalized national and state time
/// series. Built at startup and shared behind an `Arc`; never mutated.
#[derive(Debug)]
pub struct AggregateStore {
    national: BTreeMap<i32, NationalYearRecord>,
    states: HashMap<String, Vec<StateYearRecord>>,
    min_year: i32,
    max_year: i32,
}

impl AggregateStore {
    /// `national` must be non-empty; the normalizer guarantees that. Records
    /// sharing a year collapse to the last one seen.
    pub fn new(
        national: Vec<NationalYearRecord>,
        states: HashMap<String, Vec<StateYearRecord>>,
    ) -> Self {
        let by_year: BTreeMap<i32, NationalYearRecord> =
            national.into_iter().map(|record| (record.year, record)).collect();
        let min_year = by_year.keys().next().copied().unwrap_or(0);
        let max_year = by_year.keys().next_back().copied().unwrap_or(0);
        Self {
            national: by_year,
            states,
            min_year,
            max_year,
        }
    }

    /// Point lookup; absent years are "no data", never an error.
    pub fn national_for_year(&self, year: i32) -> Option<&NationalYearRecord> {
        self.national.get(&year)
    }

    /// Every state record for the given year, in arbitrary state order.
    pub fn state_records_for_year(&self, year: i32) -> Vec<&StateYearRecord> {
        self.states
            .values()
            .flat_map(|series| series.iter().filter(move |record| record.year == year))
            .collect()
    }

    /// One state's full series, ascending by year.
    pub fn state_series(&self, state_name: &str) -> Option<&[StateYearRecord]> {
        self.states.get(state_name).map(|series| series.as_slice())
    }

    /// The state's record for one year, if any. With duplicate-year rows the
    /// later one wins here (its cumulative total already includes both).
    pub fn state_record(&self, state_name: &str, year: i32) -> Option<&StateYearRecord> {
        self.state_series(state_name)?
            .iter()
            .rev()
            .find(|record| record.year == year)
    }

    pub fn year_domain(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn national(year: i32, teachers: i64) -> NationalYearRecord {
        NationalYearRecord {
            year,
            total_leaders: Some(10),
            total_epps: Some(20),
            total_states_active: Some(5),
            total_teachers: Some(teachers),
        }
    }

    fn state(name: &str, year: i32, cumulative: i64) -> StateYearRecord {
        StateYearRecord {
            state_name: name.to_string(),
            year,
            leaders: Some(1),
            epps: Some(2),
            teachers_this_year: 0,
            cumulative_teachers: cumulative,
        }
    }

    fn sample_store() -> AggregateStore {
        let mut states = HashMap::new();
        states.insert(
            "Ohio".to_string(),
            vec![state("Ohio", 2019, 100), state("Ohio", 2020, 250)],
        );
        states.insert("Iowa".to_string(), vec![state("Iowa", 2020, 40)]);
        AggregateStore::new(vec![national(2020, 300), national(2019, 150)], states)
    }

    #[test]
    fn domain_comes_from_national_years() {
        let store = sample_store();
        assert_eq!(store.year_domain(), (2019, 2020));
    }

    #[test]
    fn national_lookup_is_by_year() {
        let store = sample_store();
        assert_eq!(store.national_for_year(2019).map(|r| r.total_teachers), Some(Some(150)));
        assert!(store.national_for_year(2018).is_none());
    }

    #[test]
    fn state_records_filter_by_year() {
        let store = sample_store();
        let records = store.state_records_for_year(2020);
        assert_eq!(records.len(), 2);
        assert!(store.state_records_for_year(2018).is_empty());
    }

    #[test]
    fn state_record_prefers_latest_duplicate() {
        let mut states = HashMap::new();
        states.insert(
            "Ohio".to_string(),
            vec![state("Ohio", 2020, 100), state("Ohio", 2020, 180)],
        );
        let store = AggregateStore::new(vec![national(2020, 180)], states);
        assert_eq!(
            store.state_record("Ohio", 2020).map(|r| r.cumulative_teachers),
            Some(180)
        );
    }

    #[test]
    fn duplicate_national_years_collapse_to_last() {
        let mut first = national(2020, 100);
        first.total_leaders = Some(1);
        let second = national(2020, 200);
        let store = AggregateStore::new(vec![first, second], HashMap::new());
        assert_eq!(
            store.national_for_year(2020).and_then(|r| r.total_teachers),
            Some(200)
        );
    }
}
