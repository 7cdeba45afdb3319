use crate::errors::LoadError;
use crate::models::{NationalYearRecord, RawRow, StateYearRecord};
use crate::store::AggregateStore;
use std::collections::HashMap;
use tracing::warn;

const STATE_NAME_COLUMN: &str = "state-full";

/// Normalize the two required tables into the aggregate store. Runs once at
/// startup; an empty or unusable required table is a load error, never a
/// silently empty store.
pub fn build_store(
    state_rows: &[RawRow],
    national_rows: &[RawRow],
) -> Result<AggregateStore, LoadError> {
    if national_rows.is_empty() {
        return Err(LoadError::new("national data", "table is empty"));
    }
    if state_rows.is_empty() {
        return Err(LoadError::new("state data", "table is empty"));
    }

    let national = normalize_national(national_rows);
    if national.is_empty() {
        return Err(LoadError::new("national data", "no rows with a usable year"));
    }

    Ok(AggregateStore::new(national, normalize_states(state_rows)))
}

fn normalize_national(rows: &[RawRow]) -> Vec<NationalYearRecord> {
    let mut records: Vec<NationalYearRecord> = rows
        .iter()
        .filter_map(|row| {
            let year = valid_year(row)?;
            Some(NationalYearRecord {
                year,
                total_leaders: row.int("total-leaders"),
                total_epps: row.int("total-epps"),
                total_states_active: row.int("total-states-active"),
                total_teachers: row.int("total-teachers"),
            })
        })
        .collect();
    // Input order is not trusted.
    records.sort_by_key(|record| record.year);
    records
}

fn normalize_states(rows: &[RawRow]) -> HashMap<String, Vec<StateYearRecord>> {
    let mut groups: HashMap<String, Vec<&RawRow>> = HashMap::new();
    for row in rows {
        let Some(name) = row.text(STATE_NAME_COLUMN) else {
            warn!("skipping state row without a {STATE_NAME_COLUMN} value");
            continue;
        };
        if valid_year(row).is_none() {
            warn!("skipping {name} row without a 4-digit year");
            continue;
        }
        groups.entry(name.to_string()).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(name, mut group)| {
            // Stable sort keeps duplicate-year rows in input order; both
            // contribute to the running sum.
            group.sort_by_key(|&row| valid_year(row));
            let mut running_total = 0i64;
            let series = group
                .into_iter()
                .map(|row| {
                    let teachers = row.int("teachers").unwrap_or(0);
                    running_total += teachers;
                    StateYearRecord {
                        state_name: name.clone(),
                        year: valid_year(row).unwrap_or_default(),
                        leaders: row.int("leaders"),
                        epps: row.int("epps"),
                        teachers_this_year: teachers,
                        cumulative_teachers: running_total,
                    }
                })
                .collect();
            (name, series)
        })
        .collect()
}

fn valid_year(row: &RawRow) -> Option<i32> {
    let year = row.int("year")?;
    (1000..=9999).contains(&year).then_some(year as i32)
}

/// Reduce the optional UI-text table to `element_id -> content`.
pub fn ui_text_map(rows: &[RawRow]) -> HashMap<String, String> {
    rows.iter()
        .filter_map(|row| {
            Some((
                row.text("element_id")?.to_string(),
                row.text("content")?.to_string(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawValue;

    fn state_row(name: &str, year: f64, teachers: Option<f64>) -> RawRow {
        let mut row = RawRow::default();
        row.insert(STATE_NAME_COLUMN, RawValue::Text(name.to_string()));
        row.insert("year", RawValue::Number(year));
        row.insert("leaders", RawValue::Number(3.0));
        row.insert("epps", RawValue::Number(4.0));
        match teachers {
            Some(n) => row.insert("teachers", RawValue::Number(n)),
            None => row.insert("teachers", RawValue::Empty),
        }
        row
    }

    fn national_row(year: &str, teachers: &str) -> RawRow {
        let mut row = RawRow::default();
        row.insert("year", RawValue::Text(year.to_string()));
        row.insert("total-leaders", RawValue::Number(10.0));
        row.insert("total-epps", RawValue::Number(20.0));
        row.insert("total-states-active", RawValue::Number(5.0));
        row.insert("total-teachers", RawValue::Text(teachers.to_string()));
        row
    }

    #[test]
    fn cumulative_totals_are_running_sums_after_year_sort() {
        let rows = vec![
            state_row("Ohio", 2021.0, Some(30.0)),
            state_row("Ohio", 2019.0, Some(10.0)),
            state_row("Ohio", 2020.0, Some(20.0)),
        ];
        let store = build_store(&rows, &[national_row("2019", "10"), national_row("2021", "60")])
            .expect("build");
        let series = store.state_series("Ohio").expect("series");
        let cumulative: Vec<i64> = series.iter().map(|r| r.cumulative_teachers).collect();
        assert_eq!(cumulative, vec![10, 30, 60]);
        assert!(cumulative.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn duplicate_state_year_rows_both_sum() {
        let rows = vec![
            state_row("Ohio", 2020.0, Some(15.0)),
            state_row("Ohio", 2020.0, Some(25.0)),
        ];
        let store =
            build_store(&rows, &[national_row("2020", "40")]).expect("build");
        let series = store.state_series("Ohio").expect("series");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].cumulative_teachers, 15);
        assert_eq!(series[1].cumulative_teachers, 40);
    }

    #[test]
    fn missing_teachers_default_to_zero() {
        let rows = vec![
            state_row("Iowa", 2019.0, None),
            state_row("Iowa", 2020.0, Some(12.0)),
        ];
        let store = build_store(&rows, &[national_row("2019", "0"), national_row("2020", "12")])
            .expect("build");
        let series = store.state_series("Iowa").expect("series");
        assert_eq!(series[0].teachers_this_year, 0);
        assert_eq!(series[0].cumulative_teachers, 0);
        assert_eq!(series[1].cumulative_teachers, 12);
    }

    #[test]
    fn unparseable_national_fields_become_none() {
        let store = build_store(
            &[state_row("Ohio", 2020.0, Some(1.0))],
            &[national_row("2020", "not-a-number")],
        )
        .expect("build");
        let record = store.national_for_year(2020).expect("record");
        assert_eq!(record.total_teachers, None);
        assert_eq!(record.total_leaders, Some(10));
    }

    #[test]
    fn national_rows_sort_ascending_by_year() {
        let store = build_store(
            &[state_row("Ohio", 2020.0, Some(1.0))],
            &[
                national_row("2022", "3"),
                national_row("2020", "1"),
                national_row("2021", "2"),
            ],
        )
        .expect("build");
        assert_eq!(store.year_domain(), (2020, 2022));
    }

    #[test]
    fn rows_without_usable_year_are_skipped() {
        let mut bad = state_row("Ohio", 2020.0, Some(5.0));
        bad.insert("year", RawValue::Text("soon".to_string()));
        let good = state_row("Ohio", 2021.0, Some(7.0));
        let store =
            build_store(&[bad, good], &[national_row("2021", "7")]).expect("build");
        assert_eq!(store.state_series("Ohio").map(|s| s.len()), Some(1));
    }

    #[test]
    fn empty_required_tables_are_load_errors() {
        assert!(build_store(&[], &[national_row("2020", "1")]).is_err());
        assert!(build_store(&[state_row("Ohio", 2020.0, Some(1.0))], &[]).is_err());
    }

    #[test]
    fn ui_text_reduces_to_id_content_pairs() {
        let mut row = RawRow::default();
        row.insert("element_id", RawValue::Text("header_title".to_string()));
        row.insert("content", RawValue::Text("Our Impact".to_string()));
        let mut incomplete = RawRow::default();
        incomplete.insert("element_id", RawValue::Text("orphan".to_string()));

        let map = ui_text_map(&[row, incomplete]);
        assert_eq!(map.get("header_title").map(String::as_str), Some("Our Impact"));
        assert!(!map.contains_key("orphan"));
    }
}
