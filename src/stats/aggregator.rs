//! Aggregator Module
//! Derives the country series, latest snapshot and top-N ranking views.

use crate::data::{CountrySeries, Metric, Ranking, Snapshot, Table, View};

/// Pure view derivations over a normalized [`Table`].
pub struct Aggregator;

impl Aggregator {
    /// Records whose location matches `name` exactly (case-sensitive).
    pub fn select_country<'a>(table: &'a Table, name: &str) -> CountrySeries<'a> {
        View::new(table.iter().filter(|r| r.location == name).collect())
    }

    /// Records on the maximum date; empty for an empty table.
    pub fn latest_snapshot(table: &Table) -> Snapshot<'_> {
        let Some(max_date) = table.max_date() else {
            return View::default();
        };
        View::new(table.iter().filter(|r| r.date == max_date).collect())
    }

    /// At most `n` records ordered by descending `metric`; ties keep snapshot order.
    pub fn top_n<'a>(snapshot: &Snapshot<'a>, n: usize, metric: Metric) -> Ranking<'a> {
        let mut ranked = snapshot.records().to_vec();
        ranked.sort_by(|a, b| {
            b.value(metric)
                .partial_cmp(&a.value(metric))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        View::new(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawRecord, SchemaNormalizer};
    use chrono::NaiveDate;

    fn raw(date: &str, location: &str, total_cases: f64) -> RawRecord {
        RawRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            location: Some(location.to_string()),
            total_cases: Some(total_cases),
            ..Default::default()
        }
    }

    fn sample_table() -> Table {
        SchemaNormalizer::finalize(vec![
            raw("2021-01-01", "India", 100.0),
            raw("2021-01-02", "India", 150.0),
            raw("2021-01-02", "China", 500.0),
        ])
    }

    #[test]
    fn test_latest_snapshot_and_top_one() {
        let table = sample_table();

        let latest = Aggregator::latest_snapshot(&table);
        assert_eq!(latest.len(), 2);
        assert!(latest
            .iter()
            .all(|r| r.date == NaiveDate::from_ymd_opt(2021, 1, 2).unwrap()));

        let top = Aggregator::top_n(&latest, 1, Metric::TotalCases);
        assert_eq!(top.len(), 1);
        assert_eq!(top.records()[0].location, "China");
    }

    #[test]
    fn test_select_country_is_exact_match() {
        let table = sample_table();

        let india = Aggregator::select_country(&table, "India");
        assert_eq!(india.values(Metric::TotalCases), vec![100.0, 150.0]);

        assert!(Aggregator::select_country(&table, "india").is_empty());
        assert!(Aggregator::select_country(&table, "Nonexistent").is_empty());
    }

    #[test]
    fn test_latest_snapshot_of_empty_and_single_tables() {
        let empty = Table::default();
        assert!(Aggregator::latest_snapshot(&empty).is_empty());

        let single = SchemaNormalizer::finalize(vec![raw("2021-05-01", "Peru", 7.0)]);
        let snapshot = Aggregator::latest_snapshot(&single);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records()[0], &single.records()[0]);
    }

    #[test]
    fn test_snapshot_keeps_duplicate_locations() {
        let table = SchemaNormalizer::finalize(vec![
            raw("2021-01-03", "Chad", 1.0),
            raw("2021-01-03", "Chad", 2.0),
            raw("2021-01-01", "Peru", 9.0),
        ]);
        let snapshot = Aggregator::latest_snapshot(&table);
        assert_eq!(snapshot.values(Metric::TotalCases), vec![1.0, 2.0]);
    }

    #[test]
    fn test_top_n_bounds_and_stable_ties() {
        let table = SchemaNormalizer::finalize(vec![
            raw("2021-01-01", "A", 5.0),
            raw("2021-01-01", "B", 9.0),
            raw("2021-01-01", "C", 5.0),
            raw("2021-01-01", "D", 1.0),
        ]);
        let snapshot = Aggregator::latest_snapshot(&table);

        let top = Aggregator::top_n(&snapshot, 10, Metric::TotalCases);
        let names: Vec<&str> = top.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);

        let top = Aggregator::top_n(&snapshot, 2, Metric::TotalCases);
        assert_eq!(top.len(), 2);

        assert!(Aggregator::top_n(&View::default(), 10, Metric::TotalCases).is_empty());
    }

    #[test]
    fn test_views_are_idempotent() {
        let table = sample_table();
        let first = Aggregator::latest_snapshot(&table);
        let second = Aggregator::latest_snapshot(&table);
        assert_eq!(first.records(), second.records());
    }
}
