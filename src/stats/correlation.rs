//! Correlation Module
//! Pairwise Pearson correlation across the four count metrics of a series.

use crate::data::{Metric, View};
use statrs::statistics::Statistics;

/// Fewer valid rows than this and correlation is undefined.
pub const MIN_CORRELATION_ROWS: usize = 2;

/// Square correlation matrix indexed in [`Metric::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub metrics: [Metric; 4],
    pub values: [[f64; 4]; 4],
    pub rows: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Metric, b: Metric) -> f64 {
        let i = Self::index(a);
        let j = Self::index(b);
        self.values[i][j]
    }

    fn index(metric: Metric) -> usize {
        Metric::ALL
            .iter()
            .position(|m| *m == metric)
            .unwrap_or_default()
    }
}

pub struct CorrelationCalculator;

impl CorrelationCalculator {
    /// Rows where all four metrics are finite, as metric columns.
    pub fn valid_columns(series: &View<'_>) -> [Vec<f64>; 4] {
        let mut columns: [Vec<f64>; 4] = Default::default();
        for record in series.iter() {
            let row = Metric::ALL.map(|m| record.value(m));
            if row.iter().all(|v| v.is_finite()) {
                for (column, value) in columns.iter_mut().zip(row) {
                    column.push(value);
                }
            }
        }
        columns
    }

    /// Correlation matrix, or `None` when fewer than two valid rows exist.
    pub fn compute(series: &View<'_>) -> Option<CorrelationMatrix> {
        let columns = Self::valid_columns(series);
        let rows = columns[0].len();
        if rows < MIN_CORRELATION_ROWS {
            return None;
        }

        let mut values = [[f64::NAN; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                values[i][j] = if i == j {
                    if columns[i].iter().std_dev() > 0.0 {
                        1.0
                    } else {
                        f64::NAN
                    }
                } else {
                    Self::pearson(&columns[i], &columns[j])
                };
            }
        }

        Some(CorrelationMatrix {
            metrics: Metric::ALL,
            values,
            rows,
        })
    }

    /// Pearson coefficient; NaN when either side has zero variance.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < MIN_CORRELATION_ROWS {
            return f64::NAN;
        }

        let sx = x.iter().std_dev();
        let sy = y.iter().std_dev();
        if sx == 0.0 || sy == 0.0 || sx.is_nan() || sy.is_nan() {
            return f64::NAN;
        }

        let cov = x.iter().covariance(y.iter());
        (cov / (sx * sy)).clamp(-1.0, 1.0)
    }
}
