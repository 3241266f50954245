//! Stats module - view derivation and correlation

mod aggregator;
mod correlation;

pub use aggregator::Aggregator;
pub use correlation::{CorrelationCalculator, CorrelationMatrix, MIN_CORRELATION_ROWS};
