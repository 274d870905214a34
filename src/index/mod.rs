//! Temporal index: year/month/day tree over record keys

mod temporal;

pub use temporal::{DayNode, MonthNode, TemporalIndex, YearNode, bucket_range};
