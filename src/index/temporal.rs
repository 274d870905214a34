//! Year/month/day tree of record references for date-bucket queries.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::domain::RecordKey;

/// A day leaf holding the records created on that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayNode {
    day: u32,
    records: Vec<RecordKey>,
}

/// A month node holding day children, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthNode {
    month: u32,
    days: Vec<DayNode>,
}

/// A year node holding month children, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearNode {
    year: i32,
    months: Vec<MonthNode>,
}

impl DayNode {
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Record keys indexed under this day, in insertion order.
    pub fn records(&self) -> &[RecordKey] {
        &self.records
    }
}

impl MonthNode {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn days(&self) -> &[DayNode] {
        &self.days
    }
}

impl YearNode {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[MonthNode] {
        &self.months
    }
}

/// Half-open time range `[from, to)` covered by a tree bucket.
///
/// Day buckets end at the following midnight, month buckets at the first of
/// the next month, year buckets at January 1st of the next year, matching
/// the exclusive upper bound of [`TemporalIndex::query`].
pub fn bucket_range(
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start_of = |y: i32, m: u32, d: u32| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single();
    match (month, day) {
        (None, _) => Some((start_of(year, 1, 1)?, start_of(year + 1, 1, 1)?)),
        (Some(m), None) => {
            let from = start_of(year, m, 1)?;
            let to = if m == 12 {
                start_of(year + 1, 1, 1)?
            } else {
                start_of(year, m + 1, 1)?
            };
            Some((from, to))
        }
        (Some(m), Some(d)) => {
            let from = start_of(year, m, d)?;
            Some((from, from + chrono::Duration::days(1)))
        }
    }
}

/// Year→month→day tree of record references.
///
/// Children at every level are kept strictly descending by their time unit
/// (newest first); a node for a given year/month/day is created lazily on
/// first insertion and never duplicated. The tree gates insertion and
/// drives bucket navigation; the visible entry list is always recomputed by
/// a fresh range query, never cached on the nodes.
///
/// Rebuilt wholesale from the filesystem listing at startup; never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct TemporalIndex {
    years: Vec<YearNode>,
}

impl TemporalIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Year nodes, newest first.
    pub fn years(&self) -> &[YearNode] {
        &self.years
    }

    /// Total number of indexed records.
    pub fn len(&self) -> usize {
        self.days().map(|d| d.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Places a record under its year/month/day, creating ancestors as
    /// needed. Each level keeps its children sorted descending, so the
    /// insertion point is found by a search over siblings at every depth.
    pub fn insert(&mut self, key: RecordKey, ts: DateTime<Utc>) {
        let (y, m, d) = (ts.year(), ts.month(), ts.day());

        let year_pos = match self.years.binary_search_by(|n| y.cmp(&n.year)) {
            Ok(pos) => pos,
            Err(pos) => {
                self.years.insert(
                    pos,
                    YearNode {
                        year: y,
                        months: Vec::new(),
                    },
                );
                pos
            }
        };
        let months = &mut self.years[year_pos].months;

        let month_pos = match months.binary_search_by(|n| m.cmp(&n.month)) {
            Ok(pos) => pos,
            Err(pos) => {
                months.insert(
                    pos,
                    MonthNode {
                        month: m,
                        days: Vec::new(),
                    },
                );
                pos
            }
        };
        let days = &mut months[month_pos].days;

        let day_pos = match days.binary_search_by(|n| d.cmp(&n.day)) {
            Ok(pos) => pos,
            Err(pos) => {
                days.insert(
                    pos,
                    DayNode {
                        day: d,
                        records: Vec::new(),
                    },
                );
                pos
            }
        };
        days[day_pos].records.push(key);
    }

    /// Removes a record reference, pruning emptied nodes.
    pub fn remove(&mut self, key: &RecordKey, ts: DateTime<Utc>) {
        let (y, m, d) = (ts.year(), ts.month(), ts.day());

        let Ok(year_pos) = self.years.binary_search_by(|n| y.cmp(&n.year)) else {
            return;
        };
        let months = &mut self.years[year_pos].months;
        let Ok(month_pos) = months.binary_search_by(|n| m.cmp(&n.month)) else {
            return;
        };
        let days = &mut months[month_pos].days;
        let Ok(day_pos) = days.binary_search_by(|n| d.cmp(&n.day)) else {
            return;
        };

        days[day_pos].records.retain(|k| k != key);
        if days[day_pos].records.is_empty() {
            days.remove(day_pos);
        }
        if months[month_pos].days.is_empty() {
            months.remove(month_pos);
        }
        if self.years[year_pos].months.is_empty() {
            self.years.remove(year_pos);
        }
    }

    /// Returns all records whose derived timestamp satisfies
    /// `from <= ts < to`; either bound may be absent. Result ordering is
    /// undefined here; callers sort.
    pub fn query(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<&RecordKey> {
        let mut out = Vec::new();
        for day in self.days() {
            for key in &day.records {
                let ts = key.timestamp();
                if from.is_none_or(|f| f <= ts) && to.is_none_or(|t| ts < t) {
                    out.push(key);
                }
            }
        }
        out
    }

    fn days(&self) -> impl Iterator<Item = &DayNode> {
        self.years
            .iter()
            .flat_map(|y| &y.months)
            .flat_map(|m| &m.days)
    }
}
