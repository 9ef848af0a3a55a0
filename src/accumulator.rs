//! Single-pass grouping over a record sequence.
//!
//! An [`Accumulator`] decides which records take part, which group each one
//! falls in, how a group's value starts and how each further record folds
//! into it. [`accumulate`] runs it over a source, ranks the groups and hands
//! the first `limit` of them to a sink. Only one value per distinct key is
//! held in memory, never the records themselves.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::Result;

pub struct Accumulator<'a, T, K, V> {
    filter: Box<dyn Fn(&T) -> bool + 'a>,
    key: Box<dyn Fn(&T) -> Result<K> + 'a>,
    initialize: Box<dyn Fn(&T) -> V + 'a>,
    update: Box<dyn Fn(&T, V) -> V + 'a>,
}

impl<'a, T, K, V> Accumulator<'a, T, K, V> {
    /// Accepts every record until [`filter`](Self::filter) narrows it.
    ///
    /// A failing `key` aborts the whole aggregation.
    pub fn new(
        key: impl Fn(&T) -> Result<K> + 'a,
        initialize: impl Fn(&T) -> V + 'a,
        update: impl Fn(&T, V) -> V + 'a,
    ) -> Self {
        Accumulator {
            filter: Box::new(|_: &T| true),
            key: Box::new(key),
            initialize: Box::new(initialize),
            update: Box::new(update),
        }
    }

    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.filter = Box::new(predicate);
        self
    }
}

impl<'a, T, K> Accumulator<'a, T, K, u64> {
    /// Counts records per key.
    pub fn counting(key: impl Fn(&T) -> K + 'a) -> Self {
        Self::try_counting(move |record| Ok(key(record)))
    }

    /// Counts records per key, where finding the key can fail.
    pub fn try_counting(key: impl Fn(&T) -> Result<K> + 'a) -> Self {
        Accumulator::new(key, |_| 1, |_, count| count + 1)
    }
}

impl<'a, T, K> Accumulator<'a, T, K, Average> {
    /// Running mean of `value` per key.
    pub fn averaging(key: impl Fn(&T) -> K + 'a, value: impl Fn(&T) -> f64 + 'a) -> Self {
        let value = Rc::new(value);
        let next = Rc::clone(&value);
        Accumulator::new(
            move |record| Ok(key(record)),
            move |record| Average::of((*value)(record)),
            move |record, average: Average| average.add((*next)(record)),
        )
    }
}

/// Sum and count of the values seen so far; divided only when read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Average {
    sum: f64,
    count: u64,
}

impl Average {
    pub fn of(value: f64) -> Self {
        Average {
            sum: value,
            count: 1,
        }
    }

    pub fn add(self, value: f64) -> Self {
        Average {
            sum: self.sum + value,
            count: self.count + 1,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Groups `source` with `accumulator`, sorts the groups with `compare` and
/// passes the first `limit` of them to `sink` in order. A `limit` of 0 passes
/// every group.
///
/// The sort is stable but the order groups enter it is not defined, so equal
/// groups come out in no particular order unless `compare` breaks the tie.
pub fn accumulate<T, K, V, I, C, S>(
    source: I,
    compare: C,
    limit: usize,
    accumulator: &Accumulator<'_, T, K, V>,
    mut sink: S,
) -> Result<()>
where
    I: IntoIterator<Item = Result<T>>,
    K: Eq + Hash,
    C: FnMut(&(K, V), &(K, V)) -> Ordering,
    S: FnMut(K, V) -> Result<()>,
{
    let mut groups: HashMap<K, V> = HashMap::new();
    for record in source {
        let record = record?;
        if !(accumulator.filter)(&record) {
            continue;
        }
        let key = (accumulator.key)(&record)?;
        let value = match groups.remove(&key) {
            Some(value) => (accumulator.update)(&record, value),
            None => (accumulator.initialize)(&record),
        };
        groups.insert(key, value);
    }

    let mut entries: Vec<(K, V)> = groups.into_iter().collect();
    entries.sort_by(compare);
    if limit > 0 {
        entries.truncate(limit);
    }
    for (key, value) in entries {
        sink(key, value)?;
    }
    Ok(())
}

/// Keeps every record passing `filter`, sorts them with `compare` and returns
/// the first `limit` (all of them when `limit` is 0).
pub fn top_n<T, I, F, C>(source: I, filter: F, compare: C, limit: usize) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Result<T>>,
    F: Fn(&T) -> bool,
    C: FnMut(&T, &T) -> Ordering,
{
    let mut kept = Vec::new();
    for record in source {
        let record = record?;
        if filter(&record) {
            kept.push(record);
        }
    }
    kept.sort_by(compare);
    if limit > 0 {
        kept.truncate(limit);
    }
    Ok(kept)
}

pub fn count<T, I, F>(source: I, filter: F) -> Result<u64>
where
    I: IntoIterator<Item = Result<T>>,
    F: Fn(&T) -> bool,
{
    let mut total = 0;
    for record in source {
        if filter(&record?) {
            total += 1;
        }
    }
    Ok(total)
}

pub fn by_key<K: Ord, V>(a: &(K, V), b: &(K, V)) -> Ordering {
    a.0.cmp(&b.0)
}

pub fn by_key_desc<K: Ord, V>(a: &(K, V), b: &(K, V)) -> Ordering {
    b.0.cmp(&a.0)
}

/// Smallest value first, ties by ascending key.
pub fn by_value<K: Ord, V: Ord>(a: &(K, V), b: &(K, V)) -> Ordering {
    a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}

/// Largest value first, ties by ascending key.
pub fn by_value_desc<K: Ord, V: Ord>(a: &(K, V), b: &(K, V)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Highest average first, ties by ascending key.
pub fn by_average_desc<K: Ord>(a: &(K, Average), b: &(K, Average)) -> Ordering {
    b.1.value()
        .total_cmp(&a.1.value())
        .then_with(|| a.0.cmp(&b.0))
}
