//! B-Tree based property index for fast lookups
//!
//! Maps a property value to the ids of elements holding it. Integers and
//! floats share one numeric key space so `has("age", 3)` finds both `3` and
//! `3.0`. NaN is never indexed: no index-served predicate can be TRUE for it.

use crate::graph::PropertyValue;
use crate::query::predicate::P;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::Hash;
use std::ops::Bound;

/// Totally ordered numeric key (`f64::total_cmp`, zero normalised)
#[derive(Debug, Clone, Copy)]
pub struct NumberKey(f64);

impl NumberKey {
    fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value == 0.0 {
            Some(NumberKey(0.0))
        } else {
            Some(NumberKey(value))
        }
    }
}

impl PartialEq for NumberKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumberKey {}

impl PartialOrd for NumberKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumberKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Ordered index key derived from a property value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexKey {
    Boolean(bool),
    Number(NumberKey),
    String(String),
}

impl IndexKey {
    /// Key for a value; `None` for NaN
    pub fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Boolean(b) => Some(IndexKey::Boolean(*b)),
            // Integers beyond 2^53 lose precision here; lookups may then
            // return neighbours, which the caller's post-filter removes.
            PropertyValue::Integer(i) => NumberKey::new(*i as f64).map(IndexKey::Number),
            PropertyValue::Float(f) => NumberKey::new(*f).map(IndexKey::Number),
            PropertyValue::String(s) => Some(IndexKey::String(s.clone())),
        }
    }
}

/// Index for one property key of one element kind
///
/// Each (value, id) pair is reference counted so a multi-valued vertex
/// property holding the same value twice stays indexed until both copies
/// are removed.
#[derive(Debug, Clone)]
pub struct PropertyIndex<I> {
    /// Value -> (id -> occurrences)
    index: BTreeMap<IndexKey, FxHashMap<I, usize>>,
}

impl<I> PropertyIndex<I>
where
    I: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, value: &PropertyValue, id: I) {
        if let Some(key) = IndexKey::from_value(value) {
            *self.index.entry(key).or_default().entry(id).or_insert(0) += 1;
        }
    }

    pub fn remove(&mut self, value: &PropertyValue, id: &I) {
        let Some(key) = IndexKey::from_value(value) else {
            return;
        };
        if let Some(ids) = self.index.get_mut(&key) {
            if let Some(count) = ids.get_mut(id) {
                *count -= 1;
                if *count == 0 {
                    ids.remove(id);
                }
            }
            if ids.is_empty() {
                self.index.remove(&key);
            }
        }
    }

    pub fn get(&self, value: &PropertyValue) -> Vec<I> {
        IndexKey::from_value(value)
            .and_then(|key| self.index.get(&key))
            .map(|ids| ids.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn range<R>(&self, range: R) -> Vec<I>
    where
        R: std::ops::RangeBounds<IndexKey>,
    {
        let mut result = Vec::new();
        for (_, ids) in self.index.range(range) {
            result.extend(ids.keys().cloned());
        }
        result
    }

    /// Number of distinct indexed values
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Candidate ids for a predicate, or `None` when the predicate cannot be
    /// answered from this index without risking a different answer than the
    /// ternary evaluator would give.
    ///
    /// The candidates may be a superset (ids may repeat across values and
    /// range ends are inclusive); callers deduplicate and post-filter.
    pub fn lookup(&self, predicate: &P) -> Option<Vec<I>> {
        match predicate {
            P::Eq(value) => {
                if value.is_nan() {
                    return None;
                }
                Some(self.get(value))
            }
            P::Within(values) => Some(
                values
                    .iter()
                    .filter(|v| !v.is_nan())
                    .flat_map(|v| self.get(v))
                    .collect(),
            ),
            P::Gt(bound) | P::Gte(bound) => {
                let (key, far) = ordered_domain(bound)?;
                Some(self.range((Bound::Included(key), far)))
            }
            P::Lt(bound) | P::Lte(bound) => {
                let (key, far) = ordered_domain(bound)?;
                let floor = match far {
                    Bound::Unbounded => IndexKey::String(String::new()),
                    _ => IndexKey::Number(NumberKey(f64::NEG_INFINITY)),
                };
                Some(self.range((Bound::Included(floor), Bound::Included(key))))
            }
            P::Neq(_) | P::Without(_) => None,
        }
    }
}

/// For an ordering bound, the bound's own key plus the far end of its kind's
/// key space. Strings extend to `Unbounded` (they sort last); numbers to
/// +infinity. Booleans and NaN are not served.
fn ordered_domain(bound: &PropertyValue) -> Option<(IndexKey, Bound<IndexKey>)> {
    match bound {
        PropertyValue::Integer(_) | PropertyValue::Float(_) => {
            let key = IndexKey::from_value(bound)?;
            Some((key, Bound::Included(IndexKey::Number(NumberKey(f64::INFINITY)))))
        }
        PropertyValue::String(s) => Some((IndexKey::String(s.clone()), Bound::Unbounded)),
        PropertyValue::Boolean(_) => None,
    }
}

impl<I> Default for PropertyIndex<I>
where
    I: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
