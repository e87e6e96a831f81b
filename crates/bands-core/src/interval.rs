//! Closed-interval algebra over a single maneuver axis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed numeric range `[low, up]`.
///
/// Intervals are compared lexicographically by `(low, up)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub up: f64,
}

impl Interval {
    pub fn new(low: f64, up: f64) -> Self {
        Self { low, up }
    }

    /// Closed membership test.
    pub fn contains(&self, x: f64) -> bool {
        self.low <= x && x <= self.up
    }

    pub fn width(&self) -> f64 {
        self.up - self.low
    }

    /// True when the interval is a single point (`low == up` exactly).
    pub fn is_single(&self) -> bool {
        self.low == self.up
    }

    /// True when `self` comes strictly before `other` under `(low, up)` order.
    pub(crate) fn precedes(&self, other: &Interval) -> bool {
        self.low < other.low || (self.low == other.low && self.up < other.up)
    }

    /// Overlap test for closed intervals; shared endpoints count.
    fn overlaps(&self, other: &Interval) -> bool {
        self.low <= other.up && other.low <= self.up
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.up)
    }
}

/// Ordered collection of disjoint closed intervals over one axis.
///
/// Invariant: members are sorted ascending by low bound, and no two
/// members overlap or touch. All operations preserve the invariant and
/// are total; effects stay confined to the receiver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding a single interval.
    pub fn of(domain: Interval) -> Self {
        let mut set = Self::new();
        set.union(domain);
        set
    }

    pub fn size(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Interval> {
        self.intervals.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    /// Closed membership test across all members.
    pub fn contains(&self, x: f64) -> bool {
        self.intervals.iter().any(|iv| iv.contains(x))
    }

    /// Add `r` to the set, fusing with any overlapping or touching members.
    pub fn union(&mut self, r: Interval) {
        if r.low > r.up {
            return;
        }

        let mut low = r.low;
        let mut up = r.up;
        let mut start = 0;
        while start < self.intervals.len() && self.intervals[start].up < low {
            start += 1;
        }
        let mut end = start;
        while end < self.intervals.len() && self.intervals[end].low <= up {
            low = low.min(self.intervals[end].low);
            up = up.max(self.intervals[end].up);
            end += 1;
        }
        self.intervals.splice(start..end, [Interval::new(low, up)]);
    }

    pub fn union_set(&mut self, other: &IntervalSet) {
        for iv in &other.intervals {
            self.union(*iv);
        }
    }

    /// Remove the portion of every member covered by `r`, keeping shared
    /// endpoints. A member may shrink, split in two, or vanish. A
    /// single-point subtrahend leaves the set unchanged.
    pub fn diff(&mut self, r: &Interval) {
        if r.is_single() || r.low > r.up {
            return;
        }

        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        for iv in &self.intervals {
            if !iv.overlaps(r) {
                out.push(*iv);
                continue;
            }
            if r.low > iv.low {
                out.push(Interval::new(iv.low, r.low.min(iv.up)));
            }
            if r.up < iv.up {
                out.push(Interval::new(r.up.max(iv.low), iv.up));
            }
        }
        self.intervals = out;
    }

    pub fn diff_set(&mut self, other: &IntervalSet) {
        for r in &other.intervals {
            self.diff(r);
        }
    }

    /// Drop members that are single points (`low == up` exactly).
    pub fn sweep_single(&mut self) {
        self.intervals.retain(|iv| !iv.is_single());
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{iv}")?;
        }
        write!(f, "}}")
    }
}
