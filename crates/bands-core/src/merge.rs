//! Merging of the two horizons' hazard sets into ordered severity bands.

use crate::interval::{Interval, IntervalSet};
use crate::region::Region;
use serde::{Deserialize, Serialize};

/// One contiguous stretch of an axis tagged with its severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub interval: Interval,
    pub region: Region,
}

/// Merge the near-horizon (red) and mid-horizon (amber) hazard sets
/// against the full axis `domain` into one ascending band sequence.
///
/// The near set is expected to be a subset of the mid set, but that is
/// not assumed: it is re-subtracted from the safe set explicitly. Safe
/// and mid singles are swept; a zero-width near hazard is kept, since a
/// true hazard point is still worth reporting.
///
/// The result partitions `domain`: adjacent bands share their boundary
/// value, with the more severe band owning it under closed-set
/// membership.
pub fn merge_bands(near: &IntervalSet, mid: &IntervalSet, domain: Interval) -> Vec<Band> {
    let mut safe = IntervalSet::of(domain);
    safe.diff_set(mid);
    safe.diff_set(near);

    let mut mid_only = mid.clone();
    mid_only.diff_set(near);

    safe.sweep_single();
    mid_only.sweep_single();

    let mut bands = Vec::with_capacity(safe.size() + mid_only.size() + near.size());
    insert_all(&mut bands, &safe, Region::None);
    insert_all(&mut bands, &mid_only, Region::Mid);
    insert_all(&mut bands, near, Region::Near);
    bands
}

/// Stable insertion of every member of `set`, tagged `region`, into the
/// ordered sequence. The pass order (safe, mid, near) fixes how ties on
/// degenerate boundaries resolve and must not change.
fn insert_all(bands: &mut Vec<Band>, set: &IntervalSet, region: Region) {
    for iv in set.iter() {
        let pos = bands
            .iter()
            .position(|b| iv.precedes(&b.interval))
            .unwrap_or(bands.len());
        bands.insert(pos, Band { interval: *iv, region });
    }
}
