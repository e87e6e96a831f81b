//! Two-horizon band engine: owns the hazard providers, caches merged
//! bands per axis, and answers index and point queries.
//!
//! The engine is single-threaded and non-reentrant. Every mutator
//! funnels through one invalidation path; the first query after a
//! mutation triggers a recompute, and repeated queries with no
//! intervening mutation reuse the cache unchanged.

use crate::adapter;
use crate::error::UsageError;
use crate::geom::{LatLonAlt, Position, Vect3, Velocity};
use crate::hazard::HazardProvider;
use crate::interval::Interval;
use crate::merge::{merge_bands, Band};
use crate::projection::{self, EuclideanProjection};
use crate::region::Region;
use crate::units;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy)]
struct Ownship {
    position: Position,
    velocity: Velocity,
}

/// Conflict-band engine combining a near-horizon ("red") and a
/// mid-horizon ("amber") hazard provider into SAFE/MID/NEAR bands for
/// track angle, ground speed and vertical speed.
pub struct TripleBands<P: HazardProvider> {
    near: P,
    mid: P,
    ownship: Option<Ownship>,
    track_bands: Vec<Band>,
    ground_bands: Vec<Band>,
    vertical_bands: Vec<Band>,
    need_compute: bool,
    max_bands: Option<usize>,
    band_limit_exceeded: bool,
}

impl<P: HazardProvider + Default> TripleBands<P> {
    /// Build an engine with default-constructed providers and the given
    /// hazard-disk size, horizons and speed limits.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        d: f64,
        dunit: &str,
        h: f64,
        hunit: &str,
        t_near: f64,
        t_mid: f64,
        tunit: &str,
        max_gs: f64,
        gsunit: &str,
        max_vs: f64,
        vsunit: &str,
    ) -> Self {
        let mut engine = Self::with_providers(P::default(), P::default());
        engine.set_distance(d, dunit);
        engine.set_height(h, hunit);
        engine.set_time_near(t_near, tunit);
        engine.set_time_mid(t_mid, tunit);
        engine.set_max_ground_speed(max_gs, gsunit);
        engine.set_max_vertical_speed(max_vs, vsunit);
        engine
    }
}

impl<P: HazardProvider + Default> Default for TripleBands<P> {
    fn default() -> Self {
        Self::new(
            5.0, "nmi", 1000.0, "ft", 180.0, 300.0, "s", 1000.0, "kn", 5000.0, "fpm",
        )
    }
}

impl<P: HazardProvider> TripleBands<P> {
    /// Build an engine around two preconfigured providers. The cache
    /// starts stale.
    pub fn with_providers(near: P, mid: P) -> Self {
        Self {
            near,
            mid,
            ownship: None,
            track_bands: Vec::new(),
            ground_bands: Vec::new(),
            vertical_bands: Vec::new(),
            need_compute: true,
            max_bands: None,
            band_limit_exceeded: false,
        }
    }

    /// Central invalidation for parameter changes: drops the providers'
    /// accumulated traffic and marks the cache stale.
    fn invalidate(&mut self) {
        self.near.clear();
        self.mid.clear();
        self.mark_stale();
    }

    /// Cache invalidation that keeps provider traffic.
    fn mark_stale(&mut self) {
        self.track_bands.clear();
        self.ground_bands.clear();
        self.vertical_bands.clear();
        self.need_compute = true;
        self.band_limit_exceeded = false;
    }

    /// True while the engine holds geodetic data. Defaults to geodetic
    /// before ownship is set.
    pub fn is_geodetic(&self) -> bool {
        self.ownship
            .map(|own| own.position.is_geodetic())
            .unwrap_or(true)
    }

    // ---- configuration ----

    pub fn set_time_near(&mut self, t: f64, unit: &str) {
        self.near.set_time(units::from(unit, t));
        self.invalidate();
    }

    pub fn get_time_near(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_time())
    }

    pub fn set_time_mid(&mut self, t: f64, unit: &str) {
        self.mid.set_time(units::from(unit, t));
        self.invalidate();
    }

    pub fn get_time_mid(&self, unit: &str) -> f64 {
        units::to(unit, self.mid.get_time())
    }

    pub fn set_lookahead_time(&mut self, t: f64, unit: &str) {
        self.set_time_near(t, unit);
    }

    pub fn get_lookahead_time(&self, unit: &str) -> f64 {
        self.get_time_near(unit)
    }

    /// Restrict the near horizon to `[start, end]` rather than `[0, t]`.
    pub fn set_time_range(&mut self, start: f64, end: f64, unit: &str) {
        self.near
            .set_time_range(units::from(unit, start), units::from(unit, end));
        self.invalidate();
    }

    pub fn get_start_time(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_start_time())
    }

    pub fn set_distance(&mut self, d: f64, unit: &str) {
        let d = units::from(unit, d).abs();
        self.near.set_diameter(d);
        self.mid.set_diameter(d);
        self.invalidate();
    }

    pub fn get_distance(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_diameter())
    }

    pub fn set_height(&mut self, h: f64, unit: &str) {
        let h = units::from(unit, h).abs();
        self.near.set_height(h);
        self.mid.set_height(h);
        self.invalidate();
    }

    pub fn get_height(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_height())
    }

    pub fn set_max_ground_speed(&mut self, gs: f64, unit: &str) {
        let max_gs = units::from(unit, gs).abs();
        self.near.set_max_ground_speed(max_gs);
        self.mid.set_max_ground_speed(max_gs);
        self.invalidate();
    }

    pub fn get_max_ground_speed(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_max_ground_speed())
    }

    pub fn set_max_vertical_speed(&mut self, vs: f64, unit: &str) {
        let max_vs = units::from(unit, vs).abs();
        self.near.set_max_vertical_speed(max_vs);
        self.mid.set_max_vertical_speed(max_vs);
        self.invalidate();
    }

    pub fn get_max_vertical_speed(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_max_vertical_speed())
    }

    /// Negative tolerances are ignored: the setter is a no-op then.
    pub fn set_track_tolerance(&mut self, trk: f64, unit: &str) {
        if trk < 0.0 {
            return;
        }
        let trk = units::from(unit, trk);
        self.near.set_track_tolerance(trk);
        self.mid.set_track_tolerance(trk);
        self.invalidate();
    }

    pub fn get_track_tolerance(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_track_tolerance())
    }

    /// Negative tolerances are ignored: the setter is a no-op then.
    pub fn set_ground_speed_tolerance(&mut self, gs: f64, unit: &str) {
        if gs < 0.0 {
            return;
        }
        let gs = units::from(unit, gs);
        self.near.set_ground_speed_tolerance(gs);
        self.mid.set_ground_speed_tolerance(gs);
        self.invalidate();
    }

    pub fn get_ground_speed_tolerance(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_ground_speed_tolerance())
    }

    /// Negative tolerances are ignored: the setter is a no-op then.
    pub fn set_vertical_speed_tolerance(&mut self, vs: f64, unit: &str) {
        if vs < 0.0 {
            return;
        }
        let vs = units::from(unit, vs);
        self.near.set_vertical_speed_tolerance(vs);
        self.mid.set_vertical_speed_tolerance(vs);
        self.invalidate();
    }

    pub fn get_vertical_speed_tolerance(&self, unit: &str) -> f64 {
        units::to(unit, self.near.get_vertical_speed_tolerance())
    }

    /// Optional reporting limit on the merged band count per axis. The
    /// sequence itself is unbounded; exceeding the limit is reported
    /// through [`Self::band_limit_exceeded`], never fatal.
    pub fn set_max_bands(&mut self, max: Option<usize>) {
        self.max_bands = max;
        self.mark_stale();
    }

    pub fn max_bands(&self) -> Option<usize> {
        self.max_bands
    }

    /// True when the last recompute produced more bands on some axis
    /// than the configured limit.
    pub fn band_limit_exceeded(&mut self) -> bool {
        self.ensure_computed();
        self.band_limit_exceeded
    }

    // ---- ownship and traffic ----

    /// Set ownship state. Drops previously accumulated traffic.
    pub fn set_ownship(&mut self, position: Position, velocity: Velocity) {
        self.invalidate();
        self.ownship = Some(Ownship { position, velocity });
    }

    /// Geodetic ownship: latitude/longitude in decimal degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn set_ownship_geodetic(
        &mut self,
        lat_deg: f64,
        lon_deg: f64,
        alt: f64,
        alt_unit: &str,
        trk: f64,
        trk_unit: &str,
        gs: f64,
        gs_unit: &str,
        vs: f64,
        vs_unit: &str,
    ) {
        self.set_ownship(
            Position::Geodetic(LatLonAlt::new(lat_deg, lon_deg, units::from(alt_unit, alt))),
            Velocity::mk_trk_gs_vs(
                units::from(trk_unit, trk),
                units::from(gs_unit, gs),
                units::from(vs_unit, vs),
            ),
        );
    }

    /// Euclidean ownship: position and velocity components.
    #[allow(clippy::too_many_arguments)]
    pub fn set_ownship_xyz(
        &mut self,
        sx: f64,
        sy: f64,
        hp_unit: &str,
        sz: f64,
        vp_unit: &str,
        vx: f64,
        vy: f64,
        hv_unit: &str,
        vz: f64,
        vv_unit: &str,
    ) {
        self.set_ownship(
            Position::Euclidean(Vect3::new(
                units::from(hp_unit, sx),
                units::from(hp_unit, sy),
                units::from(vp_unit, sz),
            )),
            Velocity::mk_vxyz(
                units::from(hv_unit, vx),
                units::from(hv_unit, vy),
                units::from(vv_unit, vz),
            ),
        );
    }

    /// Add one intruder to both horizons. On `Err` the call was a no-op
    /// and the engine is unchanged.
    pub fn add_traffic(&mut self, position: Position, velocity: Velocity) -> Result<(), UsageError> {
        let Some(own) = self.ownship else {
            tracing::warn!("add_traffic called before set_ownship; traffic ignored");
            return Err(UsageError::OwnshipNotSet);
        };

        let (rel, vo, vi) = match (own.position, position) {
            (Position::Geodetic(so), Position::Geodetic(si)) => {
                let distance_m = projection::great_circle_distance(so.lat, so.lon, si.lat, si.lon);
                if distance_m > projection::PROJECTION_MAX_RANGE_M {
                    tracing::warn!(distance_m, "intruder beyond projection range; traffic ignored");
                    return Err(UsageError::BeyondProjectionRange {
                        distance_m,
                        max_range_m: projection::PROJECTION_MAX_RANGE_M,
                    });
                }
                let sp = EuclideanProjection::new(so);
                let rel = sp.project_lla(so).sub(&sp.project_lla(si));
                let vi = sp.project_velocity(si, velocity);
                let vo = sp.project_velocity(so, own.velocity);
                // ownship velocity is held in the native frame from here on
                self.ownship = Some(Ownship {
                    position: own.position,
                    velocity: vo,
                });
                (rel, vo, vi)
            }
            (Position::Euclidean(so), Position::Euclidean(si)) => {
                (so.sub(&si), own.velocity, velocity)
            }
            _ => {
                tracing::warn!("traffic frame does not match ownship frame; traffic ignored");
                return Err(UsageError::FrameMismatch);
            }
        };

        self.near.add_traffic(rel, vo, vi);
        self.mid.add_traffic(rel, vo, vi);
        self.mark_stale();
        Ok(())
    }

    /// Geodetic intruder: latitude/longitude in decimal degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn add_traffic_geodetic(
        &mut self,
        lat_deg: f64,
        lon_deg: f64,
        alt: f64,
        alt_unit: &str,
        trk: f64,
        trk_unit: &str,
        gs: f64,
        gs_unit: &str,
        vs: f64,
        vs_unit: &str,
    ) -> Result<(), UsageError> {
        self.add_traffic(
            Position::Geodetic(LatLonAlt::new(lat_deg, lon_deg, units::from(alt_unit, alt))),
            Velocity::mk_trk_gs_vs(
                units::from(trk_unit, trk),
                units::from(gs_unit, gs),
                units::from(vs_unit, vs),
            ),
        )
    }

    /// Euclidean intruder: position and velocity components.
    #[allow(clippy::too_many_arguments)]
    pub fn add_traffic_xyz(
        &mut self,
        sx: f64,
        sy: f64,
        hp_unit: &str,
        sz: f64,
        vp_unit: &str,
        vx: f64,
        vy: f64,
        hv_unit: &str,
        vz: f64,
        vv_unit: &str,
    ) -> Result<(), UsageError> {
        self.add_traffic(
            Position::Euclidean(Vect3::new(
                units::from(hp_unit, sx),
                units::from(hp_unit, sy),
                units::from(vp_unit, sz),
            )),
            Velocity::mk_vxyz(
                units::from(hv_unit, vx),
                units::from(hv_unit, vy),
                units::from(vv_unit, vz),
            ),
        )
    }

    /// Drop accumulated traffic and cached bands. Ownship is kept.
    pub fn clear(&mut self) {
        self.invalidate();
    }

    // ---- recompute ----

    fn ensure_computed(&mut self) {
        if self.need_compute {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let track_domain = Interval::new(0.0, 2.0 * PI);
        let gs_domain = Interval::new(0.0, self.near.get_max_ground_speed());
        let max_vs = self.near.get_max_vertical_speed();
        let vs_domain = Interval::new(-max_vs, max_vs);

        let near_trk = self.near.track_bands().clone();
        let mid_trk = self.mid.track_bands().clone();
        self.track_bands = merge_bands(&near_trk, &mid_trk, track_domain);

        let near_gs = self.near.ground_speed_bands().clone();
        let mid_gs = self.mid.ground_speed_bands().clone();
        self.ground_bands = merge_bands(&near_gs, &mid_gs, gs_domain);

        let near_vs = self.near.vertical_speed_bands().clone();
        let mid_vs = self.mid.vertical_speed_bands().clone();
        self.vertical_bands = merge_bands(&near_vs, &mid_vs, vs_domain);

        self.near.clear_breaks();
        self.mid.clear_breaks();

        self.band_limit_exceeded = false;
        if let Some(max) = self.max_bands {
            let axes = [
                ("track", self.track_bands.len()),
                ("ground_speed", self.ground_bands.len()),
                ("vertical_speed", self.vertical_bands.len()),
            ];
            for (axis, count) in axes {
                if count > max {
                    tracing::warn!(axis, count, max, "band count exceeds configured limit");
                    self.band_limit_exceeded = true;
                }
            }
        }

        self.need_compute = false;
    }

    // ---- track queries ----

    pub fn track_length(&mut self) -> usize {
        self.ensure_computed();
        self.track_bands.len()
    }

    /// Band `i` of the track axis, in `unit`, translated back to
    /// compass angles for geodetic ownship. An out-of-range index
    /// clamps to the last band.
    pub fn track(&mut self, i: usize, unit: &str) -> Interval {
        self.ensure_computed();
        let native = clamped(&self.track_bands, i).interval;
        let out = match &self.ownship {
            Some(own) => adapter::track_interval_to_compass(&own.position, &own.velocity, native),
            None => native,
        };
        Interval::new(units::to(unit, out.low), units::to(unit, out.up))
    }

    pub fn track_region(&mut self, i: usize) -> Region {
        self.ensure_computed();
        clamped(&self.track_bands, i).region
    }

    /// Severity of one compass track value, tested against the raw
    /// per-horizon sets; valid without a prior recompute.
    pub fn region_of_track(&mut self, trk: f64, unit: &str) -> Region {
        let mut trk = units::from(unit, trk);
        if let Some(own) = self.ownship {
            trk = adapter::track_to_native(&own.position, &own.velocity, trk);
        }
        if self.near.track_bands().contains(trk) {
            return Region::Near;
        }
        if self.mid.track_bands().contains(trk) {
            return Region::Mid;
        }
        Region::None
    }

    // ---- ground speed queries ----

    pub fn ground_speed_length(&mut self) -> usize {
        self.ensure_computed();
        self.ground_bands.len()
    }

    /// Band `i` of the ground-speed axis, in `unit`. An out-of-range
    /// index clamps to the last band.
    pub fn ground_speed(&mut self, i: usize, unit: &str) -> Interval {
        self.ensure_computed();
        let native = clamped(&self.ground_bands, i).interval;
        let out = match &self.ownship {
            Some(own) => adapter::gs_interval_from_native(&own.position, &own.velocity, native),
            None => native,
        };
        Interval::new(units::to(unit, out.low), units::to(unit, out.up))
    }

    pub fn ground_speed_region(&mut self, i: usize) -> Region {
        self.ensure_computed();
        clamped(&self.ground_bands, i).region
    }

    /// Severity of one ground-speed value; valid without a prior
    /// recompute.
    pub fn region_of_ground_speed(&mut self, gs: f64, unit: &str) -> Region {
        let mut gs = units::from(unit, gs);
        if let Some(own) = self.ownship {
            gs = adapter::gs_to_native(&own.position, &own.velocity, gs);
        }
        if self.near.ground_speed_bands().contains(gs) {
            return Region::Near;
        }
        if self.mid.ground_speed_bands().contains(gs) {
            return Region::Mid;
        }
        Region::None
    }

    // ---- vertical speed queries ----

    pub fn vertical_speed_length(&mut self) -> usize {
        self.ensure_computed();
        self.vertical_bands.len()
    }

    /// Band `i` of the vertical-speed axis, in `unit`. An out-of-range
    /// index clamps to the last band.
    pub fn vertical_speed(&mut self, i: usize, unit: &str) -> Interval {
        self.ensure_computed();
        let iv = clamped(&self.vertical_bands, i).interval;
        Interval::new(units::to(unit, iv.low), units::to(unit, iv.up))
    }

    pub fn vertical_speed_region(&mut self, i: usize) -> Region {
        self.ensure_computed();
        clamped(&self.vertical_bands, i).region
    }

    /// Severity of one vertical-speed value; valid without a prior
    /// recompute.
    pub fn region_of_vertical_speed(&mut self, vs: f64, unit: &str) -> Region {
        let vs = units::from(unit, vs);
        if self.near.vertical_speed_bands().contains(vs) {
            return Region::Near;
        }
        if self.mid.vertical_speed_bands().contains(vs) {
            return Region::Mid;
        }
        Region::None
    }

    /// Diagnostic dump of both horizons' raw band sets.
    pub fn dump(&mut self) -> String {
        let near_trk = self.near.track_bands().to_string();
        let near_gs = self.near.ground_speed_bands().to_string();
        let near_vs = self.near.vertical_speed_bands().to_string();
        let mid_trk = self.mid.track_bands().to_string();
        let mid_gs = self.mid.ground_speed_bands().to_string();
        let mid_vs = self.mid.vertical_speed_bands().to_string();
        format!(
            " Red Bands: trk: {near_trk} gs: {near_gs} vs: {near_vs} \
             Amber Bands: trk: {mid_trk} gs: {mid_gs} vs: {mid_vs}"
        )
    }
}

/// Fetch band `i`, clamping an out-of-range index to the last band.
/// The merged sequence always spans the axis domain, so it is only
/// empty when the domain itself is degenerate; a neutral band is
/// returned then.
fn clamped(bands: &[Band], i: usize) -> Band {
    let i = i.min(bands.len().saturating_sub(1));
    bands.get(i).copied().unwrap_or(Band {
        interval: Interval::new(0.0, 0.0),
        region: Region::None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::IntervalSet;

    /// Hazard provider returning scripted band sets. `clear` drops
    /// traffic only: the scripted sets stand in for whatever a real
    /// provider would recompute from its inputs.
    #[derive(Debug, Clone, Default)]
    struct StubHazard {
        time: f64,
        start_time: f64,
        diameter: f64,
        height: f64,
        max_gs: f64,
        max_vs: f64,
        trk_tol: f64,
        gs_tol: f64,
        vs_tol: f64,
        track: IntervalSet,
        ground: IntervalSet,
        vertical: IntervalSet,
        traffic: Vec<(Vect3, Velocity, Velocity)>,
        breaks_cleared: usize,
    }

    impl HazardProvider for StubHazard {
        fn set_time(&mut self, t: f64) {
            self.time = t;
        }
        fn get_time(&self) -> f64 {
            self.time
        }
        fn set_time_range(&mut self, start: f64, end: f64) {
            self.start_time = start;
            self.time = end;
        }
        fn get_start_time(&self) -> f64 {
            self.start_time
        }
        fn set_diameter(&mut self, d: f64) {
            self.diameter = d;
        }
        fn get_diameter(&self) -> f64 {
            self.diameter
        }
        fn set_height(&mut self, h: f64) {
            self.height = h;
        }
        fn get_height(&self) -> f64 {
            self.height
        }
        fn set_max_ground_speed(&mut self, gs: f64) {
            self.max_gs = gs;
        }
        fn get_max_ground_speed(&self) -> f64 {
            self.max_gs
        }
        fn set_max_vertical_speed(&mut self, vs: f64) {
            self.max_vs = vs;
        }
        fn get_max_vertical_speed(&self) -> f64 {
            self.max_vs
        }
        fn set_track_tolerance(&mut self, trk: f64) {
            self.trk_tol = trk;
        }
        fn get_track_tolerance(&self) -> f64 {
            self.trk_tol
        }
        fn set_ground_speed_tolerance(&mut self, gs: f64) {
            self.gs_tol = gs;
        }
        fn get_ground_speed_tolerance(&self) -> f64 {
            self.gs_tol
        }
        fn set_vertical_speed_tolerance(&mut self, vs: f64) {
            self.vs_tol = vs;
        }
        fn get_vertical_speed_tolerance(&self) -> f64 {
            self.vs_tol
        }
        fn add_traffic(&mut self, rel: Vect3, vo: Velocity, vi: Velocity) {
            self.traffic.push((rel, vo, vi));
        }
        fn clear(&mut self) {
            self.traffic.clear();
        }
        fn clear_breaks(&mut self) {
            self.breaks_cleared += 1;
        }
        fn track_bands(&mut self) -> &IntervalSet {
            &self.track
        }
        fn ground_speed_bands(&mut self) -> &IntervalSet {
            &self.ground
        }
        fn vertical_speed_bands(&mut self) -> &IntervalSet {
            &self.vertical
        }
    }

    fn set(members: &[(f64, f64)]) -> IntervalSet {
        let mut s = IntervalSet::new();
        for &(low, up) in members {
            s.union(Interval::new(low, up));
        }
        s
    }

    /// Engine with scripted track hazards and a Euclidean ownship, so
    /// queries run without frame translation.
    fn scripted_engine(near_trk: &[(f64, f64)], mid_trk: &[(f64, f64)]) -> TripleBands<StubHazard> {
        let near = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            track: set(near_trk),
            ..Default::default()
        };
        let mid = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            track: set(mid_trk),
            ..Default::default()
        };
        let mut engine = TripleBands::with_providers(near, mid);
        engine.set_ownship_xyz(
            0.0, 0.0, "m", 100.0, "m", 0.0, 80.0, "m/s", 0.0, "m/s",
        );
        engine
    }

    #[test]
    fn nested_track_hazards_yield_five_bands() {
        let mut engine = scripted_engine(&[(1.4, 1.6)], &[(1.0, 2.0)]);
        assert_eq!(engine.track_length(), 5);

        let expect = [
            (0.0, 1.0, Region::None),
            (1.0, 1.4, Region::Mid),
            (1.4, 1.6, Region::Near),
            (1.6, 2.0, Region::Mid),
            (2.0, 2.0 * PI, Region::None),
        ];
        for (i, &(low, up, region)) in expect.iter().enumerate() {
            let iv = engine.track(i, "rad");
            assert_eq!(iv.low, low, "band {i}");
            assert_eq!(iv.up, up, "band {i}");
            assert_eq!(engine.track_region(i), region, "band {i}");
        }
    }

    #[test]
    fn no_traffic_reports_one_safe_band_per_axis() {
        let mut engine = scripted_engine(&[], &[]);
        assert_eq!(engine.track_length(), 1);
        assert_eq!(engine.ground_speed_length(), 1);
        assert_eq!(engine.vertical_speed_length(), 1);

        assert_eq!(engine.track_region(0), Region::None);
        assert_eq!(engine.track(0, "rad"), Interval::new(0.0, 2.0 * PI));
        assert_eq!(engine.ground_speed(0, "m/s"), Interval::new(0.0, 250.0));
        assert_eq!(engine.vertical_speed(0, "m/s"), Interval::new(-25.0, 25.0));
    }

    #[test]
    fn out_of_range_indices_clamp_to_the_last_band() {
        let mut engine = scripted_engine(&[(1.4, 1.6)], &[(1.0, 2.0)]);
        let len = engine.track_length();
        let last = engine.track(len - 1, "rad");
        assert_eq!(engine.track(len, "rad"), last);
        assert_eq!(engine.track(len + 5, "rad"), last);
        assert_eq!(engine.track_region(len + 5), engine.track_region(len - 1));
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let mut engine = scripted_engine(&[(0.2, 0.4)], &[(0.1, 0.9)]);
        let first: Vec<(Interval, Region)> = (0..engine.track_length())
            .map(|i| (engine.track(i, "deg"), engine.track_region(i)))
            .collect();
        let second: Vec<(Interval, Region)> = (0..engine.track_length())
            .map(|i| (engine.track(i, "deg"), engine.track_region(i)))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn region_of_track_works_without_prior_recompute() {
        let mut engine = scripted_engine(&[(1.4, 1.6)], &[(1.0, 2.0)]);
        // no length/value query first: the raw per-horizon sets answer
        assert_eq!(engine.region_of_track(1.5, "rad"), Region::Near);
        assert_eq!(engine.region_of_track(1.1, "rad"), Region::Mid);
        assert_eq!(engine.region_of_track(3.0, "rad"), Region::None);
    }

    #[test]
    fn region_of_speeds_use_raw_sets() {
        let near = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            ground: set(&[(40.0, 60.0)]),
            vertical: set(&[(-5.0, 5.0)]),
            ..Default::default()
        };
        let mid = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            ground: set(&[(30.0, 80.0)]),
            vertical: set(&[(-10.0, 10.0)]),
            ..Default::default()
        };
        let mut engine = TripleBands::with_providers(near, mid);
        engine.set_ownship_xyz(0.0, 0.0, "m", 50.0, "m", 10.0, 10.0, "m/s", 0.0, "m/s");

        assert_eq!(engine.region_of_ground_speed(50.0, "m/s"), Region::Near);
        assert_eq!(engine.region_of_ground_speed(70.0, "m/s"), Region::Mid);
        assert_eq!(engine.region_of_ground_speed(100.0, "m/s"), Region::None);
        assert_eq!(engine.region_of_vertical_speed(0.0, "m/s"), Region::Near);
        assert_eq!(engine.region_of_vertical_speed(8.0, "m/s"), Region::Mid);
        assert_eq!(engine.region_of_vertical_speed(20.0, "m/s"), Region::None);
    }

    #[test]
    fn traffic_before_ownship_is_rejected() {
        let mut engine: TripleBands<StubHazard> =
            TripleBands::with_providers(StubHazard::default(), StubHazard::default());
        let result = engine.add_traffic_xyz(
            100.0, 0.0, "m", 50.0, "m", 0.0, 10.0, "m/s", 0.0, "m/s",
        );
        assert_eq!(result, Err(UsageError::OwnshipNotSet));
        assert!(engine.near.traffic.is_empty());
        assert!(engine.mid.traffic.is_empty());
    }

    #[test]
    fn mismatched_frames_are_rejected() {
        let mut engine = scripted_engine(&[], &[]);
        let result = engine.add_traffic_geodetic(
            33.0, -117.0, 100.0, "m", 90.0, "deg", 60.0, "kn", 0.0, "fpm",
        );
        assert_eq!(result, Err(UsageError::FrameMismatch));
        assert!(engine.near.traffic.is_empty());
    }

    #[test]
    fn distant_intruders_are_rejected() {
        let mut engine: TripleBands<StubHazard> =
            TripleBands::with_providers(StubHazard::default(), StubHazard::default());
        engine.set_ownship_geodetic(
            33.0, -117.0, 100.0, "m", 0.0, "deg", 120.0, "kn", 0.0, "fpm",
        );
        // ~10 degrees of latitude is far outside the projection range
        let result = engine.add_traffic_geodetic(
            43.0, -117.0, 100.0, "m", 180.0, "deg", 120.0, "kn", 0.0, "fpm",
        );
        assert!(matches!(
            result,
            Err(UsageError::BeyondProjectionRange { .. })
        ));
        assert!(engine.near.traffic.is_empty());
    }

    #[test]
    fn accepted_traffic_reaches_both_horizons() {
        let mut engine = scripted_engine(&[], &[]);
        engine
            .add_traffic_xyz(500.0, 0.0, "m", 100.0, "m", 0.0, -20.0, "m/s", 0.0, "m/s")
            .unwrap();
        assert_eq!(engine.near.traffic.len(), 1);
        assert_eq!(engine.mid.traffic.len(), 1);
        let (rel, _, _) = engine.near.traffic[0];
        assert_eq!(rel, Vect3::new(-500.0, 0.0, 0.0));
    }

    #[test]
    fn geodetic_traffic_is_projected_into_the_native_frame() {
        let mut engine: TripleBands<StubHazard> =
            TripleBands::with_providers(StubHazard::default(), StubHazard::default());
        engine.set_ownship_geodetic(
            60.0, 24.0, 100.0, "m", 0.0, "deg", 120.0, "kn", 0.0, "fpm",
        );
        engine
            .add_traffic_geodetic(60.0, 24.1, 100.0, "m", 270.0, "deg", 120.0, "kn", 0.0, "fpm")
            .unwrap();
        let (rel, vo, vi) = engine.near.traffic[0];
        // intruder sits east of ownship, so ownship-minus-intruder points west
        assert!(rel.x < 0.0);
        assert!((rel.y).abs() < 1.0);
        // ownship at the anchor projects identically
        assert!((vo.compass_angle()).abs() < 1e-9);
        // intruder track picks up the convergence rotation
        let gamma = 0.1_f64.to_radians() * 60.0_f64.to_radians().sin();
        assert!((vi.compass_angle() - (1.5 * PI + gamma)).abs() < 1e-9);
    }

    #[test]
    fn parameter_changes_drop_provider_traffic() {
        let mut engine = scripted_engine(&[], &[]);
        engine
            .add_traffic_xyz(500.0, 0.0, "m", 100.0, "m", 0.0, -20.0, "m/s", 0.0, "m/s")
            .unwrap();
        assert_eq!(engine.near.traffic.len(), 1);
        engine.set_distance(3.0, "nmi");
        assert!(engine.near.traffic.is_empty());
        assert!(engine.mid.traffic.is_empty());
    }

    #[test]
    fn negative_tolerances_are_ignored() {
        let mut engine = scripted_engine(&[], &[]);
        engine.set_track_tolerance(0.5, "rad");
        engine
            .add_traffic_xyz(500.0, 0.0, "m", 100.0, "m", 0.0, -20.0, "m/s", 0.0, "m/s")
            .unwrap();
        engine.set_track_tolerance(-1.0, "rad");
        assert_eq!(engine.get_track_tolerance("rad"), 0.5);
        // the rejected setter must not have invalidated anything
        assert_eq!(engine.near.traffic.len(), 1);
    }

    #[test]
    fn configuration_getters_round_trip_units() {
        let engine: TripleBands<StubHazard> = TripleBands::default();
        assert!((engine.get_distance("nmi") - 5.0).abs() < 1e-9);
        assert!((engine.get_height("ft") - 1000.0).abs() < 1e-9);
        assert!((engine.get_time_near("s") - 180.0).abs() < 1e-9);
        assert!((engine.get_time_mid("s") - 300.0).abs() < 1e-9);
        assert!((engine.get_max_ground_speed("kn") - 1000.0).abs() < 1e-9);
        assert!((engine.get_max_vertical_speed("fpm") - 5000.0).abs() < 1e-9);
        assert!((engine.get_lookahead_time("min") - 3.0).abs() < 1e-9);
    }

    #[test]
    fn geodetic_track_query_preserves_the_wrap_bound() {
        let near = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            ..Default::default()
        };
        let mid = StubHazard {
            max_gs: 250.0,
            max_vs: 25.0,
            track: set(&[(0.0, PI / 2.0)]),
            ..Default::default()
        };
        let mut engine = TripleBands::with_providers(near, mid);
        engine.set_ownship_geodetic(
            33.6846, -117.8265, 100.0, "m", 45.0, "deg", 120.0, "kn", 0.0, "fpm",
        );

        assert_eq!(engine.track_length(), 2);
        let first = engine.track(0, "rad");
        assert_eq!(first.low, 0.0);
        assert!((first.up - PI / 2.0).abs() < 1e-9);
        assert_eq!(engine.track_region(0), Region::Mid);
        let second = engine.track(1, "rad");
        assert!((second.up - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn band_limit_reporting_is_recoverable() {
        let mut engine = scripted_engine(&[(1.4, 1.6)], &[(1.0, 2.0)]);
        engine.set_max_bands(Some(2));
        assert!(engine.band_limit_exceeded());
        // the sequence itself is intact
        assert_eq!(engine.track_length(), 5);

        engine.set_max_bands(Some(16));
        assert!(!engine.band_limit_exceeded());
    }

    #[test]
    fn recompute_clears_provider_breaks_once_per_cycle() {
        let mut engine = scripted_engine(&[], &[]);
        engine.track_length();
        engine.track_length();
        engine.ground_speed_length();
        assert_eq!(engine.near.breaks_cleared, 1);
        assert_eq!(engine.mid.breaks_cleared, 1);
    }

    #[test]
    fn dump_lists_both_horizons() {
        let mut engine = scripted_engine(&[(1.4, 1.6)], &[(1.0, 2.0)]);
        let dump = engine.dump();
        assert!(dump.contains("Red Bands"));
        assert!(dump.contains("Amber Bands"));
        assert!(dump.contains("[1.4, 1.6]"));
        assert!(dump.contains("[1, 2]"));
    }
}
