//! Geospatial filter
//!
//! Pure helpers used to shape group payloads: a flat-earth distance that is
//! only meaningful for nearby boats, and quantizers that strip precision from
//! other boats' positions and courses in proportion to how far away they are.
//!
//! All distances are nautical miles; all angles are degrees.

/// Distances at or beyond this value are reported as exactly this value.
pub const MAX_CLOSE_DISTANCE_NM: f64 = 60.0;

const NM_PER_DEGREE: f64 = 60.0;

/// Mean latitude is clamped here so the east-west scale never collapses.
const MAX_MEAN_LAT: f64 = 89.0;

/// cos(89°), the smallest east-west scale `distance` will ever apply.
const MIN_EW_SCALE: f64 = 0.017_452_406_437_283_5;

/// Approximate distance between two nearby points.
///
/// North-south uses a fixed 60 nm per degree; east-west is scaled by the
/// cosine of the mean latitude. Once either axis alone reaches
/// [`MAX_CLOSE_DISTANCE_NM`] the result is that value and no trigonometry is
/// done.
pub fn distance(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> f64 {
    let ns = (lat1 - lat0).abs() * NM_PER_DEGREE;
    if ns >= MAX_CLOSE_DISTANCE_NM {
        return MAX_CLOSE_DISTANCE_NM;
    }

    let dlon_nm = longitude_delta(lon0, lon1) * NM_PER_DEGREE;
    if dlon_nm * MIN_EW_SCALE >= MAX_CLOSE_DISTANCE_NM {
        return MAX_CLOSE_DISTANCE_NM;
    }

    let mean_lat = ((lat0 + lat1) / 2.0).clamp(-MAX_MEAN_LAT, MAX_MEAN_LAT);
    let ew = dlon_nm * mean_lat.to_radians().cos();
    if ew >= MAX_CLOSE_DISTANCE_NM {
        return MAX_CLOSE_DISTANCE_NM;
    }

    ns.hypot(ew)
}

/// Absolute longitude difference, taking the short way round the dateline.
pub fn longitude_delta(lon0: f64, lon1: f64) -> f64 {
    let d = (lon0 - lon1).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

/// Round a course to a compass step that matches the position precision
/// implied by `distance`.
pub fn quantize_course(course: f64, distance: f64) -> f64 {
    let step = if distance >= 6.0 {
        22.5
    } else if distance >= 3.0 {
        11.25
    } else {
        5.625
    };

    ((course / step).round() * step).rem_euclid(360.0)
}

/// Step size used by [`quantize_coordinate`] at a given distance.
pub fn coordinate_step(distance: f64) -> f64 {
    const TIERS: [(f64, f64); 8] = [
        (6.0, 0.0005),
        (4.0, 0.0002),
        (1.5, 0.0001),
        (0.8, 0.000_05),
        (0.4, 0.000_02),
        (0.15, 0.000_01),
        (0.08, 0.000_005),
        (0.04, 0.000_002),
    ];

    TIERS
        .iter()
        .find(|(min, _)| distance >= *min)
        .map_or(0.000_001, |(_, step)| *step)
}

/// Round a latitude or longitude to the distance-tiered step.
pub fn quantize_coordinate(coord: f64, distance: f64) -> f64 {
    let step = coordinate_step(distance);
    (coord / step).round() * step
}
