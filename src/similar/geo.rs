const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two `(lat, lon)` points
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let lat1_rad = from.0.to_radians();
    let lat2_rad = to.0.to_radians();
    let delta_lat = (to.0 - from.0).to_radians();
    let delta_lon = (to.1 - from.1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Location sub-score for a distance when no shared area identifier exists
pub fn distance_score(km: f64) -> f64 {
    if km <= 5.0 {
        90.0
    } else if km <= 10.0 {
        70.0
    } else if km <= 20.0 {
        50.0
    } else if km <= 50.0 {
        20.0
    } else {
        0.0
    }
}
