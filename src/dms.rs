//! Decimal degrees ↔ degrees/minutes/seconds conversion for display.

/// Which axis a decimal degree value lies on; selects the hemisphere letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// Split a decimal degree value into (degrees, minutes, seconds, sign).
/// The components are non-negative; the sign carries the hemisphere.
pub fn decimal_to_dms(decimal: f64) -> (f64, f64, f64, i8) {
    let total_seconds = decimal.abs() * 3600.0;
    let minutes = total_seconds.div_euclid(60.0);
    let seconds = total_seconds.rem_euclid(60.0);
    let degrees = minutes.div_euclid(60.0);
    let minutes = minutes.rem_euclid(60.0);
    let sign = if decimal >= 0.0 { 1 } else { -1 };
    (degrees, minutes, seconds, sign)
}

/// Combine degrees/minutes/seconds into decimal degrees. A direction of
/// `W` or `S` (either case) makes the result negative.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, direction: char) -> f64 {
    let sign = if matches!(direction, 'W' | 'S' | 'w' | 's') {
        -1.0
    } else {
        1.0
    };
    (degrees + minutes / 60.0 + seconds / 3600.0) * sign
}

/// Render a decimal degree value the way EXIF tools print it,
/// e.g. `38 deg 14' 27.82" S`.
pub fn dms_string(decimal: f64, axis: Axis) -> String {
    let (degrees, minutes, seconds, _) = decimal_to_dms(decimal);
    let direction = match (axis, decimal >= 0.0) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    };
    format!(
        "{} deg {}' {:.2}\" {}",
        degrees as i64, minutes as i64, seconds, direction
    )
}
