//! HP notation: angles packed as `DDD.MMSSsss`
//! (degrees, then two digits of minutes, then seconds).
use crate::error::FormatError;

use dms_coordinates::DMS;

/// Converts an angle in HP notation into decimal degrees.
/// Minutes and seconds tens digits above 5 are not valid HP notation.
pub fn hp_to_ddeg(hp: f64) -> Result<f64, FormatError> {
    if !hp.is_finite() {
        return Err(FormatError::InvalidHpNotation(hp));
    }
    // digits are read from the decimal representation,
    // binary arithmetic would turn 33.3 into 33°29'99.99"
    let packed = format!("{:.10}", hp.abs());
    let (degrees, decimals) = packed
        .split_once('.')
        .ok_or(FormatError::InvalidHpNotation(hp))?;
    let (minutes, seconds) = decimals.split_at(2);
    let (seconds, fraction) = seconds.split_at(2);
    let digit = |s: &str| s.as_bytes()[0] - b'0';
    if digit(minutes) > 5 || digit(seconds) > 5 {
        return Err(FormatError::InvalidHpNotation(hp));
    }
    let integer = |s: &str| s.parse::<u32>().map_err(|_| FormatError::InvalidHpNotation(hp));
    let seconds = format!("{}.{}", seconds, fraction)
        .parse::<f64>()
        .map_err(|_| FormatError::InvalidHpNotation(hp))?;
    let mut dms = DMS::from_ddeg_angle(0.0);
    dms.degrees = integer(degrees)? as _;
    dms.minutes = integer(minutes)? as _;
    dms.seconds = seconds;
    let ddeg = dms.to_ddeg_angle().abs();
    Ok(if hp.is_sign_negative() { -ddeg } else { ddeg })
}

/// Converts decimal degrees into HP notation.
/// Seconds are rounded to the micro arc second, so 60" never shows up.
pub fn ddeg_to_hp(ddeg: f64) -> f64 {
    let dms = DMS::from_ddeg_angle(ddeg.abs());
    let (mut degrees, mut minutes) = (dms.degrees as f64, dms.minutes as f64);
    let mut seconds = (dms.seconds * 1.0E6).round() / 1.0E6;
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    let hp = degrees + minutes / 100.0 + seconds / 10000.0;
    if ddeg.is_sign_negative() {
        -hp
    } else {
        hp
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn hp_notation() {
        let ddeg = hp_to_ddeg(23.4012345).unwrap();
        assert!((ddeg - (23.0 + 40.0 / 60.0 + 12.345 / 3600.0)).abs() < 1.0E-9);
        let ddeg = hp_to_ddeg(-33.3).unwrap();
        assert!((ddeg + 33.5).abs() < 1.0E-12);
        let ddeg = hp_to_ddeg(149.0).unwrap();
        assert_eq!(ddeg, 149.0);
        assert!(hp_to_ddeg(12.6).is_err());
        assert!(hp_to_ddeg(12.0070).is_err());
        assert!(hp_to_ddeg(f64::NAN).is_err());
    }
    #[test]
    fn dms_packing() {
        // 23°40'12.345"
        let hp = ddeg_to_hp(23.0 + 40.0 / 60.0 + 12.345 / 3600.0);
        assert!((hp - 23.4012345).abs() < 1.0E-10);
        let hp = ddeg_to_hp(-33.5);
        assert!((hp + 33.3).abs() < 1.0E-10);
        // 59.9999999" rounds up into the next minute, then degree
        let hp = ddeg_to_hp(10.0 - 1.0E-10);
        assert!((hp - 10.0).abs() < 1.0E-10);
    }
    #[test]
    fn round_trip() {
        for ddeg in [0.0, 133.8855, -23.670123, 149.00987654] {
            let back = hp_to_ddeg(ddeg_to_hp(ddeg)).unwrap();
            assert!((back - ddeg).abs() < 1.0E-9, "{} != {}", back, ddeg);
        }
    }
}
