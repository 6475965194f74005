//! Timecode conversion between seconds and `HH:MM:SS.mmm` text.
//!
//! The encoder writes millisecond precision with unbounded hours. The decoder
//! accepts the encoder's output as well as the shorter forms users type by
//! hand (`M:S` and plain seconds).

use super::error::FormatError;

/// Format seconds as `HH:MM:SS.mmm`.
///
/// Hours and minutes use truncating division; the seconds field is the
/// real-valued remainder modulo 60. Negative or non-finite input is written
/// as zero.
pub fn seconds_to_timecode(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

/// Parse `H:M:S`, `M:S` or a bare number of seconds.
///
/// Every component left of the last colon must be an integer; the rightmost
/// one may carry a fraction. Fields are summed in `f64`, so very large hour
/// counts lose precision instead of overflowing.
pub fn timecode_to_seconds(text: &str) -> Result<f64, FormatError> {
    let invalid = || FormatError::InvalidTimecode(text.to_string());

    let parts: Vec<&str> = text.trim().split(':').collect();
    let (whole, fraction) = match parts.as_slice() {
        [h, m, s] => {
            let h = parse_int(h).ok_or_else(invalid)?;
            let m = parse_int(m).ok_or_else(invalid)?;
            (
                h as f64 * 3600.0 + m as f64 * 60.0,
                parse_float(s).ok_or_else(invalid)?,
            )
        }
        [m, s] => {
            let m = parse_int(m).ok_or_else(invalid)?;
            (m as f64 * 60.0, parse_float(s).ok_or_else(invalid)?)
        }
        [s] => (0.0, parse_float(s).ok_or_else(invalid)?),
        _ => return Err(invalid()),
    };

    let seconds = whole + fraction;
    if seconds.is_finite() {
        Ok(seconds)
    } else {
        Err(invalid())
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_timecode_works() {
        assert_eq!(seconds_to_timecode(0.0), "00:00:00.000");
        assert_eq!(seconds_to_timecode(1.5), "00:00:01.500");
        assert_eq!(seconds_to_timecode(61.25), "00:01:01.250");
        assert_eq!(seconds_to_timecode(3661.0), "01:01:01.000");
    }

    #[test]
    fn hours_are_not_wrapped() {
        assert_eq!(seconds_to_timecode(100.0 * 3600.0 + 5.0), "100:00:05.000");
        assert_eq!(seconds_to_timecode(25.0 * 3600.0), "25:00:00.000");
    }

    #[test]
    fn negative_input_is_clamped() {
        assert_eq!(seconds_to_timecode(-4.0), "00:00:00.000");
        assert_eq!(seconds_to_timecode(f64::NAN), "00:00:00.000");
    }

    #[test]
    fn parse_accepts_all_forms() {
        assert!((timecode_to_seconds("01:01:01.500").unwrap() - 3661.5).abs() < 1e-9);
        assert!((timecode_to_seconds("2:30").unwrap() - 150.0).abs() < 1e-9);
        assert!((timecode_to_seconds("42.25").unwrap() - 42.25).abs() < 1e-9);
        assert!((timecode_to_seconds("  00:00:05.000\n").unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            timecode_to_seconds("aa:00:01"),
            Err(FormatError::InvalidTimecode(_))
        ));
        assert!(timecode_to_seconds("00:1.5:00").is_err());
        assert!(timecode_to_seconds("1:2:3:4").is_err());
        assert!(timecode_to_seconds("").is_err());
        assert!(timecode_to_seconds("inf").is_err());
    }

    #[test]
    fn timecode_roundtrip() {
        let samples = [
            0.0, 0.001, 0.5, 1.0, 59.999, 60.0, 61.123, 599.5, 3599.999, 3600.0, 5025.042,
            86399.75, 90000.001, 123456.789,
        ];
        for s in samples {
            let encoded = seconds_to_timecode(s);
            let decoded = timecode_to_seconds(&encoded).unwrap();
            assert!(
                (decoded - s).abs() < 0.001,
                "{} -> {} -> {}",
                s,
                encoded,
                decoded
            );
        }
    }

    #[test]
    fn huge_hour_fields_do_not_overflow() {
        let seconds = timecode_to_seconds("9999999999999999:00:00.000").unwrap();
        assert!((seconds / 3600.0 - 9999999999999999.0).abs() < 1e3);
        assert!(timecode_to_seconds("-9999999999999999:-9999999999999999:00").is_ok());

        // beyond i64 the field is not an integer at all
        assert!(matches!(
            timecode_to_seconds("99999999999999999999:00:00.000"),
            Err(FormatError::InvalidTimecode(_))
        ));
    }

    #[test]
    fn huge_values_survive_encoding() {
        let encoded = seconds_to_timecode(1e19);
        let decoded = timecode_to_seconds(&encoded).unwrap();
        assert!((decoded - 1e19).abs() / 1e19 < 1e-12, "{} -> {}", encoded, decoded);
    }
}
