/// The line profiler reports durations in tenths of a microsecond
pub const RAW_UNITS_PER_MICROSECOND: f64 = 10.0;

const MICROS_PER_MILLI: f64 = 1_000.0;
const MICROS_PER_SECOND: f64 = 1_000_000.0;
const MICROS_PER_MINUTE: f64 = 60_000_000.0;

/// Marker rendered when a value is absent
pub const NOT_AVAILABLE: &str = "N/A";

/// Render a raw profiler duration as a scaled, human-readable string
pub fn format_duration(raw: Option<f64>) -> String {
    let raw = match raw {
        Some(value) if value != 0.0 && value.is_finite() => value,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let micros = raw / RAW_UNITS_PER_MICROSECOND;
    if micros >= MICROS_PER_MINUTE {
        format!("{:.2} min", micros / MICROS_PER_MINUTE)
    } else if micros >= MICROS_PER_SECOND {
        format!("{:.2} s", micros / MICROS_PER_SECOND)
    } else if micros >= MICROS_PER_MILLI {
        format!("{:.2} ms", micros / MICROS_PER_MILLI)
    } else {
        format!("{:.2} \u{00b5}s", micros)
    }
}

/// Render a percentage with two decimals, or the N/A marker
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{:.2}", value),
        None => NOT_AVAILABLE.to_string(),
    }
}
