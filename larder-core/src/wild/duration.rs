use std::sync::LazyLock;

use regex::Regex;

/// ISO-8601 duration as used by schema.org (`PT1H30M`, `P0DT20M`, `PT0.5H`).
static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("Invalid ISO duration regex")
});

/// Parse an ISO-8601 duration into whole minutes, rounding seconds.
/// Returns None for anything that is not a duration with at least one part.
pub fn iso_duration_minutes(raw: &str) -> Option<i64> {
    let caps = ISO_DURATION_REGEX.captures(raw.trim())?;

    let part = |i: usize| -> Option<f64> { caps.get(i).and_then(|m| m.as_str().parse().ok()) };
    let (days, hours, minutes, seconds) = (part(1), part(2), part(3), part(4));

    if days.is_none() && hours.is_none() && minutes.is_none() && seconds.is_none() {
        return None;
    }

    let total = days.unwrap_or(0.0) * 24.0 * 60.0
        + hours.unwrap_or(0.0) * 60.0
        + minutes.unwrap_or(0.0)
        + seconds.unwrap_or(0.0) / 60.0;

    Some(total.round() as i64)
}
