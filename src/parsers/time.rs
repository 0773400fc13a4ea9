use once_cell::sync::Lazy;
use regex::Regex;

use super::to_search;

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{1,2}):(\d{2})").expect("Invalid time regex")
});

const WEEKDAYS: [(&str, u8); 6] = [
    ("lunes", 1),
    ("martes", 2),
    ("miercoles", 3),
    ("jueves", 4),
    ("viernes", 5),
    ("sabado", 6),
];

/// Minutes since midnight for an `HH:MM` string. Missing or malformed input counts as `00:00`.
pub fn time_to_minutes(hhmm: &str) -> u32 {
    TIME_REGEX
        .captures(hhmm)
        .and_then(|caps| {
            let hours: u32 = caps[1].parse().ok()?;
            let minutes: u32 = caps[2].parse().ok()?;
            Some(hours * 60 + minutes)
        })
        .unwrap_or(0)
}

/// Ordinal of a Spanish weekday name, 1 = lunes .. 6 = sábado; 0 if unknown.
pub fn day_name_to_num(day: &str) -> u8 {
    let key = to_search(&super::clean_text(day));
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, num)| *num)
        .unwrap_or(0)
}
