//! Time formatting helpers.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a number of seconds with its two most significant units, e.g.
/// `"1h 1m"`. A zero second unit is dropped (`"30d"`).
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let Some(lead) = UNITS.iter().position(|(size, _)| secs >= *size) else {
        return format!("{secs}s");
    };
    let (size, unit) = UNITS[lead];
    let mut out = format!("{}{unit}", secs / size);
    if let Some((next_size, next_unit)) = UNITS.get(lead + 1) {
        let rest = (secs % size) / next_size;
        if rest > 0 {
            out.push_str(&format!(" {rest}{next_unit}"));
        }
    }
    out
}
