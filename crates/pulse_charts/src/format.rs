pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    format!("{value:.decimals$}")
}

/// Legend share, e.g. `37.5`; an empty total reads `0.0`.
pub fn format_share(part: f64, total: f64) -> String {
    if total > 0.0 {
        format_fixed(part / total * 100.0, 1)
    } else {
        "0.0".to_string()
    }
}

/// Shortest decimal form of an axis tick value (`4`, `2.5`, `0.2`).
pub fn format_tick(value: f32) -> String {
    if !value.is_finite() {
        return format_fixed(value as f64, 0);
    }
    let s = trim_trailing_zeroes(format!("{value:.6}"));
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Tick label with a percent sign appended (`40%`).
pub fn format_percent_tick(value: f32) -> String {
    format!("{}%", format_tick(value))
}

fn trim_trailing_zeroes(mut s: String) -> String {
    if let Some(dot) = s.find('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.len() == dot + 1 {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_guards_empty_totals() {
        assert_eq!(format_share(3.0, 8.0), "37.5");
        assert_eq!(format_share(0.0, 0.0), "0.0");
        assert_eq!(format_share(1.0, 3.0), "33.3");
    }

    #[test]
    fn ticks_drop_needless_decimals() {
        assert_eq!(format_tick(4.0), "4");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.2), "0.2");
        assert_eq!(format_tick(-0.0), "0");
        assert_eq!(format_percent_tick(40.0), "40%");
    }
}
