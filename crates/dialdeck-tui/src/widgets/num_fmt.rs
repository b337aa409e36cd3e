//! Small numeric formatting helpers for metric panels.

/// Format a utilization percentage with one decimal place.
pub fn fmt_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format a call duration in seconds as `MmSSs` or `Ns`.
pub fn fmt_duration_secs(secs: i64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}

/// Format a completion ratio as `done/total`.
pub fn fmt_ratio(done: u64, total: u64) -> String {
    format!("{done}/{total}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(fmt_percent(70.0), "70.0%");
        assert_eq!(fmt_percent(33.333), "33.3%");
    }

    #[test]
    fn durations_split_at_a_minute() {
        assert_eq!(fmt_duration_secs(0), "0s");
        assert_eq!(fmt_duration_secs(59), "59s");
        assert_eq!(fmt_duration_secs(60), "1m00s");
        assert_eq!(fmt_duration_secs(125), "2m05s");
    }

    #[test]
    fn ratio_is_done_over_total() {
        assert_eq!(fmt_ratio(3, 5), "3/5");
    }
}
