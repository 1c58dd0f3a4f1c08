//! Formatting utilities

/// Format a millisecond duration as a clock reading (mm:ss, or h:mm:ss past an hour)
///
/// Negative durations keep their sign so clock skew stays visible.
pub fn clock_ms(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let total_secs = ms.unsigned_abs() / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}{}:{:02}:{:02}", sign, hours, mins, secs)
    } else {
        format!("{}{:02}:{:02}", sign, mins, secs)
    }
}

/// Format a millisecond duration in human-readable form
pub fn duration_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let seconds = ms / 1000;
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Render a 0-100 score as a fixed-width bar
pub fn score_bar(score: f64, width: usize) -> String {
    let clamped = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ms() {
        assert_eq!(clock_ms(0), "00:00");
        assert_eq!(clock_ms(65_400), "01:05");
        assert_eq!(clock_ms(3_725_000), "1:02:05");
        assert_eq!(clock_ms(-2_000), "-00:02");
    }

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(450), "450ms");
        assert_eq!(duration_ms(12_000), "12s");
        assert_eq!(duration_ms(125_000), "2m 5s");
        assert_eq!(duration_ms(7_380_000), "2h 3m");
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(100.0, 4), "\u{2588}".repeat(4));
        assert_eq!(score_bar(0.0, 4), "\u{2591}".repeat(4));
        assert_eq!(score_bar(50.0, 4).chars().filter(|c| *c == '\u{2588}').count(), 2);
        assert_eq!(score_bar(f64::NAN, 3), "\u{2591}".repeat(3));
        assert_eq!(score_bar(250.0, 3).chars().count(), 3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("phone", 10), "phone");
        assert_eq!(truncate("looking away from desk", 10), "looking...");
        assert_eq!(truncate("abcdef", 2), "...");
    }
}
