//! Countdown formatting

/// Format a seconds count as `MM:SS`.
///
/// Minutes are not wrapped into hours, so a 90 minute turn reads `90:00`.
/// Negative counts only occur on the tick that expires a turn and render as
/// `00:00`.
pub fn get_time_remaining(seconds_remaining: i64) -> String {
    let seconds_remaining = seconds_remaining.max(0);
    format!("{:02}:{:02}", seconds_remaining / 60, seconds_remaining % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds_independently() {
        assert_eq!(get_time_remaining(125), "02:05");
        assert_eq!(get_time_remaining(59), "00:59");
        assert_eq!(get_time_remaining(0), "00:00");
        assert_eq!(get_time_remaining(600), "10:00");
    }

    #[test]
    fn long_turns_keep_counting_minutes() {
        assert_eq!(get_time_remaining(5400), "90:00");
        assert_eq!(get_time_remaining(6001), "100:01");
    }

    #[test]
    fn expired_turns_read_zero() {
        assert_eq!(get_time_remaining(-1), "00:00");
        assert_eq!(get_time_remaining(-65), "00:00");
    }
}
