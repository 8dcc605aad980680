//! Text formatting helpers shared by the renderers.

use std::time::Duration;

/// Formats a duration as `MM:SS`, truncating fractional seconds.
///
/// Minutes are not capped at 59, so a 75-minute run reads `75:00`.
#[must_use]
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Draws a fixed-width progress bar for `fraction` (clamped to `[0, 1]`).
#[must_use]
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = filled_cells(fraction, width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n('█', filled));
    bar.extend(std::iter::repeat_n('░', width - filled));
    bar
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn filled_cells(fraction: f64, width: usize) -> usize {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((fraction * width as f64).round() as usize).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_secs(270)), "04:30");
        assert_eq!(format_clock(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_clock(Duration::from_secs(75 * 60)), "75:00");
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(1.0, 4), "████");
        assert_eq!(progress_bar(7.0, 4), "████");
        assert_eq!(progress_bar(-1.0, 4), "░░░░");
        assert_eq!(progress_bar(f64::NAN, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 0), "");
    }
}
