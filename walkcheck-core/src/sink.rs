//! Where query results go once derived.

use std::time::{Duration, Instant};

use crate::report::WeatherReport;

/// How long an error message stays up unless a newer one replaces it.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub message: String,
    pub display_for: Duration,
}

impl ErrorNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), display_for: ERROR_DISPLAY_DURATION }
    }
}

/// Receives rendered query results. Implementations own all formatting for
/// their medium (terminal, JSON, a test recorder).
pub trait PresentationSink {
    /// A fetch for `city` is about to start.
    fn show_loading(&mut self, _city: &str) {}

    fn render(&mut self, report: &WeatherReport);

    fn show_error(&mut self, notice: &ErrorNotice);

    fn clear_error(&mut self) {}
}

/// Single-slot error display: a newer notice replaces the older one and a
/// notice disappears once its display duration has elapsed.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    active: Option<(ErrorNotice, Instant)>,
}

impl ErrorBanner {
    pub fn post(&mut self, notice: ErrorNotice, now: Instant) {
        self.active = Some((notice, now));
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// The notice still on screen at `now`, dropping it if it has expired.
    pub fn visible(&mut self, now: Instant) -> Option<&ErrorNotice> {
        let expired = matches!(
            &self.active,
            Some((notice, posted)) if now.saturating_duration_since(*posted) >= notice.display_for
        );
        if expired {
            self.active = None;
        }
        self.active.as_ref().map(|(notice, _)| notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_its_duration() {
        let start = Instant::now();
        let mut banner = ErrorBanner::default();
        banner.post(ErrorNotice::new("Please enter a city name"), start);

        assert_eq!(
            banner.visible(start + Duration::from_secs(4)).map(|n| n.message.as_str()),
            Some("Please enter a city name")
        );
        assert!(banner.visible(start + Duration::from_secs(5)).is_none());
        assert!(banner.visible(start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn newer_notice_supersedes_and_restarts_timer() {
        let start = Instant::now();
        let mut banner = ErrorBanner::default();
        banner.post(ErrorNotice::new("first"), start);
        banner.post(ErrorNotice::new("second"), start + Duration::from_secs(3));

        let shown = banner.visible(start + Duration::from_secs(6)).map(|n| n.message.clone());
        assert_eq!(shown.as_deref(), Some("second"));
    }

    #[test]
    fn clear_hides_immediately() {
        let start = Instant::now();
        let mut banner = ErrorBanner::default();
        banner.post(ErrorNotice::new("oops"), start);
        banner.clear();
        assert!(banner.visible(start).is_none());
    }

    #[test]
    fn default_duration_is_five_seconds() {
        assert_eq!(ErrorNotice::new("x").display_for, Duration::from_secs(5));
    }
}
