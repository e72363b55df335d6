use std::time::Duration;

use crate::settings::RetrySettings;

/// Doubling delay, capped at `max`.
#[derive(Clone, Debug)]
pub(crate) struct Backoff {
    initial: Duration,
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub(crate) fn new(settings: &RetrySettings) -> Self {
        let initial = settings.initial_backoff.min(settings.max_backoff);
        Self {
            initial,
            next: initial,
            max: settings.max_backoff,
        }
    }

    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.max);
        delay
    }

    pub(crate) fn reset(&mut self) {
        self.next = self.initial;
    }
}
