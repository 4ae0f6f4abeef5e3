//! Turns host dialog presence into bind attempts
//!
//! The host builds its options dialog over several frames, so binding waits
//! a short settle delay after a dialog instance first shows up. Once bound,
//! repeated presence signals are no-ops; when the dialog disappears the
//! controls are dropped so the next instance gets fresh ones.

use std::time::{Duration, Instant};

use crate::constants::host::BIND_DELAY_MS;
use crate::controller::{AttachOutcome, DialogId, HostDialog, ReconciliationController};
use crate::persistence::ConfigStore;
use crate::target::RenderTarget;

pub struct DialogObserver {
    delay: Duration,
    /// Dialog instance currently observed and when it was first seen
    seen: Option<(DialogId, Instant)>,
}

impl DialogObserver {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(BIND_DELAY_MS))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, seen: None }
    }

    /// Feed one presence observation. Returns the bind outcome once the
    /// settle delay has passed, `None` while waiting or when no dialog is open.
    pub fn observe<S: ConfigStore, T: RenderTarget>(
        &mut self,
        dialog: Option<HostDialog>,
        controller: &mut ReconciliationController<S, T>,
        now: Instant,
    ) -> Option<AttachOutcome> {
        let Some(dialog) = dialog else {
            if self.seen.take().is_some() {
                controller.detach();
            }
            return None;
        };

        let first_seen = match self.seen {
            Some((id, at)) if id == dialog.id => at,
            _ => {
                // A different instance replaced the one we were bound to
                if self.seen.is_some() {
                    controller.detach();
                }
                self.seen = Some((dialog.id, now));
                now
            }
        };

        if now.duration_since(first_seen) < self.delay {
            return None;
        }
        Some(controller.attach(&dialog))
    }

    /// Time left before the observed dialog may be bound
    pub fn pending(&self, now: Instant) -> Option<Duration> {
        let (_, at) = self.seen?;
        let elapsed = now.duration_since(at);
        (elapsed < self.delay).then(|| self.delay - elapsed)
    }
}

impl Default for DialogObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::MissingHostElement;
    use crate::persistence::MemoryStore;
    use crate::target::DocumentRoot;

    fn dialog(id: DialogId, has_theme_anchor: bool) -> Option<HostDialog> {
        Some(HostDialog {
            id,
            has_theme_anchor,
        })
    }

    #[test]
    fn test_waits_for_settle_delay() {
        let mut controller =
            ReconciliationController::start(MemoryStore::new(), DocumentRoot::new());
        let mut observer = DialogObserver::new();
        let t0 = Instant::now();

        assert_eq!(observer.observe(dialog(1, true), &mut controller, t0), None);
        assert!(observer.pending(t0).is_some());
        assert!(controller.controls().is_none());

        let later = t0 + Duration::from_millis(BIND_DELAY_MS);
        assert_eq!(
            observer.observe(dialog(1, true), &mut controller, later),
            Some(AttachOutcome::Attached)
        );
        assert_eq!(observer.pending(later), None);
        assert_eq!(
            observer.observe(dialog(1, true), &mut controller, later),
            Some(AttachOutcome::AlreadyAttached)
        );
    }

    #[test]
    fn test_missing_anchor_retries_on_next_signal() {
        let mut controller =
            ReconciliationController::start(MemoryStore::new(), DocumentRoot::new());
        let mut observer = DialogObserver::with_delay(Duration::ZERO);
        let now = Instant::now();

        assert_eq!(
            observer.observe(dialog(3, false), &mut controller, now),
            Some(AttachOutcome::Deferred(MissingHostElement::ThemeAnchor))
        );
        assert_eq!(
            observer.observe(dialog(3, true), &mut controller, now),
            Some(AttachOutcome::Attached)
        );
    }

    #[test]
    fn test_closing_dialog_detaches() {
        let mut controller =
            ReconciliationController::start(MemoryStore::new(), DocumentRoot::new());
        let mut observer = DialogObserver::with_delay(Duration::ZERO);
        let now = Instant::now();

        observer.observe(dialog(1, true), &mut controller, now);
        assert!(controller.controls().is_some());

        assert_eq!(observer.observe(None, &mut controller, now), None);
        assert!(controller.controls().is_none());

        assert_eq!(
            observer.observe(dialog(2, true), &mut controller, now),
            Some(AttachOutcome::Attached)
        );
        assert_eq!(controller.controls().map(|c| c.dialog()), Some(2));
    }
}
