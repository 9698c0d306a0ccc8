//! Best-effort user notification.
//!
//! Fire-and-forget: a notification that cannot be shown is logged and
//! forgotten. The loop never treats a notification failure as a cycle
//! failure.

/// Title of the wellness nudge.
pub const ALERT_TITLE: &str = "A gentle check-in";

/// Body of the wellness nudge. Deliberately soft — the user is never shown
/// what was detected or why.
pub const ALERT_BODY: &str = "It looks like this might be a heavy moment. \
Noticing a thought is the first step to letting it pass. Take a breath and \
be kind to yourself.";

const ALERT_TIMEOUT_MS: u32 = 10_000;

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// OS desktop notification.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .appname("mind-glass")
            .summary(title)
            .body(body)
            .timeout(notify_rust::Timeout::Milliseconds(ALERT_TIMEOUT_MS))
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Display(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Could not display notification: {0}")]
    Display(String),
}
