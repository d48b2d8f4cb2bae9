//! Self-clearing notification banner.
//!
//! A [`Notifier`] holds at most one message. Each message is cleared after
//! the display period unless another message replaced it first; showing a
//! new message cancels the pending clear of the old one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long a notification stays up by default.
pub const DEFAULT_DISPLAY: Duration = Duration::from_secs(5);

/// Visual class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A mutation succeeded.
    Confirmation,
    /// Something the user should know, not a failure.
    Info,
    /// The operation failed.
    Error,
}

/// A message on the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Visual class
    pub kind: NotificationKind,
    /// Text shown to the user
    pub message: String,
}

#[derive(Debug, Default)]
struct ClearState {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Holds the current notification and schedules its removal.
#[derive(Debug)]
pub struct Notifier {
    tx: Arc<watch::Sender<Option<Notification>>>,
    state: Arc<Mutex<ClearState>>,
    display_for: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// A notifier with the default five second display period.
    pub fn new() -> Self {
        Self::with_display(DEFAULT_DISPLAY)
    }

    /// A notifier with a custom display period.
    pub fn with_display(display_for: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            state: Arc::new(Mutex::new(ClearState::default())),
            display_for,
        }
    }

    /// Display period.
    pub fn display_for(&self) -> Duration {
        self.display_for
    }

    /// Shows `message`, replacing whatever was displayed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification {
            kind,
            message: message.into(),
        };
        log::debug!("Notification {:?}: {}", kind, notification.message);

        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        self.tx.send_replace(Some(notification));

        let generation = state.generation;
        let tx = Arc::clone(&self.tx);
        let shared = Arc::clone(&self.state);
        let delay = self.display_for;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock(&shared);
            if state.generation == generation {
                state.pending = None;
                tx.send_replace(None);
            }
        }));
    }

    /// Shows a confirmation.
    pub fn confirm(&self, message: impl Into<String>) {
        self.show(NotificationKind::Confirmation, message);
    }

    /// Shows an informational message.
    pub fn info(&self, message: impl Into<String>) {
        self.show(NotificationKind::Info, message);
    }

    /// Shows an error.
    pub fn error(&self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message);
    }

    /// Removes the current notification now.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }
        self.tx.send_replace(None);
    }

    /// The notification on display, if any.
    pub fn current(&self) -> Option<Notification> {
        self.tx.borrow().clone()
    }

    /// A receiver that observes every change to the banner.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.tx.subscribe()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.state).pending.take() {
            handle.abort();
        }
    }
}

fn lock(state: &Mutex<ClearState>) -> MutexGuard<'_, ClearState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
