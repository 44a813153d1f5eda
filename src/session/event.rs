//! Session notifications.

/// Something the host should react to, usually by refetching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session cookie value was added, removed or replaced.
    SessionChanged,
    /// A sign-out request cleared the stored cookies and session cache.
    SignedOut,
}

/// Receiver of [`SessionEvent`]s.
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn on_session_event(&self, event: SessionEvent) {
        self(event)
    }
}
