//! Side-effect collaborators invoked by the core.
//!
//! # Responsibility
//! - Describe notification and celebration effects as traits.
//! - Provide in-process recorders for embedding and tests.
//!
//! # Invariants
//! - `Notifier::notify` is only called by the alarm scanner, and only while
//!   permission is `Granted`.
//! - `Celebration::celebrate` is only called on a false→true completion.

use std::cell::{Cell, RefCell};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Notification permission as reported by the host environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    #[default]
    Default,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Default => "default",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivers reminders to the user.
pub trait Notifier {
    /// Current permission; queried on every scan tick.
    fn permission(&self) -> Permission;
    /// Asks the user for permission and returns the resulting state.
    fn request_permission(&self) -> Permission;
    fn notify(&self, title: &str, body: &str);
}

/// Fire-and-forget completion effect.
pub trait Celebration {
    fn celebrate(&self);
}

/// Celebration that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCelebration;

impl Celebration for NoCelebration {
    fn celebrate(&self) {}
}

/// Notifier that records every delivered notification.
///
/// Clones share state. `request_permission` grants whatever was configured
/// with `on_request`.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    permission: Rc<Cell<Permission>>,
    on_request: Permission,
    sent: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Rc::new(Cell::new(permission)),
            on_request: permission,
            sent: Rc::default(),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted)
    }

    /// Permission that `request_permission` will switch to.
    pub fn on_request(mut self, permission: Permission) -> Self {
        self.on_request = permission;
        self
    }

    pub fn set_permission(&self, permission: Permission) {
        self.permission.set(permission);
    }

    /// `(title, body)` pairs in delivery order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&self) -> Permission {
        if self.permission.get() == Permission::Default {
            self.permission.set(self.on_request);
        }
        self.permission.get()
    }

    fn notify(&self, title: &str, body: &str) {
        self.sent
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
    }
}

/// Celebration that counts invocations. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingCelebration {
    count: Rc<Cell<usize>>,
}

impl CountingCelebration {
    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Celebration for CountingCelebration {
    fn celebrate(&self) {
        self.count.set(self.count.get() + 1);
    }
}
