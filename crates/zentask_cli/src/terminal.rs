//! Collaborators for a terminal session.

use std::cell::Cell;
use std::io::Write as _;
use std::path::PathBuf;

use log::debug;
use zentask_core::motivation::{Motivation, MotivationError, MotivationSource};
use zentask_core::ports::{Celebration, Notifier, Permission};

/// Prints reminders to stdout with a terminal bell.
///
/// Permission starts undecided; asking grants it unless the session is quiet.
pub struct TerminalNotifier {
    permission: Cell<Permission>,
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self {
            permission: Cell::new(Permission::Default),
            quiet,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn permission(&self) -> Permission {
        self.permission.get()
    }

    fn request_permission(&self) -> Permission {
        if self.permission.get() == Permission::Default {
            let decided = if self.quiet {
                Permission::Denied
            } else {
                Permission::Granted
            };
            self.permission.set(decided);
        }
        self.permission.get()
    }

    fn notify(&self, title: &str, body: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "\x07[{title}] {body}");
        let _ = stdout.flush();
    }
}

/// Prints a short line when a task is completed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalCelebration;

impl Celebration for TerminalCelebration {
    fn celebrate(&self) {
        eprintln!("*** Nice work! One more done. ***");
    }
}

/// Reads an externally generated `{"motivation", "tip"}` document.
///
/// `{pending}` in either field is replaced with the number of open tasks.
pub struct FileMotivation {
    path: PathBuf,
}

impl FileMotivation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

const PENDING_PLACEHOLDER: &str = "{pending}";

impl MotivationSource for FileMotivation {
    async fn fetch_motivation(&self, pending_count: usize) -> Result<Motivation, MotivationError> {
        debug!("event=motivation_read module=terminal status=start pending={pending_count}");
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|err| {
            MotivationError::Unavailable(format!("{}: {err}", self.path.display()))
        })?;
        let template: Motivation =
            serde_json::from_str(&raw).map_err(|err| MotivationError::Malformed(err.to_string()))?;

        let pending = pending_count.to_string();
        Ok(Motivation {
            motivation: template.motivation.replace(PENDING_PLACEHOLDER, &pending),
            tip: template.tip.replace(PENDING_PLACEHOLDER, &pending),
        })
    }
}
