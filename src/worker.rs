//! Background execution of an organize pass.
//!
//! The organize pass is synchronous. A front end that must stay responsive
//! runs it here instead: the pass executes on its own thread and every
//! progress and log event is forwarded over a channel in the exact order the
//! synchronous call produced it.

use crate::file_category::CustomCategories;
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeReport, OrganizeResult};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// An event emitted by an organize pass.
#[derive(Debug, Clone, PartialEq)]
pub enum OrganizeEvent {
    /// Fraction of files processed so far, in `(0, 1]`.
    Progress(f64),
    /// A human-readable log line.
    Log(String),
}

/// Handle to an organize pass running on a background thread.
pub struct OrganizeHandle {
    events: Receiver<OrganizeEvent>,
    thread: JoinHandle<OrganizeResult<OrganizeReport>>,
}

impl OrganizeHandle {
    /// Blocking iterator over the pass's events.
    ///
    /// The iterator ends once the pass has finished and every event has been
    /// delivered.
    pub fn events(&self) -> impl Iterator<Item = OrganizeEvent> + '_ {
        self.events.iter()
    }

    /// Waits for the pass to finish and returns its result.
    ///
    /// Events not yet consumed through [`OrganizeHandle::events`] are dropped.
    pub fn join(self) -> OrganizeResult<OrganizeReport> {
        drop(self.events);
        self.thread
            .join()
            .map_err(|_| OrganizeError::WorkerPanicked)?
    }
}

/// Starts an organize pass over `directory` on a new thread.
///
/// # Examples
///
/// ```no_run
/// use foldersort::file_category::CustomCategories;
/// use foldersort::worker::{OrganizeEvent, spawn_organize};
///
/// let handle = spawn_organize("/path/to/Downloads".into(), CustomCategories::new());
/// for event in handle.events() {
///     match event {
///         OrganizeEvent::Progress(fraction) => println!("{:.0}%", fraction * 100.0),
///         OrganizeEvent::Log(line) => println!("{}", line),
///     }
/// }
/// let report = handle.join();
/// ```
pub fn spawn_organize(directory: PathBuf, custom: CustomCategories) -> OrganizeHandle {
    let (sender, events) = mpsc::channel();
    let log_sender = sender.clone();

    let thread = thread::spawn(move || {
        // A closed receiver only means nobody is listening any more.
        FileOrganizer::organize(
            &directory,
            &custom,
            |fraction| {
                let _ = sender.send(OrganizeEvent::Progress(fraction));
            },
            |line| {
                let _ = log_sender.send(OrganizeEvent::Log(line.to_string()));
            },
        )
    });

    OrganizeHandle { events, thread }
}
