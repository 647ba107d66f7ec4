//! Getting work onto the UI thread.
//!
//! The component tree is single-threaded. Other threads (file watchers,
//! network callbacks) hand work to the window through a [`UiDispatcher`];
//! queued jobs run at the start of the window's next update.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use tessera_core::GuiResult;

use crate::window::GuiWindow;

pub type UiJob = Box<dyn FnOnce(&mut GuiWindow) -> GuiResult<()> + Send>;

/// Outcome of [`UiDispatcher::run_or_schedule`].
pub enum Dispatch<F> {
    /// Already on the UI thread; the caller gets the job back and runs it.
    Inline(F),
    /// Queued for the window's next update.
    Queued,
}

impl<F> Dispatch<F> {
    pub fn is_inline(&self) -> bool {
        matches!(self, Dispatch::Inline(_))
    }
}

struct Shared {
    ui_thread: ThreadId,
    queue: Mutex<VecDeque<UiJob>>,
}

/// `Send + Sync` handle bound to the thread that created it.
#[derive(Clone)]
pub struct UiDispatcher(Arc<Shared>);

impl UiDispatcher {
    /// Binds to the calling thread.
    pub fn new() -> Self {
        Self(Arc::new(Shared {
            ui_thread: thread::current().id(),
            queue: Mutex::new(VecDeque::new()),
        }))
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.0.ui_thread
    }

    pub fn run_or_schedule<F>(&self, job: F) -> Dispatch<F>
    where
        F: FnOnce(&mut GuiWindow) -> GuiResult<()> + Send + 'static,
    {
        if self.is_ui_thread() {
            return Dispatch::Inline(job);
        }
        self.schedule(job);
        Dispatch::Queued
    }

    /// Queues `job` regardless of the calling thread.
    pub fn schedule(&self, job: impl FnOnce(&mut GuiWindow) -> GuiResult<()> + Send + 'static) {
        self.0.queue.lock().push_back(Box::new(job));
    }

    pub fn pending(&self) -> usize {
        self.0.queue.lock().len()
    }

    /// Takes every queued job. The lock is released before any job runs, so
    /// jobs may schedule more work for the following update.
    pub(crate) fn drain(&self) -> Vec<UiJob> {
        self.0.queue.lock().drain(..).collect()
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
