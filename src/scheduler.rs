//! Coalescing of content, link and redraw requests.
//!
//! Requests only raise a flag. The owner drains the flags once per event-loop
//! turn, so any number of requests between two flushes cost a single pass.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Which passes a flush must run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingWork {
    pub content: bool,
    pub links: bool,
    pub redraw: bool,
}

impl PendingWork {
    pub fn is_empty(&self) -> bool {
        !(self.content || self.links || self.redraw)
    }
}

#[derive(Default)]
pub struct Scheduler {
    content: Cell<bool>,
    links: Cell<bool>,
    redraw: Cell<bool>,
}

impl Scheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// The node set changed; implies a link rebuild and a redraw.
    pub fn request_content(&self) {
        self.content.set(true);
        self.request_links();
    }

    /// Links must be rebuilt; implies a redraw.
    pub fn request_links(&self) {
        self.links.set(true);
        self.redraw.set(true);
    }

    pub fn request_redraw(&self) {
        self.redraw.set(true);
    }

    pub fn pending(&self) -> PendingWork {
        PendingWork {
            content: self.content.get(),
            links: self.links.get(),
            redraw: self.redraw.get(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending().is_empty()
    }

    /// Clear the content flag, returning whether it was set.
    pub fn take_content(&self) -> bool {
        self.content.replace(false)
    }

    pub fn take_links(&self) -> bool {
        self.links.replace(false)
    }

    pub fn take_redraw(&self) -> bool {
        self.redraw.replace(false)
    }

    /// An invalidation callback for nodes.
    ///
    /// It holds the scheduler weakly, so a node outliving the canvas only
    /// fires into nothing.
    pub fn links_invalidator(self: &Rc<Self>) -> Rc<dyn Fn()> {
        let weak: Weak<Scheduler> = Rc::downgrade(self);
        Rc::new(move || {
            if let Some(scheduler) = weak.upgrade() {
                scheduler.request_links();
            }
        })
    }
}
