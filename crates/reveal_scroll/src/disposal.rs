//! Disposal of live timelines
//!
//! Every timeline the engine creates is registered here. Teardown and
//! detachment both route through [`DisposalManager`], which pauses and
//! removes timelines from the scheduler. Handles that were already removed
//! are skipped.

use reveal_animation::{AnimationScheduler, TimelineId};
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct DisposalManager {
    handles: Vec<TimelineId>,
}

impl DisposalManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a timeline for later disposal; registering twice is harmless
    pub fn register(&mut self, id: TimelineId) {
        if !self.handles.contains(&id) {
            self.handles.push(id);
        }
    }

    /// Pause and remove one timeline; returns whether it was still live
    pub fn dispose(&mut self, id: TimelineId, scheduler: &mut AnimationScheduler) -> bool {
        self.handles.retain(|h| *h != id);
        match scheduler.remove(id) {
            Some(mut timeline) => {
                timeline.pause();
                trace!(?id, "disposed timeline");
                true
            }
            None => false,
        }
    }

    /// Dispose every registered timeline; returns how many were still live
    pub fn dispose_all(&mut self, scheduler: &mut AnimationScheduler) -> usize {
        let mut disposed = 0;
        for id in self.handles.drain(..) {
            if let Some(mut timeline) = scheduler.remove(id) {
                timeline.pause();
                disposed += 1;
            }
        }
        debug!(disposed, "disposed all timelines");
        disposed
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
