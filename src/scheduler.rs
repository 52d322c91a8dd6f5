//! Cooperative per-frame scheduling.
//!
//! The scheduler keeps at most one pending frame request. The host hands the
//! pending request back on every display refresh; a request belonging to a
//! cancelled chain is stale and its step never runs, so a restart can never
//! leave two chains drawing into the same state.

/// One outstanding "draw on the next refresh" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    chain: u64,
    frame: u64,
}

impl FrameRequest {
    pub fn chain(&self) -> u64 {
        self.chain
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn next(self) -> Self {
        Self {
            chain: self.chain,
            frame: self.frame + 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    chains_started: u64,
    pending: Option<FrameRequest>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        if self.pending.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Starts a fresh chain, cancelling the current one first.
    pub fn start(&mut self) -> FrameRequest {
        self.stop();
        self.chains_started += 1;
        let request = FrameRequest {
            chain: self.chains_started,
            frame: 0,
        };
        self.pending = Some(request);
        log::debug!("frame chain {} started", request.chain);
        request
    }

    /// Cancels the pending request. Does nothing when idle.
    pub fn stop(&mut self) {
        if let Some(request) = self.pending.take() {
            log::debug!(
                "frame chain {} cancelled after {} frames",
                request.chain,
                request.frame
            );
        }
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Services `request` on a display refresh.
    ///
    /// The next frame is requested before `step` runs. Returns `None` without
    /// running `step` when `request` is not the pending one.
    pub fn fire<S, R>(
        &mut self,
        request: FrameRequest,
        state: &mut S,
        step: impl FnOnce(&mut S) -> R,
    ) -> Option<R> {
        if self.pending != Some(request) {
            log::trace!(
                "dropping stale frame {} of chain {}",
                request.frame,
                request.chain
            );
            return None;
        }
        self.pending = Some(request.next());
        Some(step(state))
    }

    /// Fires whatever request is pending, if any.
    pub fn tick<S, R>(&mut self, state: &mut S, step: impl FnOnce(&mut S) -> R) -> Option<R> {
        let request = self.pending?;
        self.fire(request, state, step)
    }
}
