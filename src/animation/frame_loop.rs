use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared cancellation flag handed to a running frame task.
///
/// Clones observe the same flag. Once cancelled a token never resets; restarting a loop hands
/// out a fresh token.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal every clone to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a [`FrameTask`] wants after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Call again next tick.
    Continue,
    /// Finished; the loop drops the task.
    Done,
}

/// A per-frame callback driven by a [`FrameLoop`].
pub trait FrameTask {
    /// Advance to `now_secs` seconds since the task started.
    fn frame(&mut self, now_secs: f64) -> FrameControl;
}

struct Running {
    task: Box<dyn FrameTask>,
    token: CancelToken,
}

/// Single-slot frame scheduler.
///
/// At most one task is live. Starting a task cancels the previous one before the new one is
/// installed, so two loops can never advance the same state in one tick.
#[derive(Default)]
pub struct FrameLoop {
    running: Option<Running>,
    frames: u64,
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("running", &self.is_running())
            .field("frames", &self.frames)
            .finish()
    }
}

impl FrameLoop {
    /// Idle loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `task`, cancelling whatever was running. Returns the new task's token.
    pub fn start(&mut self, task: impl FrameTask + 'static) -> CancelToken {
        self.stop();
        let token = CancelToken::new();
        self.running = Some(Running {
            task: Box::new(task),
            token: token.clone(),
        });
        token
    }

    /// Cancel the running task, if any.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
            tracing::debug!(frames = self.frames, "frame loop stopped");
        }
        self.frames = 0;
    }

    /// Whether a task is installed and not cancelled.
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|r| !r.token.is_cancelled())
    }

    /// Frames delivered to the current task.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Deliver one frame. Returns `false` when nothing ran.
    pub fn tick(&mut self, now_secs: f64) -> bool {
        let Some(running) = self.running.as_mut() else {
            return false;
        };
        if running.token.is_cancelled() {
            self.running = None;
            return false;
        }
        let control = running.task.frame(now_secs);
        self.frames += 1;
        if control == FrameControl::Done {
            running.token.cancel();
            self.running = None;
        }
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/frame_loop.rs"]
mod tests;
