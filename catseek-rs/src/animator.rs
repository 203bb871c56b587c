//! Frame-counting animation state machine.
//!
//! An [`Animator`] moves through `Idle -> Running -> Stopped` exactly once.
//! Each [`Animator::tick`] renders the current frame of its [`Scene`] and
//! advances the counter; once stopped, ticks are no-ops. Timing lives in
//! [`crate::ticker`], which calls `tick` on a fixed interval.

use std::time::Duration;

use tracing::{debug, warn};

use crate::display::FrameSink;
use crate::ticker::{spawn_ticker, TickControl, TickerHandle};

/// Where a rendered frame should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Redraw the whole screen
    Screen,
    /// Rewrite a single status line in place
    StatusLine,
}

/// A rendered frame: text lines pushed down by `offset` blank rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub lines: Vec<String>,
    pub offset: usize,
    pub placement: Placement,
}

/// Deterministic frame payload for an animator
pub trait Scene: Send {
    /// Render the given frame index
    fn render(&self, frame: u64) -> RenderOutput;
}

/// Lifecycle of an animator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Animation state: a monotonic frame counter and a one-way lifecycle
pub struct Animator<S: Scene> {
    scene: S,
    frame: u64,
    phase: Phase,
    frame_limit: Option<u64>,
}

impl<S: Scene> Animator<S> {
    /// Create an idle animator that runs until stopped
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            frame: 0,
            phase: Phase::Idle,
            frame_limit: None,
        }
    }

    /// Create an idle animator that stops itself after `limit` frames
    pub fn with_frame_limit(scene: S, limit: u64) -> Self {
        Self {
            frame_limit: Some(limit),
            ..Self::new(scene)
        }
    }

    /// Current frame counter
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether ticks currently render
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Move from idle to running.
    ///
    /// Returns false (and changes nothing) if the animator is already
    /// running or has been stopped; a stopped animator never restarts.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Idle => {
                self.frame = 0;
                self.phase = Phase::Running;
                debug!("Animator started");
                true
            }
            Phase::Running => false,
            Phase::Stopped => {
                warn!("Ignoring start on a stopped animator");
                false
            }
        }
    }

    /// Render the current frame and advance the counter.
    ///
    /// Returns `None` without side effects unless running.
    pub fn tick(&mut self) -> Option<RenderOutput> {
        if self.phase != Phase::Running {
            return None;
        }

        if self.frame_limit.is_some_and(|limit| self.frame >= limit) {
            self.finish();
            return None;
        }

        let output = self.scene.render(self.frame);
        self.frame += 1;
        Some(output)
    }

    /// Stop the animator. Idempotent; also valid before start.
    pub fn stop(&mut self) {
        if self.phase != Phase::Stopped {
            self.finish();
        }
    }

    fn finish(&mut self) {
        debug!("Animator stopped after {} frame(s)", self.frame);
        self.phase = Phase::Stopped;
    }
}

/// Start `animator` and draw one frame into `sink` every `interval`.
///
/// The animation ends when the returned handle is cancelled or dropped, or
/// when the animator stops on its own (frame limit reached).
pub fn play<S, K>(mut animator: Animator<S>, interval: Duration, mut sink: K) -> TickerHandle
where
    S: Scene + 'static,
    K: FrameSink + 'static,
{
    animator.start();
    spawn_ticker(interval, move |_| match animator.tick() {
        Some(frame) => match sink.draw(&frame) {
            Ok(()) => TickControl::Continue,
            Err(e) => {
                warn!("Failed to draw frame: {}", e);
                TickControl::Stop
            }
        },
        None => TickControl::Stop,
    })
}
