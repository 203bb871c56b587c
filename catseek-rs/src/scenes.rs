//! Built-in animation payloads.

use crate::animator::{Placement, RenderOutput, Scene};

/// The cat drawn by the imagination view
pub const CAT_ART: [&str; 3] = [r" /\_/\  ", r"( o.o ) ", r" > ^ <  "];

/// Dot suffixes cycled by the typing indicator
pub const THINKING_DOTS: [&str; 4] = ["", ".", "..", "..."];

/// Bouncing cat art.
///
/// The art drifts down `bounce_rows` rows over one `period` and then jumps
/// back to the top.
#[derive(Debug, Clone)]
pub struct CatVision {
    period: u64,
    bounce_rows: usize,
}

impl CatVision {
    pub fn new(period: u64, bounce_rows: usize) -> Self {
        Self {
            period: period.max(1),
            bounce_rows,
        }
    }

    /// Vertical offset for a frame
    pub fn offset(&self, frame: u64) -> usize {
        let phase = frame % self.period;
        (self.bounce_rows as u64 * phase / self.period) as usize
    }
}

impl Default for CatVision {
    fn default() -> Self {
        Self::new(60, 4)
    }
}

impl Scene for CatVision {
    fn render(&self, frame: u64) -> RenderOutput {
        RenderOutput {
            lines: CAT_ART.iter().map(|l| l.to_string()).collect(),
            offset: self.offset(frame),
            placement: Placement::Screen,
        }
    }
}

/// "Cat is thinking..." status line
#[derive(Debug, Clone)]
pub struct ThinkingDots {
    label: String,
}

impl ThinkingDots {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for ThinkingDots {
    fn default() -> Self {
        Self::new("Cat is thinking")
    }
}

impl Scene for ThinkingDots {
    fn render(&self, frame: u64) -> RenderOutput {
        let dots = THINKING_DOTS[(frame % THINKING_DOTS.len() as u64) as usize];
        RenderOutput {
            lines: vec![format!("{}{}", self.label, dots)],
            offset: 0,
            placement: Placement::StatusLine,
        }
    }
}
