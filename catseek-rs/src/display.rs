//! Output seam between the core and whatever draws it.
//!
//! [`TerminalSink`] writes to stdout using ANSI cursor control when the
//! terminal supports it. [`RecordingSink`] keeps everything in memory for
//! tests and embedding.

use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex};

use chrono::Local;
use colored::Colorize;

use crate::animator::{Placement, RenderOutput};
use crate::error::{CatSeekError, Result};

/// Who a chat line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Human,
    Cat,
    System,
}

/// Destination for chat lines and animation frames
pub trait FrameSink: Send {
    /// Draw an animation frame
    fn draw(&mut self, frame: &RenderOutput) -> Result<()>;

    /// Erase whatever the last frame at `placement` left behind
    fn clear(&mut self, placement: Placement) -> Result<()>;

    /// Show a complete chat line
    fn message(&mut self, speaker: Speaker, text: &str) -> Result<()>;

    /// Show an input prompt without a trailing newline
    fn prompt(&mut self, text: &str) -> Result<()>;
}

/// Check if the terminal supports ANSI escape sequences
pub fn supports_ansi() -> bool {
    if !io::stdout().is_terminal() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => !term.is_empty() && term != "dumb",
        Err(_) => false,
    }
}

const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Writes to stdout
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    ansi: bool,
    timestamps: bool,
}

impl TerminalSink {
    pub fn new(ansi: bool, timestamps: bool) -> Self {
        Self { ansi, timestamps }
    }

    /// Detect ANSI support from the environment
    pub fn detect(timestamps: bool) -> Self {
        Self::new(supports_ansi(), timestamps)
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(CatSeekError::OutputError)
    }
}

impl FrameSink for TerminalSink {
    fn draw(&mut self, frame: &RenderOutput) -> Result<()> {
        match frame.placement {
            Placement::Screen => {
                let mut out = String::new();
                if self.ansi {
                    out.push_str(CLEAR_SCREEN);
                }
                out.push_str(&"\n".repeat(frame.offset));
                for line in &frame.lines {
                    out.push_str(&format!("{}\n", line.cyan()));
                }
                self.write(&out)
            }
            Placement::StatusLine => {
                // Rewriting in place needs cursor control
                if !self.ansi {
                    return Ok(());
                }
                let line = frame.lines.join(" ");
                self.write(&format!("{}{}", CLEAR_LINE, line.dimmed()))
            }
        }
    }

    fn clear(&mut self, placement: Placement) -> Result<()> {
        if !self.ansi {
            return Ok(());
        }
        match placement {
            Placement::Screen => self.write(CLEAR_SCREEN),
            Placement::StatusLine => self.write(CLEAR_LINE),
        }
    }

    fn message(&mut self, speaker: Speaker, text: &str) -> Result<()> {
        let stamp = if self.timestamps {
            format!("{} ", Local::now().format("[%H:%M]").to_string().dimmed())
        } else {
            String::new()
        };

        let line = match speaker {
            Speaker::Human => format!("{}{} {}", stamp, "Human:".blue().bold(), text),
            Speaker::Cat => format!("{}{} {}", stamp, "Cat:".cyan().bold(), text),
            Speaker::System => format!("{}{}", stamp, text),
        };
        self.write(&format!("{}\n", line))
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        self.write(text)
    }
}

/// One call recorded by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Frame(RenderOutput),
    Clear(Placement),
    Message(Speaker, String),
    Prompt(String),
}

/// In-memory sink; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Text of every message from `speaker`
    pub fn messages(&self, speaker: Speaker) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Message(s, text) if s == speaker => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Every frame drawn at `placement`
    pub fn frames(&self, placement: Placement) -> Vec<RenderOutput> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Frame(f) if f.placement == placement => Some(f),
                _ => None,
            })
            .collect()
    }
}

impl FrameSink for RecordingSink {
    fn draw(&mut self, frame: &RenderOutput) -> Result<()> {
        self.push(SinkEvent::Frame(frame.clone()));
        Ok(())
    }

    fn clear(&mut self, placement: Placement) -> Result<()> {
        self.push(SinkEvent::Clear(placement));
        Ok(())
    }

    fn message(&mut self, speaker: Speaker, text: &str) -> Result<()> {
        self.push(SinkEvent::Message(speaker, text.to_string()));
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        self.push(SinkEvent::Prompt(text.to_string()));
        Ok(())
    }
}
