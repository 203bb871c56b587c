//! CatSeek: a tiny feline chat companion.
//!
//! This crate provides the keyword classifier and canned-reply responder,
//! plus a cancellable frame animator used for the typing indicator and the
//! bouncing cat "imagination" view.

pub mod animator;
pub mod config;
pub mod display;
pub mod error;
pub mod responder;
pub mod scenes;
pub mod session;
pub mod shell;
pub mod ticker;

pub use animator::{Animator, Phase, Placement, RenderOutput, Scene};
pub use config::{Config, DelayPolicy};
pub use error::{CatSeekError, Result};
pub use responder::{Category, Classifier, ResponseBank, Responder};
pub use session::ChatSession;
pub use shell::Shell;
pub use ticker::{spawn_ticker, TickControl, TickerHandle};
