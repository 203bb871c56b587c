//! Line-oriented command shell: `chat`, `imagine`, `help`, `exit`.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info};

use crate::animator::{play, Animator};
use crate::config::{Config, VisionConfig};
use crate::display::{FrameSink, Speaker};
use crate::error::{CatSeekError, Result};
use crate::scenes::CatVision;
use crate::session::ChatSession;

pub const INTRO: &str = "Boot Sequence: Paws Initialized... Ready!";
pub const OUTRO: &str = "Powering down... Zzz...";
pub const SHELL_PROMPT: &str = "\nCatSeek R1> ";
pub const CHAT_PROMPT: &str = "Human: ";
pub const CHAT_BANNER: &str = "Chat Mode: Type 'exit' to return";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chat,
    Imagine,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl Command {
    /// Parse a line; only the first word matters
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.split_whitespace().next() {
            None => Command::Empty,
            Some("chat") => Command::Chat,
            Some("imagine") => Command::Imagine,
            Some("help") | Some("?") => Command::Help,
            Some("exit") => Command::Exit,
            Some(_) => Command::Unknown(line.to_string()),
        }
    }
}

const HELP: [(&str, &str); 4] = [
    ("chat", "Start interactive chat mode"),
    ("imagine", "Start visual imagination mode (60fps text)"),
    ("help", "List available commands"),
    ("exit", "Exit CATSEEK R1"),
];

/// Interactive shell reading commands from `R` and drawing into `K`
pub struct Shell<R, K>
where
    R: AsyncRead + Unpin,
    K: FrameSink + Clone + 'static,
{
    reader: BufReader<R>,
    sink: K,
    session: ChatSession<K>,
    vision: VisionConfig,
}

impl<R, K> Shell<R, K>
where
    R: AsyncRead + Unpin,
    K: FrameSink + Clone + 'static,
{
    /// Create a new shell
    pub fn new(input: R, config: &Config, sink: K) -> Result<Self> {
        Ok(Self {
            reader: BufReader::new(input),
            session: ChatSession::new(config, sink.clone())?,
            sink,
            vision: config.vision.clone(),
        })
    }

    /// Run until `exit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.sink.message(Speaker::System, INTRO)?;

        loop {
            self.sink.prompt(SHELL_PROMPT)?;
            let Some(line) = self.read_line().await? else {
                debug!("Input closed at shell prompt");
                break;
            };

            match Command::parse(&line) {
                Command::Chat => self.chat().await?,
                Command::Imagine => self.imagine().await?,
                Command::Help => self.help()?,
                Command::Exit => break,
                Command::Empty => {}
                Command::Unknown(line) => {
                    self.sink.message(Speaker::System, &format!("*** Unknown syntax: {}", line))?;
                }
            }
        }

        self.sink.message(Speaker::System, OUTRO)
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) => Err(CatSeekError::InputError(e)),
        }
    }

    async fn chat(&mut self) -> Result<()> {
        info!("Entering chat mode");
        self.sink.message(Speaker::System, CHAT_BANNER)?;
        self.session.greet()?;

        loop {
            self.sink.prompt(CHAT_PROMPT)?;
            let Some(line) = self.read_line().await? else {
                break;
            };
            if line.trim().eq_ignore_ascii_case("exit") {
                break;
            }
            self.session.exchange(&line).await?;
        }

        info!("Leaving chat mode");
        Ok(())
    }

    async fn imagine(&mut self) -> Result<()> {
        let scene = CatVision::new(self.vision.period, self.vision.bounce_rows);
        let animator = if self.vision.frames == 0 {
            Animator::new(scene)
        } else {
            Animator::with_frame_limit(scene, self.vision.frames)
        };

        let handle = play(animator, self.vision.interval(), self.sink.clone());
        if self.vision.frames == 0 {
            self.sink.message(Speaker::System, "Press Enter to wake the cat")?;
            self.read_line().await?;
            handle.cancel();
        }

        let frames = handle.finished().await;
        debug!("Imagination played {} frame(s)", frames);
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        self.sink.message(Speaker::System, "Available commands:")?;
        for (name, summary) in HELP {
            self.sink.message(Speaker::System, &format!("  {:<8} {}", name, summary))?;
        }
        Ok(())
    }
}
