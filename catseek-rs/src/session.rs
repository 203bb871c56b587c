//! A single chat conversation: delay, typing indicator, reply.

use tracing::debug;

use crate::animator::{play, Animator, Placement};
use crate::config::{Config, DelayConfig, DelayPolicy, TypingConfig};
use crate::display::{FrameSink, Speaker};
use crate::error::Result;
use crate::responder::Responder;
use crate::scenes::ThinkingDots;

/// Drives one conversation against a sink
pub struct ChatSession<K: FrameSink + Clone + 'static> {
    responder: Responder,
    sink: K,
    delay: DelayConfig,
    typing: TypingConfig,
    greeting: String,
}

impl<K: FrameSink + Clone + 'static> ChatSession<K> {
    /// Create a session from configuration
    pub fn new(config: &Config, sink: K) -> Result<Self> {
        Ok(Self {
            responder: config.responder()?,
            sink,
            delay: config.delay.clone(),
            typing: config.typing.clone(),
            greeting: config.greeting.clone(),
        })
    }

    /// Create a session around an existing responder
    pub fn with_responder(
        responder: Responder,
        sink: K,
        delay: DelayConfig,
        typing: TypingConfig,
    ) -> Self {
        Self {
            responder,
            sink,
            delay,
            typing,
            greeting: String::new(),
        }
    }

    /// Get a reference to the responder
    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Get a mutable reference to the sink
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Show the opening banner, if one is configured
    pub fn greet(&mut self) -> Result<()> {
        if self.greeting.is_empty() {
            return Ok(());
        }
        self.sink.message(Speaker::Cat, &self.greeting)
    }

    /// Answer one line of input.
    ///
    /// Blank input is ignored and yields `None`.
    pub async fn exchange(&mut self, input: &str) -> Result<Option<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        self.wait_for_reply().await?;

        let reply = self.responder.respond(input).to_string();
        self.sink.message(Speaker::Cat, &reply)?;
        Ok(Some(reply))
    }

    async fn wait_for_reply(&mut self) -> Result<()> {
        let delay = self.delay.response_delay();

        match self.delay.policy {
            DelayPolicy::Blocking => {
                debug!("Blocking for {:?} before replying", delay);
                std::thread::sleep(delay);
            }
            DelayPolicy::Scheduled => {
                debug!("Scheduling reply after {:?}", delay);
                let indicator = self.typing.enabled.then(|| {
                    let scene = ThinkingDots::new(self.typing.label.clone());
                    play(Animator::new(scene), self.typing.interval(), self.sink.clone())
                });

                tokio::time::sleep(delay).await;

                if let Some(indicator) = indicator {
                    indicator.cancel();
                    indicator.finished().await;
                    self.sink.clear(Placement::StatusLine)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{RecordingSink, SinkEvent};
    use crate::responder::{Category, Classifier, ResponseBank};

    fn session(
        policy: DelayPolicy,
        delay_ms: u64,
        typing: bool,
    ) -> (ChatSession<RecordingSink>, RecordingSink) {
        let sink = RecordingSink::new();
        let responder = Responder::with_seed(ResponseBank::classic(), Classifier::default(), 1);
        let delay = DelayConfig {
            policy,
            response_delay_ms: delay_ms,
        };
        let typing = TypingConfig {
            enabled: typing,
            ..TypingConfig::default()
        };
        (
            ChatSession::with_responder(responder, sink.clone(), delay, typing),
            sink,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_reply_shows_typing_indicator() {
        let (mut session, sink) = session(DelayPolicy::Scheduled, 800, true);

        let reply = session.exchange("Hello there?").await.unwrap().unwrap();
        assert!(session.responder().bank().contains(Category::Question, &reply));

        let frames = sink.frames(Placement::StatusLine);
        assert!(!frames.is_empty());
        assert_eq!(frames[0].lines, vec!["Cat is thinking".to_string()]);

        let events = sink.events();
        let clear_at = events
            .iter()
            .position(|e| *e == SinkEvent::Clear(Placement::StatusLine))
            .expect("indicator cleared");
        assert_eq!(
            events[clear_at + 1..],
            [SinkEvent::Message(Speaker::Cat, reply)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_indicator_stops_after_reply() {
        let (mut session, sink) = session(DelayPolicy::Scheduled, 800, true);
        session.exchange("hey").await.unwrap();
        let drawn = sink.frames(Placement::StatusLine).len();

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert_eq!(sink.frames(Placement::StatusLine).len(), drawn);
    }

    #[tokio::test]
    async fn test_blocking_reply_has_no_indicator() {
        let (mut session, sink) = session(DelayPolicy::Blocking, 16, true);

        let reply = session.exchange("hey!").await.unwrap().unwrap();
        assert!(session.responder().bank().contains(Category::Hello, &reply));
        assert!(sink.frames(Placement::StatusLine).is_empty());
        assert_eq!(sink.messages(Speaker::Cat), vec![reply]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_disabled() {
        let (mut session, sink) = session(DelayPolicy::Scheduled, 800, false);
        session.exchange("meow").await.unwrap();
        assert!(sink.frames(Placement::StatusLine).is_empty());
        assert!(!sink.events().contains(&SinkEvent::Clear(Placement::StatusLine)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_ignored() {
        let (mut session, sink) = session(DelayPolicy::Scheduled, 800, true);
        assert_eq!(session.exchange("   ").await.unwrap(), None);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_greet_uses_configured_banner() {
        let sink = RecordingSink::new();
        let mut session = ChatSession::new(&Config::default(), sink.clone()).unwrap();
        session.greet().unwrap();
        assert_eq!(
            sink.messages(Speaker::Cat),
            vec!["Hi I'm Catseek. How can I help you today?".to_string()]
        );
    }
}
