//! Keyword classification and canned reply selection.
//!
//! Input text is sorted into one of three categories by ordered checks
//! (question marker first, then greeting keywords), and a reply is drawn
//! uniformly at random from that category's list in the [`ResponseBank`].

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatSeekError, Result};

/// Classification bucket for a line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Input contained a greeting keyword
    Hello,
    /// Input contained the question marker
    Question,
    /// Anything else, including empty input
    Default,
}

impl Category {
    /// Every category, in bank order
    pub const ALL: [Category; 3] = [Category::Hello, Category::Question, Category::Default];

    /// The category's name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hello => "hello",
            Category::Question => "question",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from category to candidate replies.
///
/// Every category is guaranteed to have at least one entry.
#[derive(Debug, Clone)]
pub struct ResponseBank {
    entries: HashMap<Category, Vec<String>>,
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

impl ResponseBank {
    /// Build a bank, failing if any category is missing or empty
    pub fn from_map(mut entries: HashMap<Category, Vec<String>>) -> Result<Self> {
        for category in Category::ALL {
            match entries.get(&category) {
                Some(list) if !list.is_empty() => {}
                _ => return Err(CatSeekError::EmptyCategory(category)),
            }
        }
        entries.retain(|category, _| Category::ALL.contains(category));
        Ok(Self { entries })
    }

    /// Build a bank from one list per category
    pub fn new(hello: Vec<String>, question: Vec<String>, default: Vec<String>) -> Result<Self> {
        Self::from_map(HashMap::from([
            (Category::Hello, hello),
            (Category::Question, question),
            (Category::Default, default),
        ]))
    }

    /// The chatty bank used by the windowed front ends
    pub fn classic() -> Self {
        Self {
            entries: HashMap::from([
                (
                    Category::Hello,
                    owned(&[
                        "Meow! Welcome human.",
                        "Purr... Ready for questions?",
                        "*head bump* Hello!",
                    ]),
                ),
                (
                    Category::Question,
                    owned(&[
                        "Ancient feline secret... but where's the tuna?",
                        "Paw-sitive maybe, needs more nap time",
                        "Answer hidden in the litter box",
                    ]),
                ),
                (
                    Category::Default,
                    owned(&[
                        "*tail flick* Try again with fishier question",
                        "Napping engine engaged... Zzz",
                    ]),
                ),
            ]),
        }
    }

    /// The short bank used by the console front end
    pub fn terse() -> Self {
        Self {
            entries: HashMap::from([
                (Category::Hello, owned(&["Meow!", "Purr...", "*head bump*"])),
                (
                    Category::Question,
                    owned(&[
                        "Maybe yes, maybe no. Where's the food?",
                        "Ancient feline secret",
                    ]),
                ),
                (
                    Category::Default,
                    owned(&["*tail flick*", "Napping engine engaged"]),
                ),
            ]),
        }
    }

    /// Candidate replies for a category
    pub fn get(&self, category: Category) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check whether `reply` is one of the category's candidates
    pub fn contains(&self, category: Category, reply: &str) -> bool {
        self.get(category).iter().any(|r| r == reply)
    }
}

impl Default for ResponseBank {
    fn default() -> Self {
        Self::classic()
    }
}

/// Default greeting keywords
pub const DEFAULT_GREETINGS: [&str; 3] = ["hi", "hello", "hey"];

/// Ordered keyword classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    question_marker: char,
    greetings: Option<Regex>,
}

impl Classifier {
    /// Create a classifier from a question marker and greeting keywords.
    ///
    /// Keywords are lowercased once here and matched as substrings of the
    /// fully lowercased input. An empty keyword would match every input and
    /// is rejected.
    pub fn new(question_marker: char, greetings: &[String]) -> Result<Self> {
        if greetings.iter().any(|g| g.is_empty()) {
            return Err(CatSeekError::ConfigError(
                "greeting keywords must not be empty".to_string(),
            ));
        }

        let greetings = if greetings.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = greetings
                .iter()
                .map(|g| regex::escape(&g.to_lowercase()))
                .collect();
            let pattern = alternatives.join("|");
            Some(Regex::new(&pattern).map_err(|e| CatSeekError::ConfigError(e.to_string()))?)
        };

        Ok(Self {
            question_marker,
            greetings,
        })
    }

    /// Classify input text; the question check wins over the greeting check
    pub fn classify(&self, input: &str) -> Category {
        if input.contains(self.question_marker) {
            Category::Question
        } else if self
            .greetings
            .as_ref()
            .is_some_and(|re| re.is_match(&input.to_lowercase()))
        {
            Category::Hello
        } else {
            Category::Default
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        let greetings: Vec<String> = DEFAULT_GREETINGS.iter().map(|g| g.to_string()).collect();
        Self::new('?', &greetings).expect("built-in greeting pattern is valid")
    }
}

/// Maps free text to a randomly chosen canned reply
#[derive(Debug)]
pub struct Responder {
    bank: ResponseBank,
    classifier: Classifier,
    rng: StdRng,
}

impl Responder {
    /// Create a responder seeded from OS entropy
    pub fn new(bank: ResponseBank, classifier: Classifier) -> Self {
        Self {
            bank,
            classifier,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a responder with a fixed seed, for reproducible replies
    pub fn with_seed(bank: ResponseBank, classifier: Classifier, seed: u64) -> Self {
        Self {
            bank,
            classifier,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Get a reference to the response bank
    pub fn bank(&self) -> &ResponseBank {
        &self.bank
    }

    /// Classify input without drawing a reply
    pub fn classify(&self, input: &str) -> Category {
        self.classifier.classify(input)
    }

    /// Pick a reply for the given input
    pub fn respond(&mut self, input: &str) -> &str {
        let category = self.classifier.classify(input);
        debug!("Classified input as {}", category);

        self.bank
            .get(category)
            .choose(&mut self.rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(ResponseBank::default(), Classifier::default())
    }
}
