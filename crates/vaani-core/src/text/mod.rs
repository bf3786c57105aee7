//! Transcript text processing.
//!
//! Proper nouns are weak evidence of spoken language (names travel across
//! languages verbatim), so the transcription backend strips them before a
//! transcript is allowed to gate detection. Part-of-speech tagging is an
//! injected capability behind the [`PosTagger`] trait; the engine ships a
//! capitalization heuristic and tests inject fakes.

use std::sync::OnceLock;

use tracing::debug;

use crate::error::Result;

/// Coarse tag set; only the proper-noun distinction matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    ProperNoun,
    Other,
}

#[derive(Debug, Clone)]
pub struct TaggedToken {
    pub text: String,
    pub tag: PosTag,
}

/// Part-of-speech tagging capability.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;
}

/// Removes proper-noun tokens from text and re-joins the rest with single
/// spaces. The tagger is initialized on first use; an injected tagger
/// replaces the default entirely.
pub struct ProperNounFilter {
    tagger: OnceLock<Box<dyn PosTagger>>,
}

impl ProperNounFilter {
    /// Filter backed by the default heuristic tagger, created lazily.
    pub fn new() -> Self {
        Self {
            tagger: OnceLock::new(),
        }
    }

    /// Filter backed by a caller-provided tagger.
    pub fn with_tagger(tagger: Box<dyn PosTagger>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(tagger);
        Self { tagger: cell }
    }

    /// Drop proper-noun tokens; join survivors with single spaces.
    /// Empty input yields empty output without touching the tagger.
    pub fn filter(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let tagger = self
            .tagger
            .get_or_init(|| Box::new(HeuristicTagger::default()));
        let tokens = tagger.tag(text)?;

        let kept: Vec<&str> = tokens
            .iter()
            .filter(|t| t.tag != PosTag::ProperNoun)
            .map(|t| t.text.as_str())
            .collect();
        let dropped = tokens.len() - kept.len();
        if dropped > 0 {
            debug!(dropped, "removed proper-noun tokens from transcript");
        }

        Ok(kept.join(" "))
    }
}

impl Default for ProperNounFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Capitalization-based tagger: a capitalized token mid-sentence is treated
/// as a proper noun; sentence-initial capitals are exempt.
#[derive(Debug, Default)]
pub struct HeuristicTagger;

impl PosTagger for HeuristicTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;

        for word in text.split_whitespace() {
            let capitalized = word.chars().next().is_some_and(|c| c.is_uppercase());
            let tag = if capitalized && !sentence_start {
                PosTag::ProperNoun
            } else {
                PosTag::Other
            };
            tokens.push(TaggedToken {
                text: word.to_string(),
                tag,
            });
            sentence_start = word.ends_with(['.', '!', '?']);
        }

        Ok(tokens)
    }
}
