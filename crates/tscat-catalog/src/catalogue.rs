//! Immutable catalogue of contexts with source-text fallback lookup.
//!
//! # Invariants
//!
//! 1. **Lookup never fails**: [`Catalogue::lookup`] returns either a finished,
//!    non-empty translation for the exact `(context, source)` pair or the
//!    `source` argument unchanged.
//!
//! 2. **Exact matching**: no whitespace, case, or entity normalization is
//!    applied to context names or sources.
//!
//! 3. **First occurrence wins**: when a context repeats a `(source, comment)`
//!    pair, or a context name repeats, lookups resolve to the earliest
//!    message in document order.
//!
//! 4. **Thread safety**: `Catalogue` is `Send + Sync`; nothing mutates after
//!    [`CatalogueBuilder::build`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown context | Name not in catalogue | Returns `source` |
//! | Unknown source | Not extracted for context | Returns `source` |
//! | Unfinished/obsolete | Status not finished | Returns `source` |
//! | Empty finished text | Translator saved blank | Returns `source` |

use std::collections::HashMap;

use tracing::warn;

use crate::message::{Message, TranslationStatus};
use crate::validate::{self, Issue};

/// Format version written when a catalogue does not carry one.
pub const DEFAULT_VERSION: &str = "2.1";

/// A named group of messages belonging to one UI component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Component name, e.g. `"BookmarkEditor"`.
    pub name: String,
    /// Messages in extraction order.
    pub messages: Vec<Message>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// First comment-less message with this source.
    #[must_use]
    pub fn find(&self, source: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.source == source && m.comment_str().is_empty())
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the context has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Message counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogueStats {
    /// Messages with an approved translation.
    pub finished: usize,
    /// Messages awaiting translation.
    pub unfinished: usize,
    /// Obsolete and vanished messages.
    pub retired: usize,
}

impl CatalogueStats {
    /// All messages, retired included.
    #[must_use]
    pub fn total(&self) -> usize {
        self.finished + self.unfinished + self.retired
    }

    /// Finished share of live (non-retired) messages, 0.0–100.0.
    ///
    /// A catalogue with no live messages is complete.
    #[must_use]
    pub fn completion_percent(&self) -> f32 {
        let live = self.finished + self.unfinished;
        if live == 0 {
            100.0
        } else {
            (self.finished as f32 / live as f32) * 100.0
        }
    }
}

/// Position of a message: `(context index, message index)`.
type Slot = (usize, usize);

/// Source text → every slot carrying it, in document order.
type SourceIndex = HashMap<String, Vec<Slot>>;

/// An immutable translation catalogue.
///
/// # Example
///
/// ```
/// use tscat_catalog::{Catalogue, Context, Message};
///
/// let catalogue = Catalogue::builder()
///     .language("hu")
///     .context(
///         Context::new("BrowserConfig")
///             .with_message(Message::unfinished("Ok"))
///             .with_message(Message::finished("Cancel", "Mégse")),
///     )
///     .build();
///
/// assert_eq!(catalogue.lookup("BrowserConfig", "Ok"), "Ok");
/// assert_eq!(catalogue.lookup("BrowserConfig", "Cancel"), "Mégse");
/// assert_eq!(catalogue.lookup("Nowhere", "Cancel"), "Cancel");
/// ```
#[derive(Debug, Clone)]
pub struct Catalogue {
    version: String,
    language: Option<String>,
    source_language: Option<String>,
    contexts: Vec<Context>,
    index: HashMap<String, SourceIndex>,
}

impl PartialEq for Catalogue {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from `contexts`.
        self.version == other.version
            && self.language == other.language
            && self.source_language == other.source_language
            && self.contexts == other.contexts
    }
}

impl Eq for Catalogue {}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Catalogue {
    /// Build a catalogue from contexts with default metadata.
    #[must_use]
    pub fn new(contexts: Vec<Context>) -> Self {
        Self::builder().contexts(contexts).build()
    }

    /// Start building a catalogue.
    #[must_use]
    pub fn builder() -> CatalogueBuilder {
        CatalogueBuilder::default()
    }

    /// Translate `source` within `context`, falling back to `source`.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.translation(context, source).unwrap_or(source)
    }

    /// Like [`lookup`](Self::lookup), for a source disambiguated by `comment`.
    ///
    /// A message carrying exactly `comment` is preferred; otherwise the
    /// comment-less message for the same source is used.
    #[must_use]
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: &str,
    ) -> &'a str {
        self.translation_disambiguated(context, source, comment)
            .unwrap_or(source)
    }

    /// The finished translation for `(context, source)`, if any.
    #[must_use]
    pub fn translation(&self, context: &str, source: &str) -> Option<&str> {
        self.message(context, source, "")
            .and_then(Message::effective_translation)
    }

    /// The finished translation for a disambiguated source, if any.
    #[must_use]
    pub fn translation_disambiguated(
        &self,
        context: &str,
        source: &str,
        comment: &str,
    ) -> Option<&str> {
        self.message(context, source, comment)
            .or_else(|| self.message(context, source, ""))
            .and_then(Message::effective_translation)
    }

    /// The first message matching `(context, source, comment)` exactly.
    #[must_use]
    pub fn message(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .map(|&(c, m)| &self.contexts[c].messages[m])
            .find(|msg| msg.comment_str() == comment)
    }

    /// First context with this name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Contexts in document order.
    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Iterate `(context name, message)` over the whole catalogue.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    /// Total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    /// Whether the catalogue holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Format version of the document this catalogue came from.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Target language tag (e.g. `"hu"`), if recorded.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Source language tag, if recorded.
    #[must_use]
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Count messages by status.
    #[must_use]
    pub fn stats(&self) -> CatalogueStats {
        let mut stats = CatalogueStats::default();
        for (_, msg) in self.messages() {
            match msg.status {
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => stats.retired += 1,
            }
        }
        stats
    }

    /// Report structural problems. An empty result means the catalogue is clean.
    #[must_use]
    pub fn validate(&self) -> Vec<Issue> {
        validate::validate(self)
    }
}

/// Builder for [`Catalogue`]; the lookup index is built once in
/// [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct CatalogueBuilder {
    version: Option<String>,
    language: Option<String>,
    source_language: Option<String>,
    contexts: Vec<Context>,
}

impl CatalogueBuilder {
    /// Set the format version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the target language tag.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the source language tag.
    #[must_use]
    pub fn source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    /// Append a context.
    #[must_use]
    pub fn context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// Append several contexts.
    #[must_use]
    pub fn contexts(mut self, contexts: impl IntoIterator<Item = Context>) -> Self {
        self.contexts.extend(contexts);
        self
    }

    /// Freeze into an indexed catalogue.
    #[must_use]
    pub fn build(self) -> Catalogue {
        let mut index: HashMap<String, SourceIndex> = HashMap::new();
        for (ci, context) in self.contexts.iter().enumerate() {
            let by_source = index.entry(context.name.clone()).or_default();
            for (mi, msg) in context.messages.iter().enumerate() {
                let slots = by_source.entry(msg.source.clone()).or_default();
                let shadowed = slots.iter().any(|&(c, m)| {
                    self.contexts[c].messages[m].comment_str() == msg.comment_str()
                });
                if shadowed {
                    warn!(
                        context = %context.name,
                        source = %msg.source,
                        "duplicate source in context; first occurrence is used"
                    );
                }
                slots.push((ci, mi));
            }
        }

        Catalogue {
            version: self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            language: self.language,
            source_language: self.source_language,
            contexts: self.contexts,
            index,
        }
    }
}
