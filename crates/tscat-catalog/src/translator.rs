//! Multi-locale translator with fallback chain and coverage reporting.
//!
//! # Invariants
//!
//! 1. **Fallback chain terminates**: every lookup tries the requested locale
//!    and then each chain entry at most once, returning the source text if
//!    none provides a finished translation.
//!
//! 2. **Substitution is single-pass**: [`Translator::tr_args`] replaces
//!    `%NAME%` tokens after lookup; substituted values are not rescanned.
//!
//! 3. **Thread safety**: `Translator` is `Send + Sync` (all data is
//!    immutable after construction).
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing translation | No finished entry in any locale | Returns source |
//! | Missing locale | Catalogue not loaded | Falls through chain |
//! | Bad substitution arg | `%NAME%` but no `NAME` arg | Token left as-is |
//! | Empty translator | No catalogues loaded | All lookups return source |

use std::collections::HashMap;

use tracing::trace;

use crate::catalogue::Catalogue;
use crate::placeholder::substitute;

/// Locale identifier (e.g., `"hu"`, `"pt_BR"`).
pub type Locale = String;

/// Host-side lookup facility over per-locale catalogues.
///
/// # Example
///
/// ```
/// use tscat_catalog::{Catalogue, Context, Message, Translator};
///
/// let hu = Catalogue::new(vec![
///     Context::new("MythBrowser")
///         .with_message(Message::finished("Back", "Vissza"))
///         .with_message(Message::unfinished("Enter URL")),
/// ]);
///
/// let mut translator = Translator::new();
/// translator.add_catalogue("hu", hu);
///
/// assert_eq!(translator.tr("hu", "MythBrowser", "Back"), "Vissza");
/// assert_eq!(translator.tr("hu", "MythBrowser", "Enter URL"), "Enter URL");
/// assert_eq!(translator.tr("de", "MythBrowser", "Back"), "Back");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalogues: HashMap<Locale, Catalogue>,
    fallback_chain: Vec<Locale>,
}

impl Translator {
    /// Create a translator with no catalogues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the catalogue for a locale, replacing any previous one.
    pub fn add_catalogue(&mut self, locale: impl Into<String>, catalogue: Catalogue) {
        self.catalogues.insert(locale.into(), catalogue);
    }

    /// Set the fallback chain (tried in order when a locale has no
    /// finished translation).
    ///
    /// Example: `["pt_BR", "pt"]`: try Brazilian Portuguese, then generic
    /// Portuguese, then the source text.
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// The fallback chain.
    #[must_use]
    pub fn fallback_chain(&self) -> &[Locale] {
        &self.fallback_chain
    }

    /// The catalogue registered for `locale`.
    #[must_use]
    pub fn catalogue(&self, locale: &str) -> Option<&Catalogue> {
        self.catalogues.get(locale)
    }

    /// All registered locale tags, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.catalogues.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// The first finished translation along `locale` and the fallback chain.
    #[must_use]
    pub fn translation(&self, locale: &str, context: &str, source: &str) -> Option<&str> {
        self.resolve(locale, |c| c.translation(context, source))
    }

    /// Like [`translation`](Self::translation), for a source disambiguated
    /// by `comment`. An empty comment behaves like `translation`.
    #[must_use]
    pub fn translation_disambiguated(
        &self,
        locale: &str,
        context: &str,
        source: &str,
        comment: &str,
    ) -> Option<&str> {
        self.resolve(locale, |c| {
            c.translation_disambiguated(context, source, comment)
        })
    }

    fn resolve<'a>(
        &'a self,
        locale: &str,
        find: impl Fn(&'a Catalogue) -> Option<&'a str>,
    ) -> Option<&'a str> {
        if let Some(text) = self.catalogues.get(locale).and_then(&find) {
            return Some(text);
        }

        for fallback in &self.fallback_chain {
            if fallback == locale {
                continue; // Already tried
            }
            if let Some(text) = self.catalogues.get(fallback.as_str()).and_then(&find) {
                trace!(%locale, %fallback, "resolved via fallback");
                return Some(text);
            }
        }

        None
    }

    /// Translate `source` for `locale`, falling back to `source` itself.
    #[must_use]
    pub fn tr<'a>(&'a self, locale: &str, context: &str, source: &'a str) -> &'a str {
        self.translation(locale, context, source).unwrap_or_else(|| {
            trace!(%locale, context, source, "no finished translation; using source");
            source
        })
    }

    /// Translate, then substitute `%NAME%` placeholders.
    ///
    /// `args` pairs are `(NAME, value)` without the `%` delimiters.
    #[must_use]
    pub fn tr_args(
        &self,
        locale: &str,
        context: &str,
        source: &str,
        args: &[(&str, &str)],
    ) -> String {
        substitute(self.tr(locale, context, source), args)
    }

    // -----------------------------------------------------------------
    // Coverage
    // -----------------------------------------------------------------

    /// Every live `(context, source, comment)` key across all catalogues,
    /// sorted and deduplicated. Retired messages are excluded.
    #[must_use]
    pub fn all_keys(&self) -> Vec<MessageRef> {
        let mut keys: Vec<MessageRef> = self
            .catalogues
            .values()
            .flat_map(|catalogue| catalogue.messages())
            .filter(|(_, msg)| !msg.status.is_retired())
            .map(|(context, msg)| {
                MessageRef::new(context, msg.source.as_str()).with_comment(msg.comment_str())
            })
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    /// Keys from `reference` with no finished translation for `locale`
    /// (including fallback chain resolution), sorted.
    #[must_use]
    pub fn untranslated(&self, locale: &str, reference: &[MessageRef]) -> Vec<MessageRef> {
        let mut missing: Vec<MessageRef> = reference
            .iter()
            .filter(|key| {
                self.translation_disambiguated(locale, &key.context, &key.source, &key.comment)
                    .is_none()
            })
            .cloned()
            .collect();
        missing.sort_unstable();
        missing
    }

    /// Coverage of every registered locale against [`all_keys`](Self::all_keys).
    #[must_use]
    pub fn coverage_report(&self) -> CoverageReport {
        let all = self.all_keys();
        let total = all.len();

        let locales = self
            .locales()
            .into_iter()
            .map(|tag| {
                let untranslated = self.untranslated(tag, &all);
                let translated = total.saturating_sub(untranslated.len());
                let coverage_percent = if total == 0 {
                    100.0
                } else {
                    (translated as f32 / total as f32) * 100.0
                };
                LocaleCoverage {
                    locale: tag.to_string(),
                    translated,
                    untranslated,
                    coverage_percent,
                }
            })
            .collect();

        CoverageReport {
            total_keys: total,
            locales,
        }
    }
}

/// A `(context, source, comment)` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageRef {
    /// Context name.
    pub context: String,
    /// Source text.
    pub source: String,
    /// Disambiguating comment; empty when the message has none.
    pub comment: String,
}

impl MessageRef {
    /// Create a key with no comment.
    #[must_use]
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            comment: String::new(),
        }
    }

    /// Set the disambiguating comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Translation coverage across all locales of a translator.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Number of unique live keys across all catalogues.
    pub total_keys: usize,
    /// Per-locale coverage, sorted by locale tag.
    pub locales: Vec<LocaleCoverage>,
}

/// Per-locale coverage statistics.
#[derive(Debug, Clone)]
pub struct LocaleCoverage {
    /// Locale tag (e.g., `"hu"`).
    pub locale: String,
    /// Keys with a finished translation (including via fallback).
    pub translated: usize,
    /// Keys still shown in the source language.
    pub untranslated: Vec<MessageRef>,
    /// Coverage as a percentage (0.0–100.0).
    pub coverage_percent: f32,
}
