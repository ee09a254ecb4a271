//! Structural checks over a catalogue.
//!
//! None of these are fatal: lookups stay well-defined for every catalogue.
//! They flag what a translator or maintainer should fix.

use std::collections::HashSet;
use std::fmt;

use crate::catalogue::Catalogue;
use crate::placeholder::missing_placeholders;

/// A problem found by [`Catalogue::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// A message has an empty source string.
    EmptySource {
        /// Context holding the message.
        context: String,
        /// Position of the message within the context.
        index: usize,
    },
    /// A `(source, comment)` pair appears more than once in one context.
    DuplicateSource {
        /// Context holding the duplicates.
        context: String,
        /// The repeated source.
        source: String,
    },
    /// Two contexts share a name.
    DuplicateContext {
        /// The repeated name.
        name: String,
    },
    /// A finished message whose translation is empty.
    EmptyFinishedTranslation {
        /// Context holding the message.
        context: String,
        /// The message source.
        source: String,
    },
    /// A finished translation drops placeholder tokens of its source.
    MissingPlaceholders {
        /// Context holding the message.
        context: String,
        /// The message source.
        source: String,
        /// Tokens absent from the translation, e.g. `"%URL%"`.
        missing: Vec<String>,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource { context, index } => {
                write!(f, "{context}: message #{index} has an empty source")
            }
            Self::DuplicateSource { context, source } => {
                write!(f, "{context}: duplicate source {source:?}")
            }
            Self::DuplicateContext { name } => write!(f, "duplicate context '{name}'"),
            Self::EmptyFinishedTranslation { context, source } => {
                write!(f, "{context}: {source:?} is finished but empty")
            }
            Self::MissingPlaceholders {
                context,
                source,
                missing,
            } => write!(
                f,
                "{context}: translation of {source:?} is missing {}",
                missing.join(", ")
            ),
        }
    }
}

pub(crate) fn validate(catalogue: &Catalogue) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut context_names = HashSet::new();

    for context in catalogue.contexts() {
        if !context_names.insert(context.name.as_str()) {
            issues.push(Issue::DuplicateContext {
                name: context.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for (index, msg) in context.messages.iter().enumerate() {
            if msg.source.is_empty() {
                issues.push(Issue::EmptySource {
                    context: context.name.clone(),
                    index,
                });
            }

            if !seen.insert((msg.source.as_str(), msg.comment_str())) {
                issues.push(Issue::DuplicateSource {
                    context: context.name.clone(),
                    source: msg.source.clone(),
                });
            }

            if !msg.status.is_finished() {
                continue;
            }
            if msg.translation.is_empty() {
                issues.push(Issue::EmptyFinishedTranslation {
                    context: context.name.clone(),
                    source: msg.source.clone(),
                });
                continue;
            }
            let missing = missing_placeholders(&msg.source, &msg.translation);
            if !missing.is_empty() {
                issues.push(Issue::MissingPlaceholders {
                    context: context.name.clone(),
                    source: msg.source.clone(),
                    missing: missing.into_iter().map(String::from).collect(),
                });
            }
        }
    }

    issues
}
