#![forbid(unsafe_code)]

//! Translation catalogues for Qt Linguist style UI string tables.
//!
//! A [`Catalogue`] groups [`Message`]s into named [`Context`]s (one per UI
//! component) and answers `lookup(context, source)` with the finished
//! translation, or the source text itself when none exists. A
//! [`Translator`] holds catalogues for several locales and resolves
//! strings through a fallback chain.

pub mod catalogue;
pub mod message;
pub mod placeholder;
pub mod translator;
pub mod validate;

pub use catalogue::{Catalogue, CatalogueBuilder, CatalogueStats, Context, DEFAULT_VERSION};
pub use message::{Location, Message, TranslationStatus};
pub use placeholder::{missing_placeholders, placeholders, substitute};
pub use translator::{CoverageReport, Locale, LocaleCoverage, MessageRef, Translator};
pub use validate::Issue;
