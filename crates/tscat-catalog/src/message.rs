//! Messages: one translatable string and its (possibly absent) translation.

use std::fmt;

/// Review state of a message's translation.
///
/// Mirrors the `type` attribute of a TS `<translation>` element: no
/// attribute means finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationStatus {
    /// An approved translation exists.
    Finished,
    /// No approved translation yet; lookups fall back to the source text.
    #[default]
    Unfinished,
    /// The string was removed from the host application source.
    Obsolete,
    /// The string vanished from the host source during the last extraction.
    Vanished,
}

impl TranslationStatus {
    /// Parse the value of a `type` attribute.
    ///
    /// `None` (no attribute) is [`Finished`](Self::Finished). Returns `None`
    /// for values the format does not define.
    #[must_use]
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some("vanished") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// The `type` attribute value to write, if any.
    #[must_use]
    pub const fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Whether lookups may use the translation.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Whether the string is no longer present in the host source.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Obsolete | Self::Vanished)
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_attr().unwrap_or("finished"))
    }
}

/// Advisory provenance: where the extraction tool found the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Source file path, relative to the catalogue.
    pub filename: String,
    /// 1-based line number, if recorded.
    pub line: Option<u32>,
}

impl Location {
    /// Create a location with a line number.
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line: Some(line),
        }
    }
}

/// One translatable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Untranslated phrase, exactly as the host passes it to lookup.
    pub source: String,
    /// Disambiguation comment; distinguishes equal sources in one context.
    pub comment: Option<String>,
    /// Localized phrase. Empty while unfinished.
    pub translation: String,
    /// Review state of `translation`.
    pub status: TranslationStatus,
    /// Where the string was extracted from.
    pub locations: Vec<Location>,
}

impl Message {
    /// A message with no translation yet.
    #[must_use]
    pub fn unfinished(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            comment: None,
            translation: String::new(),
            status: TranslationStatus::Unfinished,
            locations: Vec::new(),
        }
    }

    /// A message with an approved translation.
    #[must_use]
    pub fn finished(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            comment: None,
            translation: translation.into(),
            status: TranslationStatus::Finished,
            locations: Vec::new(),
        }
    }

    /// Set the disambiguation comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Append a provenance record.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Override the status, keeping the translation text.
    #[must_use]
    pub fn with_status(mut self, status: TranslationStatus) -> Self {
        self.status = status;
        self
    }

    /// The translation a host may display: finished and non-empty.
    #[must_use]
    pub fn effective_translation(&self) -> Option<&str> {
        (self.status.is_finished() && !self.translation.is_empty())
            .then_some(self.translation.as_str())
    }

    /// The comment, with `None` and `""` treated alike.
    #[must_use]
    pub fn comment_str(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_from_type_attr() {
        assert_eq!(
            TranslationStatus::from_type_attr(None),
            Some(TranslationStatus::Finished)
        );
        assert_eq!(
            TranslationStatus::from_type_attr(Some("unfinished")),
            Some(TranslationStatus::Unfinished)
        );
        assert_eq!(
            TranslationStatus::from_type_attr(Some("vanished")),
            Some(TranslationStatus::Vanished)
        );
        assert_eq!(TranslationStatus::from_type_attr(Some("done")), None);
    }

    #[test]
    fn status_type_attr_inverts_parse() {
        for status in [
            TranslationStatus::Finished,
            TranslationStatus::Unfinished,
            TranslationStatus::Obsolete,
            TranslationStatus::Vanished,
        ] {
            assert_eq!(
                TranslationStatus::from_type_attr(status.type_attr()),
                Some(status)
            );
        }
    }

    #[test]
    fn retired_statuses() {
        assert!(TranslationStatus::Obsolete.is_retired());
        assert!(TranslationStatus::Vanished.is_retired());
        assert!(!TranslationStatus::Unfinished.is_retired());
        assert!(!TranslationStatus::Finished.is_retired());
    }

    #[test]
    fn unfinished_has_no_effective_translation() {
        let msg = Message::unfinished("Ok");
        assert_eq!(msg.effective_translation(), None);
    }

    #[test]
    fn unfinished_with_text_is_still_unusable() {
        let mut msg = Message::unfinished("Ok");
        msg.translation = "Rendben".into();
        assert_eq!(msg.effective_translation(), None);
    }

    #[test]
    fn finished_empty_translation_is_unusable() {
        let msg = Message::finished("Ok", "");
        assert_eq!(msg.effective_translation(), None);
    }

    #[test]
    fn finished_translation_is_used() {
        let msg = Message::finished("Cancel", "Mégse");
        assert_eq!(msg.effective_translation(), Some("Mégse"));
    }

    #[test]
    fn builders_compose() {
        let msg = Message::unfinished("Back")
            .with_comment("navigation")
            .with_location(Location::new("../mythbrowser/mythbrowser.cpp", 352));
        assert_eq!(msg.comment_str(), "navigation");
        assert_eq!(msg.locations.len(), 1);
        assert_eq!(msg.locations[0].line, Some(352));
    }

    #[test]
    fn status_display() {
        assert_eq!(TranslationStatus::Finished.to_string(), "finished");
        assert_eq!(TranslationStatus::Obsolete.to_string(), "obsolete");
    }
}
