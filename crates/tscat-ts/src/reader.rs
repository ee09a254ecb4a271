//! TS document reader.
//!
//! Builds a [`Catalogue`] from the event stream of a TS document. Text
//! inside `<name>`, `<source>`, `<comment>` and `<translation>` is kept
//! exactly, with entities resolved, newlines preserved, and `<byte
//! value="xN"/>` escapes decoded. Elements the catalogue does not model
//! (`<translatorcomment>`, `<extracomment>`, `<userdata>`, ...) are
//! skipped, as are plural (`numerus="yes"`) messages.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use tscat_catalog::{Catalogue, CatalogueBuilder, Context, Location, Message, TranslationStatus};

use crate::error::TsError;

/// Where in the document the reader currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    Ts,
    Context,
    Message,
    Done,
}

/// Leaf elements whose text is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Source,
    Comment,
    Translation,
}

impl Field {
    fn from_tag(tag: &[u8], scope: Scope) -> Option<Self> {
        match (scope, tag) {
            (Scope::Context, b"name") => Some(Self::Name),
            (Scope::Message, b"source") => Some(Self::Source),
            (Scope::Message, b"comment") => Some(Self::Comment),
            (Scope::Message, b"translation") => Some(Self::Translation),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct MessageDraft {
    source: Option<String>,
    comment: Option<String>,
    translation: String,
    status: Option<TranslationStatus>,
    locations: Vec<Location>,
}

#[derive(Debug, Default)]
struct ContextDraft {
    name: Option<String>,
    messages: Vec<Message>,
}

struct TsParser {
    scope: Scope,
    builder: CatalogueBuilder,
    context: ContextDraft,
    message: MessageDraft,
    capture: Option<(Field, String)>,
    /// Filename carried over to `<location>` elements that omit it.
    last_file: Option<String>,
    /// Last absolute line per file, for `+N`/`-N` relative lines.
    last_line: HashMap<String, i64>,
}

/// Parse a TS document.
///
/// ```
/// let catalogue = tscat_ts::parse_str(r#"<?xml version="1.0" encoding="utf-8"?>
/// <!DOCTYPE TS><TS version="2.1" language="hu">
/// <context>
///     <name>WebPage</name>
///     <message>
///         <location filename="../mythbrowser/webpage.cpp" line="129"/>
///         <source>Loading...</source>
///         <translation type="unfinished"></translation>
///     </message>
/// </context>
/// </TS>"#).unwrap();
///
/// assert_eq!(catalogue.language(), Some("hu"));
/// assert_eq!(catalogue.lookup("WebPage", "Loading..."), "Loading...");
/// ```
pub fn parse_str(text: &str) -> Result<Catalogue, TsError> {
    let mut reader = Reader::from_str(text);
    let mut parser = TsParser::new();

    loop {
        let position = offset(&reader);
        let event = reader
            .read_event()
            .map_err(|e| TsError::xml(position, e))?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if !parser.open(&e, position)? {
                    debug!(
                        element = %String::from_utf8_lossy(e.name().as_ref()),
                        position,
                        "skipping element"
                    );
                    reader
                        .read_to_end(e.name())
                        .map_err(|err| TsError::xml(position, err))?;
                }
            }
            Event::Empty(e) => {
                if parser.open(&e, position)? {
                    parser.close(e.name().as_ref(), offset(&reader))?;
                }
            }
            Event::End(e) => parser.close(e.name().as_ref(), offset(&reader))?,
            Event::Text(e) => {
                if let Some((_, buf)) = parser.capture.as_mut() {
                    let text = e.unescape().map_err(|err| TsError::xml(position, err))?;
                    buf.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some((_, buf)) = parser.capture.as_mut() {
                    let text = e.decode().map_err(|err| TsError::xml(position, err))?;
                    buf.push_str(&text);
                }
            }
            _ => {}
        }
    }

    match parser.scope {
        Scope::Done => {}
        Scope::Document => return Err(TsError::MissingRoot),
        _ => return Err(TsError::UnexpectedEof),
    }
    let catalogue = parser.builder.build();
    debug!(
        contexts = catalogue.contexts().len(),
        messages = catalogue.len(),
        language = catalogue.language().unwrap_or(""),
        "parsed TS catalogue"
    );
    Ok(catalogue)
}

/// Read and parse a TS file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Catalogue, TsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| TsError::io(path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "reading TS file");
    parse_str(&text)
}

fn offset(reader: &Reader<&[u8]>) -> u64 {
    reader.buffer_position() as u64
}

fn attr_value(e: &BytesStart<'_>, key: &[u8], position: u64) -> Result<Option<String>, TsError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| TsError::xml(position, err))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| TsError::xml(position, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// The character named by `<byte value="..."/>`: `xN` is hex, anything
/// else decimal.
fn byte_char(e: &BytesStart<'_>, position: u64) -> Result<char, TsError> {
    let value = attr_value(e, b"value", position)?.unwrap_or_default();
    let code = match value.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    };
    code.and_then(char::from_u32)
        .ok_or(TsError::InvalidByte { value, position })
}

impl TsParser {
    fn new() -> Self {
        Self {
            scope: Scope::Document,
            builder: Catalogue::builder(),
            context: ContextDraft::default(),
            message: MessageDraft::default(),
            capture: None,
            last_file: None,
            last_line: HashMap::new(),
        }
    }

    /// Handle an opening tag. Returns `false` when the element (and its
    /// subtree) should be skipped.
    fn open(&mut self, e: &BytesStart<'_>, position: u64) -> Result<bool, TsError> {
        let tag = e.name();
        let tag = tag.as_ref();

        if let Some((_, buf)) = self.capture.as_mut() {
            // Markup nested in a text field. Only <byte/> carries text.
            if tag == b"byte" {
                buf.push(byte_char(e, position)?);
            }
            return Ok(false);
        }

        if let Some(field) = Field::from_tag(tag, self.scope) {
            if field == Field::Translation {
                let value = attr_value(e, b"type", position)?;
                let status = TranslationStatus::from_type_attr(value.as_deref()).ok_or_else(
                    || TsError::UnknownStatus {
                        value: value.clone().unwrap_or_default(),
                        position,
                    },
                )?;
                self.message.status = Some(status);
            }
            self.capture = Some((field, String::new()));
            return Ok(true);
        }

        match (self.scope, tag) {
            (Scope::Document, b"TS") => {
                let mut builder = std::mem::take(&mut self.builder);
                if let Some(version) = attr_value(e, b"version", position)? {
                    builder = builder.version(version);
                }
                if let Some(language) = attr_value(e, b"language", position)? {
                    builder = builder.language(language);
                }
                if let Some(language) = attr_value(e, b"sourcelanguage", position)? {
                    builder = builder.source_language(language);
                }
                self.builder = builder;
                self.scope = Scope::Ts;
                Ok(true)
            }
            (Scope::Ts, b"context") => {
                self.context = ContextDraft::default();
                self.scope = Scope::Context;
                Ok(true)
            }
            (Scope::Context, b"message") => {
                if attr_value(e, b"numerus", position)?.as_deref() == Some("yes") {
                    warn!(
                        context = self.context.name.as_deref().unwrap_or(""),
                        position,
                        "skipping plural message"
                    );
                    return Ok(false);
                }
                self.message = MessageDraft::default();
                self.scope = Scope::Message;
                Ok(true)
            }
            (Scope::Message, b"location") => {
                let location = self.location(e, position)?;
                self.message.locations.push(location);
                Ok(true)
            }
            (Scope::Document | Scope::Done, _) | (_, b"TS" | b"context" | b"message") => {
                Err(TsError::UnexpectedElement {
                    element: String::from_utf8_lossy(tag).into_owned(),
                    position,
                })
            }
            _ => Ok(false),
        }
    }

    /// Handle a closing tag (or the end of an empty element).
    fn close(&mut self, tag: &[u8], position: u64) -> Result<(), TsError> {
        if let Some((field, text)) = self.capture.take() {
            match field {
                Field::Name => self.context.name = Some(text),
                Field::Source => self.message.source = Some(text),
                Field::Comment => self.message.comment = Some(text),
                Field::Translation => self.message.translation = text,
            }
            return Ok(());
        }

        match (self.scope, tag) {
            (Scope::Message, b"message") => {
                let draft = std::mem::take(&mut self.message);
                let source = draft.source.ok_or(TsError::MissingElement {
                    element: "source",
                    parent: "message",
                    position,
                })?;
                if source.is_empty() {
                    return Err(TsError::EmptySource {
                        context: self.context.name.clone().unwrap_or_default(),
                        position,
                    });
                }
                self.context.messages.push(Message {
                    source,
                    comment: draft.comment,
                    translation: draft.translation,
                    status: draft.status.unwrap_or_default(),
                    locations: draft.locations,
                });
                self.scope = Scope::Context;
            }
            (Scope::Context, b"context") => {
                let draft = std::mem::take(&mut self.context);
                let name = draft.name.ok_or(TsError::MissingElement {
                    element: "name",
                    parent: "context",
                    position,
                })?;
                let mut context = Context::new(name);
                context.messages = draft.messages;
                self.builder = std::mem::take(&mut self.builder).context(context);
                self.scope = Scope::Ts;
            }
            (Scope::Ts, b"TS") => self.scope = Scope::Done,
            // Empty <location/> and similar leaves.
            _ => {}
        }
        Ok(())
    }

    fn location(&mut self, e: &BytesStart<'_>, position: u64) -> Result<Location, TsError> {
        let filename = match attr_value(e, b"filename", position)? {
            Some(name) => name,
            None => self.last_file.clone().unwrap_or_default(),
        };
        self.last_file = Some(filename.clone());

        let line = match attr_value(e, b"line", position)? {
            None => None,
            Some(raw) => {
                let invalid = || TsError::InvalidLine {
                    value: raw.clone(),
                    position,
                };
                let absolute = if raw.starts_with(['+', '-']) {
                    let delta: i64 = raw.parse().map_err(|_| invalid())?;
                    self.last_line
                        .get(&filename)
                        .copied()
                        .unwrap_or(0)
                        .checked_add(delta)
                        .ok_or_else(invalid)?
                } else {
                    raw.parse().map_err(|_| invalid())?
                };
                self.last_line.insert(filename.clone(), absolute);
                Some(u32::try_from(absolute).map_err(|_| invalid())?)
            }
        };

        Ok(Location { filename, line })
    }
}
