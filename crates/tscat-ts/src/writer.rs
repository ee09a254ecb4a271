//! TS document writer.
//!
//! Output follows the layout `lupdate` produces: four-space indentation,
//! one `<context>` per component, `<location>` elements before
//! `<source>`, and `type="unfinished"` on incomplete translations. Text
//! is entity-escaped (`'` becomes `&apos;`); relative line numbers are
//! never written.

use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use tscat_catalog::{Catalogue, Context, Message};

use crate::error::TsError;

/// Serialize a catalogue as a TS document.
pub fn to_string(catalogue: &Catalogue) -> Result<String, TsError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(&mut writer, Event::DocType(BytesText::from_escaped("TS")))?;

    let mut root = BytesStart::new("TS");
    root.push_attribute(("version", catalogue.version()));
    if let Some(language) = catalogue.language() {
        root.push_attribute(("language", language));
    }
    if let Some(language) = catalogue.source_language() {
        root.push_attribute(("sourcelanguage", language));
    }
    emit(&mut writer, Event::Start(root))?;
    for context in catalogue.contexts() {
        write_context(&mut writer, context)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("TS")))?;

    let mut text =
        String::from_utf8(writer.into_inner()).map_err(|e| TsError::Write(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

/// Serialize a catalogue into a TS file, replacing it.
pub fn write_file(path: impl AsRef<Path>, catalogue: &Catalogue) -> Result<(), TsError> {
    let path = path.as_ref();
    let text = to_string(catalogue)?;
    std::fs::write(path, &text).map_err(|e| TsError::io(path, e))?;
    debug!(
        path = %path.display(),
        messages = catalogue.len(),
        "wrote TS file"
    );
    Ok(())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TsError> {
    writer
        .write_event(event)
        .map_err(|e| TsError::Write(e.to_string()))
}

/// `<tag>text</tag>` on one line. An empty text event keeps the closing
/// tag from being indented onto its own line.
fn text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), TsError> {
    let end = start.to_end().into_owned();
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(end))
}

fn write_context(writer: &mut Writer<Vec<u8>>, context: &Context) -> Result<(), TsError> {
    emit(writer, Event::Start(BytesStart::new("context")))?;
    text_element(writer, BytesStart::new("name"), &context.name)?;
    for message in &context.messages {
        write_message(writer, message)?;
    }
    emit(writer, Event::End(BytesEnd::new("context")))
}

fn write_message(writer: &mut Writer<Vec<u8>>, message: &Message) -> Result<(), TsError> {
    emit(writer, Event::Start(BytesStart::new("message")))?;

    for location in &message.locations {
        let mut element = BytesStart::new("location");
        element.push_attribute(("filename", location.filename.as_str()));
        if let Some(line) = location.line {
            element.push_attribute(("line", line.to_string().as_str()));
        }
        emit(writer, Event::Empty(element))?;
    }

    text_element(writer, BytesStart::new("source"), &message.source)?;
    if let Some(comment) = &message.comment {
        text_element(writer, BytesStart::new("comment"), comment)?;
    }

    let mut translation = BytesStart::new("translation");
    if let Some(kind) = message.status.type_attr() {
        translation.push_attribute(("type", kind));
    }
    text_element(writer, translation, &message.translation)?;

    emit(writer, Event::End(BytesEnd::new("message")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_str;
    use tscat_catalog::{Location, TranslationStatus};

    fn sample() -> Catalogue {
        Catalogue::builder()
            .version("1.1")
            .language("hu")
            .context(
                Context::new("BookmarkManager").with_message(
                    Message::unfinished(
                        "No bookmarks defined.\n\nUse the 'Add Bookmark' menu option to add new bookmarks",
                    )
                    .with_location(Location::new("../mythbrowser/bookmarkmanager.cpp", 159)),
                ),
            )
            .context(
                Context::new("MythBrowser")
                    .with_message(Message::finished("Back", "Vissza").with_comment("navigation"))
                    .with_message(
                        Message::finished("Zoom & <Pan>", "Régi")
                            .with_status(TranslationStatus::Obsolete),
                    ),
            )
            .build()
    }

    #[test]
    fn writes_lupdate_layout() {
        let cat = Catalogue::builder()
            .version("1.1")
            .context(
                Context::new("WebPage").with_message(
                    Message::unfinished("Loading...")
                        .with_location(Location::new("../mythbrowser/webpage.cpp", 129)),
                ),
            )
            .build();
        let text = to_string(&cat).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>
<!DOCTYPE TS>
<TS version=\"1.1\">
    <context>
        <name>WebPage</name>
        <message>
            <location filename=\"../mythbrowser/webpage.cpp\" line=\"129\"/>
            <source>Loading...</source>
            <translation type=\"unfinished\"></translation>
        </message>
    </context>
</TS>
";
        assert_eq!(text, expected);
    }

    #[test]
    fn escapes_markup_and_apostrophes() {
        let text = to_string(&sample()).unwrap();
        assert!(text.contains("Use the &apos;Add Bookmark&apos; menu option"));
        assert!(text.contains("<source>Zoom &amp; &lt;Pan&gt;</source>"));
        assert!(text.contains("<translation type=\"obsolete\">Régi</translation>"));
        assert!(text.contains("<comment>navigation</comment>"));
        assert!(text.contains("<translation>Vissza</translation>"));
    }

    #[test]
    fn keeps_newlines_in_source() {
        let text = to_string(&sample()).unwrap();
        assert!(text.contains("<source>No bookmarks defined.\n\nUse the"));
    }

    #[test]
    fn root_attributes() {
        let cat = Catalogue::builder()
            .language("hu_HU")
            .source_language("en")
            .build();
        let text = to_string(&cat).unwrap();
        assert!(text.contains("<TS version=\"2.1\" language=\"hu_HU\" sourcelanguage=\"en\">"));
    }

    #[test]
    fn round_trip_is_structural_identity() {
        let cat = sample();
        let reparsed = parse_str(&to_string(&cat).unwrap()).unwrap();
        assert_eq!(reparsed, cat);
    }

    #[test]
    fn write_file_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mythbrowser_hu.ts");
        write_file(&path, &sample()).unwrap();
        let back = crate::reader::read_file(&path).unwrap();
        assert_eq!(back, sample());
    }
}
