//! ARXML reader and writer.
//!
//! Reading strips namespace prefixes from tag names (`ar:SHORT-NAME` and
//! `SHORT-NAME` are the same element) and keeps attributes verbatim.
//! Writing produces:
//!
//! - `<?xml version="1.0" encoding="UTF-8"?>`
//! - the document comment, if any, before the root element
//! - two-space indentation, text-only elements on one line
//! - a trailing newline

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::model::{Document, NodeId};
use crate::error::{Error, Result};

/// ARXML document handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arxml;

impl Arxml {
    pub fn name(&self) -> &'static str {
        "ARXML"
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        &["arxml", "xml"]
    }

    pub fn read(&self, input: &[u8]) -> Result<Document> {
        reader::ArxmlReader::new().read(input)
    }

    pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
        writer::ArxmlWriter.write(document)
    }

    /// Check that the input is well-formed XML with at least one element.
    pub fn validate(&self, input: &[u8]) -> Result<()> {
        let document = self.read(input)?;
        if document.roots().next().is_none() {
            return Err(Error::xml("Document has no root element"));
        }
        Ok(())
    }
}

mod reader {
    use super::*;

    pub struct ArxmlReader {
        document: Document,
        stack: Vec<NodeId>,
    }

    impl ArxmlReader {
        pub fn new() -> Self {
            Self {
                document: Document::new(),
                stack: Vec::new(),
            }
        }

        pub fn read(mut self, input: &[u8]) -> Result<Document> {
            let mut reader = Reader::from_reader(input);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(Event::Start(ref e)) => {
                        let id = self.open(e)?;
                        self.stack.push(id);
                    }
                    Ok(Event::Empty(ref e)) => {
                        self.open(e)?;
                    }
                    Ok(Event::End(_)) => {
                        self.stack.pop();
                    }
                    Ok(Event::Text(ref t)) => {
                        let text = t
                            .unescape()
                            .map_err(|e| Error::xml(format!("Text error: {e}")))?;
                        self.append_text(&text);
                    }
                    Ok(Event::CData(ref t)) => {
                        let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                        self.append_text(&text);
                    }
                    Ok(Event::Comment(ref t)) => {
                        if self.stack.is_empty() && self.document.roots().next().is_none() {
                            let text = String::from_utf8_lossy(t.as_ref()).trim().to_string();
                            self.document.comment = Some(text);
                        }
                    }
                    Ok(Event::Eof) => break,
                    Err(e) => {
                        return Err(Error::xml(format!(
                            "XML parse error at position {}: {e}",
                            reader.error_position()
                        )));
                    }
                    _ => {}
                }
                buf.clear();
            }

            tracing::debug!(nodes = self.document.len(), "read document");
            Ok(self.document)
        }

        fn open(&mut self, e: &BytesStart<'_>) -> Result<NodeId> {
            let local = e.local_name();
            let tag = std::str::from_utf8(local.as_ref())
                .map_err(|e| Error::xml(format!("Invalid tag name: {e}")))?;

            let id = match self.stack.last() {
                Some(&parent) => self.document.append_child(parent, tag),
                None => self.document.add_root(tag),
            };

            for attr_result in e.attributes() {
                let attr = attr_result.map_err(|e| Error::xml(format!("Attribute error: {e}")))?;
                let key = std::str::from_utf8(attr.key.as_ref())
                    .map_err(|e| Error::xml(format!("Attribute key error: {e}")))?;
                let value = attr
                    .unescape_value()
                    .map_err(|e| Error::xml(format!("Attribute value error: {e}")))?;
                self.document.set_attribute(id, key, value.into_owned());
            }
            Ok(id)
        }

        fn append_text(&mut self, text: &str) {
            let Some(&current) = self.stack.last() else {
                return;
            };
            let existing = self
                .document
                .get(current)
                .and_then(|node| node.text.clone())
                .unwrap_or_default();
            self.document.set_text(current, existing + text);
        }
    }
}

mod writer {
    use super::*;

    pub struct ArxmlWriter;

    impl ArxmlWriter {
        pub fn write(&self, document: &Document) -> Result<Vec<u8>> {
            let mut buffer = Cursor::new(Vec::new());
            let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);

            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(|e| Error::xml(format!("Write error: {e}")))?;

            if let Some(comment) = document.comment.as_deref().filter(|c| !c.is_empty()) {
                // `--` is not allowed inside a comment.
                let text = format!(" {} ", comment.replace("--", "- -"));
                writer
                    .write_event(Event::Comment(BytesText::from_escaped(text)))
                    .map_err(|e| Error::xml(format!("Write error: {e}")))?;
            }

            let mut roots = document.roots().peekable();
            if roots.peek().is_none() {
                return Err(Error::xml("Document has no root element"));
            }
            for root in roots {
                Self::write_node(&mut writer, document, root.id)?;
            }

            let mut output = buffer.into_inner();
            output.push(b'\n');
            Ok(output)
        }

        fn write_node<W: std::io::Write>(
            writer: &mut Writer<W>,
            document: &Document,
            id: NodeId,
        ) -> Result<()> {
            let Some(node) = document.get(id) else {
                return Ok(());
            };

            let mut start = BytesStart::new(node.tag.as_str());
            for (key, value) in &node.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }

            if node.text.is_none() && node.children.is_empty() {
                return writer
                    .write_event(Event::Empty(start))
                    .map(|_| ())
                    .map_err(|e| Error::xml(format!("Write error: {e}")));
            }

            writer
                .write_event(Event::Start(start))
                .map_err(|e| Error::xml(format!("Write error: {e}")))?;

            if let Some(text) = &node.text {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(|e| Error::xml(format!("Write error: {e}")))?;
            }
            for child in &node.children {
                Self::write_node(writer, document, *child)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
                .map_err(|e| Error::xml(format!("Write error: {e}")))?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SHORT_NAME;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported by hand -->
<ar:AUTOSAR xmlns:ar="http://autosar.org/schema/r4.0">
  <ar:AR-PACKAGES>
    <ar:AR-PACKAGE UUID="p1">
      <ar:SHORT-NAME>Interfaces</ar:SHORT-NAME>
      <ar:ELEMENTS>
        <ar:SENDER-RECEIVER-INTERFACE UUID="i1">
          <ar:SHORT-NAME>Speed &amp; Rpm</ar:SHORT-NAME>
        </ar:SENDER-RECEIVER-INTERFACE>
      </ar:ELEMENTS>
    </ar:AR-PACKAGE>
  </ar:AR-PACKAGES>
</ar:AUTOSAR>
"#;

    #[test]
    fn test_read_strips_prefixes() {
        let doc = Arxml.read(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.comment.as_deref(), Some("exported by hand"));

        let root = doc.roots().next().unwrap();
        assert_eq!(root.tag, "AUTOSAR");
        assert_eq!(root.attribute("xmlns:ar"), Some("http://autosar.org/schema/r4.0"));

        let iface = doc.elements("SENDER-RECEIVER-INTERFACE")[0];
        assert_eq!(iface.attribute("UUID"), Some("i1"));
        assert_eq!(doc.short_name(iface.id), Some("Speed & Rpm"));
        assert_eq!(
            doc.reference_path(iface.id).as_deref(),
            Some("/Interfaces/Speed & Rpm")
        );
    }

    #[test]
    fn test_write_layout() {
        let mut doc = Document::new();
        doc.comment = Some("generated".to_string());
        let root = doc.add_root("AUTOSAR");
        doc.set_attribute(root, "xmlns", "http://autosar.org/schema/r4.0");
        let pkgs = doc.append_child(root, "AR-PACKAGES");
        let pkg = doc.append_child(pkgs, "AR-PACKAGE");
        doc.child_with_text(pkg, SHORT_NAME, "A<B");
        doc.append_child(pkg, "ELEMENTS");

        let text = String::from_utf8(Arxml.write(&doc).unwrap()).unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!-- generated -->\n\
<AUTOSAR xmlns=\"http://autosar.org/schema/r4.0\">\n\
  <AR-PACKAGES>\n\
    <AR-PACKAGE>\n\
      <SHORT-NAME>A&lt;B</SHORT-NAME>\n\
      <ELEMENTS/>\n\
    </AR-PACKAGE>\n\
  </AR-PACKAGES>\n\
</AUTOSAR>\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_then_read_preserves_structure() {
        let original = Arxml.read(SAMPLE.as_bytes()).unwrap();
        let bytes = Arxml.write(&original).unwrap();
        let back = Arxml.read(&bytes).unwrap();
        assert_eq!(back.len(), original.len());
        assert_eq!(back.comment, original.comment);
        let iface = back.elements("SENDER-RECEIVER-INTERFACE")[0];
        assert_eq!(back.short_name(iface.id), Some("Speed & Rpm"));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            Arxml.read(b"<AUTOSAR><A></B></AUTOSAR>"),
            Err(Error::Xml(_))
        ));
        assert!(Arxml.validate(b"").is_err());
        assert!(Arxml.write(&Document::new()).is_err());
    }
}
