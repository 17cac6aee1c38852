//! XLSX workbook format.
//!
//! An XLSX file is a ZIP archive of SpreadsheetML parts:
//!
//! ```text
//! workbook.xlsx
//! ├── [Content_Types].xml
//! ├── _rels/.rels
//! └── xl/
//!     ├── workbook.xml            # sheet names, in tab order
//!     ├── _rels/workbook.xml.rels # sheet name -> worksheet part
//!     ├── sharedStrings.xml       # optional string table
//!     ├── styles.xml
//!     └── worksheets/sheet1.xml
//! ```
//!
//! Reading understands shared strings, inline strings, formula string
//! results, booleans and numbers. Writing always uses inline strings, so
//! no string table is produced.

use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{Cell, Sheet, Workbook, WorkbookFormat};
use crate::error::{Error, Result};

/// Well-known part names.
mod parts {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const WORKBOOK: &str = "xl/workbook.xml";
    pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
    pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
    pub const STYLES: &str = "xl/styles.xml";
}

mod namespace {
    pub const MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    pub const OFFICE_RELS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
}

/// XLSX workbook handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xlsx;

impl WorkbookFormat for Xlsx {
    fn name(&self) -> &'static str {
        "XLSX"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xlsx"]
    }

    fn read(&self, input: &[u8]) -> Result<Workbook> {
        reader::read(input)
    }

    fn write(&self, workbook: &Workbook) -> Result<Vec<u8>> {
        writer::write(workbook)
    }
}

/// Zero-based column index of a cell reference such as `AB12`.
fn column_index(reference: &str) -> Option<usize> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let one_based = letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize);
    Some(one_based - 1)
}

/// Column letters for a zero-based index: 0 -> `A`, 26 -> `AA`.
fn column_name(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

mod reader {
    use rustc_hash::FxHashMap;
    use std::io::Read;

    use zip::ZipArchive;
    use zip::result::ZipError;

    use super::*;

    pub fn read(input: &[u8]) -> Result<Workbook> {
        let mut archive = ZipArchive::new(Cursor::new(input))
            .map_err(|e| Error::archive(format!("Failed to open XLSX archive: {e}")))?;

        let shared = match read_part(&mut archive, parts::SHARED_STRINGS)? {
            Some(bytes) => shared_strings(&bytes)?,
            None => Vec::new(),
        };

        let workbook_xml = read_part(&mut archive, parts::WORKBOOK)?
            .ok_or_else(|| Error::archive(format!("Missing part {}", parts::WORKBOOK)))?;
        let sheet_refs = sheet_entries(&workbook_xml)?;

        let targets = match read_part(&mut archive, parts::WORKBOOK_RELS)? {
            Some(bytes) => relationships(&bytes)?,
            None => FxHashMap::default(),
        };

        let mut workbook = Workbook::new();
        for (position, (name, rel_id)) in sheet_refs.into_iter().enumerate() {
            let part = rel_id
                .and_then(|id| targets.get(&id))
                .map(|target| part_path(target))
                .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", position + 1));
            let bytes = read_part(&mut archive, &part)?
                .ok_or_else(|| Error::archive(format!("Missing worksheet part {part}")))?;
            let rows = sheet_rows(&bytes, &shared)?;
            tracing::debug!(sheet = %name, rows = rows.len(), "read worksheet");
            workbook.sheets.push(Sheet { name, rows });
        }
        Ok(workbook)
    }

    fn read_part(
        archive: &mut ZipArchive<Cursor<&[u8]>>,
        path: &str,
    ) -> Result<Option<Vec<u8>>> {
        match archive.by_name(path) {
            Ok(mut file) => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)
                    .map_err(|e| Error::archive(format!("Failed to read {path}: {e}")))?;
                Ok(Some(bytes))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(Error::archive(format!("Failed to open {path}: {e}"))),
        }
    }

    /// Relationship targets are relative to `xl/` unless absolute.
    fn part_path(target: &str) -> String {
        match target.strip_prefix('/') {
            Some(absolute) => absolute.to_string(),
            None => format!("xl/{target}"),
        }
    }

    fn xml_reader(input: &[u8]) -> Reader<&[u8]> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(false);
        reader
    }

    fn parse_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> Error {
        Error::xml(format!(
            "XML parse error at position {}: {e}",
            reader.error_position()
        ))
    }

    fn attribute(e: &BytesStart<'_>, matches: impl Fn(&[u8]) -> bool) -> Result<Option<String>> {
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::xml(format!("Attribute error: {e}")))?;
            if matches(attr.key.as_ref()) {
                let value = attr
                    .unescape_value()
                    .map_err(|e| Error::xml(format!("Attribute value error: {e}")))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn text(t: &BytesText<'_>) -> Result<String> {
        t.unescape()
            .map(|s| s.into_owned())
            .map_err(|e| Error::xml(format!("Text error: {e}")))
    }

    /// `<si>` entries in order; rich-text runs are concatenated, phonetic
    /// hints skipped.
    fn shared_strings(input: &[u8]) -> Result<Vec<String>> {
        let mut reader = xml_reader(input);
        let mut buf = Vec::new();
        let mut strings = Vec::new();
        let mut current = String::new();
        let mut in_text = false;
        let mut in_phonetic = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"si" => current.clear(),
                    b"t" if !in_phonetic => in_text = true,
                    b"rPh" => in_phonetic = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::Text(ref t)) if in_text => current.push_str(&text(t)?),
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"rPh" => in_phonetic = false,
                    b"si" => strings.push(std::mem::take(&mut current)),
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(parse_error(&reader, e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(strings)
    }

    /// `(name, relationship id)` of every `<sheet>` in tab order.
    fn sheet_entries(input: &[u8]) -> Result<Vec<(String, Option<String>)>> {
        let mut reader = xml_reader(input);
        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"sheet" =>
                {
                    let name = attribute(e, |key| key == b"name")?
                        .ok_or_else(|| Error::xml("Sheet entry without a name"))?;
                    let rel_id = attribute(e, |key| key.ends_with(b":id"))?;
                    sheets.push((name, rel_id));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(parse_error(&reader, e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(sheets)
    }

    fn relationships(input: &[u8]) -> Result<FxHashMap<String, String>> {
        let mut reader = xml_reader(input);
        let mut buf = Vec::new();
        let mut targets = FxHashMap::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let id = attribute(e, |key| key == b"Id")?;
                    let target = attribute(e, |key| key == b"Target")?;
                    if let (Some(id), Some(target)) = (id, target) {
                        targets.insert(id, target);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(parse_error(&reader, e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(targets)
    }

    /// Cell currently being read.
    #[derive(Default)]
    struct PendingCell {
        column: usize,
        kind: Option<String>,
        value: String,
    }

    impl PendingCell {
        fn finish(self, shared: &[String]) -> Cell {
            match self.kind.as_deref() {
                Some("s") => self
                    .value
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| shared.get(idx))
                    .map_or(Cell::Empty, |s| Cell::from(s.as_str())),
                Some("b") => Cell::Bool(self.value.trim() == "1"),
                Some("inlineStr") | Some("str") | Some("e") => Cell::from(self.value),
                _ => match self.value.trim().parse::<f64>() {
                    Ok(number) => Cell::Number(number),
                    Err(_) => Cell::from(self.value),
                },
            }
        }
    }

    /// Dense rows of a worksheet; gaps in row or column numbering become
    /// empty rows and [`Cell::Empty`].
    fn sheet_rows(input: &[u8], shared: &[String]) -> Result<Vec<Vec<Cell>>> {
        let mut reader = xml_reader(input);
        let mut buf = Vec::new();
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut pending: Option<PendingCell> = None;
        let mut in_value = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"row" => start_row(&mut rows, e)?,
                    b"c" => {
                        let next_column = rows.last().map_or(0, Vec::len);
                        let column = attribute(e, |key| key == b"r")?
                            .as_deref()
                            .and_then(column_index)
                            .unwrap_or(next_column);
                        pending = Some(PendingCell {
                            column,
                            kind: attribute(e, |key| key == b"t")?,
                            value: String::new(),
                        });
                    }
                    b"v" | b"t" => in_value = pending.is_some(),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"row" => {
                    start_row(&mut rows, e)?;
                }
                Ok(Event::Text(ref t)) if in_value => {
                    if let Some(cell) = pending.as_mut() {
                        cell.value.push_str(&text(t)?);
                    }
                }
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"v" | b"t" => in_value = false,
                    b"c" => {
                        if let Some(cell) = pending.take() {
                            let column = cell.column;
                            let value = cell.finish(shared);
                            if rows.is_empty() {
                                rows.push(Vec::new());
                            }
                            if let Some(row) = rows.last_mut() {
                                if row.len() <= column {
                                    row.resize(column + 1, Cell::Empty);
                                }
                                row[column] = value;
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(parse_error(&reader, e)),
                _ => {}
            }
            buf.clear();
        }
        Ok(rows)
    }

    fn start_row(rows: &mut Vec<Vec<Cell>>, e: &BytesStart<'_>) -> Result<()> {
        let number = attribute(e, |key| key == b"r")?.and_then(|r| r.trim().parse::<usize>().ok());
        if let Some(number) = number {
            while rows.len() + 1 < number {
                rows.push(Vec::new());
            }
        }
        rows.push(Vec::new());
        Ok(())
    }
}

mod writer {
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    const CONTENT_TYPE_SHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    const CONTENT_TYPE_WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    const CONTENT_TYPE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
    const REL_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    const REL_WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    const REL_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

    /// Style index of header cells in `styles.xml`.
    const HEADER_STYLE: &str = "1";
    const COLUMN_WIDTH: &str = "20";

    pub fn write(workbook: &Workbook) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut entries = vec![
            (parts::CONTENT_TYPES.to_string(), content_types(workbook)?),
            (parts::ROOT_RELS.to_string(), root_rels()?),
            (parts::WORKBOOK.to_string(), workbook_part(workbook)?),
            (parts::WORKBOOK_RELS.to_string(), workbook_rels(workbook)?),
            (parts::STYLES.to_string(), styles()?),
        ];
        for (idx, sheet) in workbook.sheets.iter().enumerate() {
            entries.push((sheet_part(idx), worksheet(sheet)?));
        }

        for (path, bytes) in entries {
            zip.start_file(path.as_str(), options)
                .map_err(|e| Error::archive(format!("Failed to create {path}: {e}")))?;
            zip.write_all(&bytes)
                .map_err(|e| Error::archive(format!("Failed to write {path}: {e}")))?;
        }

        zip.finish()
            .map_err(|e| Error::archive(format!("Failed to finalize archive: {e}")))?;

        Ok(buffer.into_inner())
    }

    fn sheet_part(idx: usize) -> String {
        format!("xl/worksheets/sheet{}.xml", idx + 1)
    }

    /// Thin event writer for flat SpreadsheetML parts.
    struct Part {
        writer: Writer<Cursor<Vec<u8>>>,
    }

    impl Part {
        fn new() -> Result<Self> {
            let mut writer = Writer::new(Cursor::new(Vec::new()));
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
                .map_err(|e| Error::xml(format!("Write error: {e}")))?;
            Ok(Self { writer })
        }

        fn event(&mut self, event: Event<'_>) -> Result<()> {
            self.writer
                .write_event(event)
                .map_err(|e| Error::xml(format!("Write error: {e}")))
        }

        fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
            let mut elem = BytesStart::new(tag);
            elem.extend_attributes(attrs.iter().copied());
            self.event(Event::Start(elem))
        }

        fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
            let mut elem = BytesStart::new(tag);
            elem.extend_attributes(attrs.iter().copied());
            self.event(Event::Empty(elem))
        }

        fn end(&mut self, tag: &str) -> Result<()> {
            self.event(Event::End(BytesEnd::new(tag)))
        }

        fn text(&mut self, text: &str) -> Result<()> {
            self.event(Event::Text(BytesText::new(text)))
        }

        fn finish(self) -> Vec<u8> {
            self.writer.into_inner().into_inner()
        }
    }

    fn content_types(workbook: &Workbook) -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start("Types", &[("xmlns", namespace::CONTENT_TYPES)])?;
        part.empty(
            "Default",
            &[
                ("Extension", "rels"),
                ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
            ],
        )?;
        part.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        part.empty(
            "Override",
            &[("PartName", "/xl/workbook.xml"), ("ContentType", CONTENT_TYPE_WORKBOOK)],
        )?;
        part.empty(
            "Override",
            &[("PartName", "/xl/styles.xml"), ("ContentType", CONTENT_TYPE_STYLES)],
        )?;
        for idx in 0..workbook.sheets.len() {
            let name = format!("/{}", sheet_part(idx));
            part.empty(
                "Override",
                &[("PartName", name.as_str()), ("ContentType", CONTENT_TYPE_SHEET)],
            )?;
        }
        part.end("Types")?;
        Ok(part.finish())
    }

    fn root_rels() -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start("Relationships", &[("xmlns", namespace::PACKAGE_RELS)])?;
        part.empty(
            "Relationship",
            &[("Id", "rId1"), ("Type", REL_DOCUMENT), ("Target", "xl/workbook.xml")],
        )?;
        part.end("Relationships")?;
        Ok(part.finish())
    }

    fn workbook_part(workbook: &Workbook) -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start(
            "workbook",
            &[("xmlns", namespace::MAIN), ("xmlns:r", namespace::OFFICE_RELS)],
        )?;
        part.start("sheets", &[])?;
        for (idx, sheet) in workbook.sheets.iter().enumerate() {
            let sheet_id = (idx + 1).to_string();
            let rel_id = format!("rId{}", idx + 1);
            part.empty(
                "sheet",
                &[
                    ("name", sheet.name.as_str()),
                    ("sheetId", sheet_id.as_str()),
                    ("r:id", rel_id.as_str()),
                ],
            )?;
        }
        part.end("sheets")?;
        part.end("workbook")?;
        Ok(part.finish())
    }

    fn workbook_rels(workbook: &Workbook) -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start("Relationships", &[("xmlns", namespace::PACKAGE_RELS)])?;
        for idx in 0..workbook.sheets.len() {
            let rel_id = format!("rId{}", idx + 1);
            let target = format!("worksheets/sheet{}.xml", idx + 1);
            part.empty(
                "Relationship",
                &[
                    ("Id", rel_id.as_str()),
                    ("Type", REL_WORKSHEET),
                    ("Target", target.as_str()),
                ],
            )?;
        }
        let styles_id = format!("rId{}", workbook.sheets.len() + 1);
        part.empty(
            "Relationship",
            &[("Id", styles_id.as_str()), ("Type", REL_STYLES), ("Target", "styles.xml")],
        )?;
        part.end("Relationships")?;
        Ok(part.finish())
    }

    /// Two cell formats: 0 is the default, 1 is the header (bold white on
    /// blue, centered).
    fn styles() -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start("styleSheet", &[("xmlns", namespace::MAIN)])?;

        part.start("fonts", &[("count", "2")])?;
        part.start("font", &[])?;
        part.empty("sz", &[("val", "11")])?;
        part.empty("name", &[("val", "Calibri")])?;
        part.end("font")?;
        part.start("font", &[])?;
        part.empty("b", &[])?;
        part.empty("sz", &[("val", "11")])?;
        part.empty("color", &[("rgb", "FFFFFFFF")])?;
        part.empty("name", &[("val", "Calibri")])?;
        part.end("font")?;
        part.end("fonts")?;

        part.start("fills", &[("count", "3")])?;
        part.start("fill", &[])?;
        part.empty("patternFill", &[("patternType", "none")])?;
        part.end("fill")?;
        part.start("fill", &[])?;
        part.empty("patternFill", &[("patternType", "gray125")])?;
        part.end("fill")?;
        part.start("fill", &[])?;
        part.start("patternFill", &[("patternType", "solid")])?;
        part.empty("fgColor", &[("rgb", "FF366092")])?;
        part.end("patternFill")?;
        part.end("fill")?;
        part.end("fills")?;

        part.start("borders", &[("count", "1")])?;
        part.empty("border", &[])?;
        part.end("borders")?;

        part.start("cellStyleXfs", &[("count", "1")])?;
        part.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
        part.end("cellStyleXfs")?;

        part.start("cellXfs", &[("count", "2")])?;
        part.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
        part.start(
            "xf",
            &[
                ("numFmtId", "0"),
                ("fontId", "1"),
                ("fillId", "2"),
                ("borderId", "0"),
                ("applyFont", "1"),
                ("applyFill", "1"),
                ("applyAlignment", "1"),
            ],
        )?;
        part.empty("alignment", &[("horizontal", "center")])?;
        part.end("xf")?;
        part.end("cellXfs")?;

        part.end("styleSheet")?;
        Ok(part.finish())
    }

    fn worksheet(sheet: &Sheet) -> Result<Vec<u8>> {
        let mut part = Part::new()?;
        part.start("worksheet", &[("xmlns", namespace::MAIN)])?;

        let width = sheet.width();
        if width > 0 {
            let max = width.to_string();
            part.start("cols", &[])?;
            part.empty(
                "col",
                &[
                    ("min", "1"),
                    ("max", max.as_str()),
                    ("width", COLUMN_WIDTH),
                    ("customWidth", "1"),
                ],
            )?;
            part.end("cols")?;
        }

        part.start("sheetData", &[])?;
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let number = (row_idx + 1).to_string();
            part.start("row", &[("r", number.as_str())])?;
            for (col_idx, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column_name(col_idx), number);
                let mut attrs = vec![("r", reference.as_str())];
                if row_idx == 0 {
                    attrs.push(("s", HEADER_STYLE));
                }
                write_cell(&mut part, cell, attrs)?;
            }
            part.end("row")?;
        }
        part.end("sheetData")?;

        part.end("worksheet")?;
        Ok(part.finish())
    }

    fn write_cell(part: &mut Part, cell: &Cell, mut attrs: Vec<(&str, &str)>) -> Result<()> {
        match cell {
            Cell::Empty => Ok(()),
            Cell::Text(text) => {
                attrs.push(("t", "inlineStr"));
                part.start("c", &attrs)?;
                part.start("is", &[])?;
                if text.trim() != text {
                    part.start("t", &[("xml:space", "preserve")])?;
                } else {
                    part.start("t", &[])?;
                }
                part.text(text)?;
                part.end("t")?;
                part.end("is")?;
                part.end("c")
            }
            Cell::Number(value) => {
                part.start("c", &attrs)?;
                part.start("v", &[])?;
                part.text(&value.to_string())?;
                part.end("v")?;
                part.end("c")
            }
            Cell::Bool(value) => {
                attrs.push(("t", "b"));
                part.start("c", &attrs)?;
                part.start("v", &[])?;
                part.text(if *value { "1" } else { "0" })?;
                part.end("v")?;
                part.end("c")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("AB12"), Some(27));
        assert_eq!(column_index("12"), None);
    }

    #[test]
    fn test_write_then_read() {
        let wb = Workbook::new()
            .with_sheet(
                Sheet::new("Types")
                    .with_row(["Name", "Category", "Field Name", "Definition"])
                    .with_row(vec![
                        Cell::from("Buf"),
                        Cell::from("array"),
                        Cell::Empty,
                        Cell::from("uint8[4]"),
                    ]),
            )
            .with_sheet(
                Sheet::new("APIs")
                    .with_row(["API Name", "InitValue"])
                    .with_row(vec![Cell::from("Speed"), Cell::Number(3.0)]),
            );

        let bytes = Xlsx.write(&wb).unwrap();
        let back = Xlsx.read(&bytes).unwrap();

        let names: Vec<_> = back.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Types", "APIs"]);

        let types = back.sheet("Types").unwrap();
        assert_eq!(types.rows[1][2], Cell::Empty);
        assert_eq!(types.rows[1][3], Cell::from("uint8[4]"));

        let apis = back.sheet("APIs").unwrap();
        assert_eq!(apis.rows[1][1].normalized().as_deref(), Some("3"));
    }

    #[test]
    fn test_read_rejects_non_archive() {
        assert!(matches!(Xlsx.read(b"not a zip"), Err(Error::Archive(_))));
    }
}
