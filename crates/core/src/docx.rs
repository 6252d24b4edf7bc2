//! Minimal WordprocessingML (`.docx`) writer.
//!
//! A `.docx` file is a zip container holding a content-types manifest, a
//! package relationship file and `word/document.xml`. [`DocxBuilder`]
//! produces exactly those three parts, which is enough for Word,
//! LibreOffice and Google Docs to open the result.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// MIME type of generated documents.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// A4 portrait, 2.5 cm margins.
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1417" w:right="1417" w:bottom="1417" w:left="1417" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;

#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("Zip container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Runs and paragraphs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Justify,
}

impl Align {
    fn as_xml(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Justify => "both",
        }
    }
}

/// A span of uniformly formatted text.
#[derive(Debug, Clone)]
pub struct Run {
    text: String,
    bold: bool,
    italic: bool,
    size_pt: u32,
    color: Option<&'static str>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size_pt: 11,
            color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn size(mut self, pt: u32) -> Self {
        self.size_pt = pt;
        self
    }

    /// Hex RGB without `#`, e.g. `"1E40AF"`.
    pub fn color(mut self, hex: &'static str) -> Self {
        self.color = Some(hex);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    runs: Vec<Run>,
    align: Align,
    /// Twentieths of a point.
    spacing_before: u32,
    spacing_after: u32,
    /// Line spacing in 240ths of a line (240 = single).
    line: Option<u32>,
    first_line_indent: Option<u32>,
    bottom_border: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    /// Line spacing as a multiple of single spacing (`1.5`).
    pub fn line_spacing(mut self, factor: f32) -> Self {
        self.line = Some((factor * 240.0).round() as u32);
        self
    }

    pub fn first_line_indent(mut self, twips: u32) -> Self {
        self.first_line_indent = Some(twips);
        self
    }

    pub fn bottom_border(mut self) -> Self {
        self.bottom_border = true;
        self
    }

    fn write_xml(&self, font: &str, out: &mut String) {
        out.push_str("<w:p><w:pPr>");
        if self.bottom_border {
            out.push_str(
                r#"<w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr>"#,
            );
        }
        out.push_str(&format!(
            r#"<w:spacing w:before="{}" w:after="{}""#,
            self.spacing_before, self.spacing_after
        ));
        if let Some(line) = self.line {
            out.push_str(&format!(r#" w:line="{line}" w:lineRule="auto""#));
        }
        out.push_str("/>");
        if let Some(indent) = self.first_line_indent {
            out.push_str(&format!(r#"<w:ind w:firstLine="{indent}"/>"#));
        }
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, self.align.as_xml()));
        out.push_str("</w:pPr>");

        for run in &self.runs {
            write_run(run, font, out);
        }
        out.push_str("</w:p>");
    }
}

fn write_run(run: &Run, font: &str, out: &mut String) {
    let font = escape_xml(font);
    out.push_str("<w:r><w:rPr>");
    out.push_str(&format!(
        r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
    ));
    if run.bold {
        out.push_str("<w:b/>");
    }
    if run.italic {
        out.push_str("<w:i/>");
    }
    if let Some(color) = run.color {
        out.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
    }
    let half_points = run.size_pt * 2;
    out.push_str(&format!(r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#));
    out.push_str("</w:rPr>");

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        out.push_str(r#"<w:t xml:space="preserve">"#);
        out.push_str(&escape_xml(line.trim_end_matches('\r')));
        out.push_str("</w:t>");
    }
    out.push_str("</w:r>");
}

/// Escape text for inclusion in XML, dropping control characters XML 1.0
/// cannot carry.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Accumulates paragraphs and packages them as a `.docx` byte buffer.
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    font: String,
    paragraphs: Vec<Paragraph>,
}

impl DocxBuilder {
    pub fn new(font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            paragraphs: Vec::new(),
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) -> &mut Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn empty_line(&mut self) -> &mut Self {
        self.push(Paragraph::new())
    }

    /// A horizontal rule (empty paragraph with a bottom border).
    pub fn separator(&mut self) -> &mut Self {
        self.push(Paragraph::new().bottom_border())
    }

    /// The `word/document.xml` part.
    pub fn document_xml(&self) -> String {
        let mut out = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        );
        for paragraph in &self.paragraphs {
            paragraph.write_xml(&self.font, &mut out);
        }
        out.push_str(SECTION_PROPERTIES);
        out.push_str("</w:body></w:document>");
        out
    }

    /// Package the document into `.docx` bytes.
    pub fn build(&self) -> Result<Vec<u8>, DocxError> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS_XML.as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(self.document_xml().as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn escapes_markup_and_drops_control_chars() {
        assert_eq!(escape_xml("a<b & \"c\"\u{1}"), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn paragraph_xml_carries_formatting() {
        let mut doc = DocxBuilder::new("Times New Roman");
        doc.push(
            Paragraph::new()
                .align(Align::Center)
                .run(Run::new("Titre").bold().size(16).color("1E40AF")),
        );
        let xml = doc.document_xml();
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:sz w:val="32"/>"#));
        assert!(xml.contains(r#"<w:color w:val="1E40AF"/>"#));
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
        assert!(xml.contains(">Titre</w:t>"));
    }

    #[test]
    fn newlines_become_breaks() {
        let mut doc = DocxBuilder::new("Arial");
        doc.push(Paragraph::new().run(Run::new("l1\nl2")));
        assert!(doc.document_xml().contains("l1</w:t><w:br/><w:t xml:space=\"preserve\">l2"));
    }

    #[test]
    fn separator_has_bottom_border() {
        let mut doc = DocxBuilder::new("Arial");
        doc.separator();
        assert!(doc.document_xml().contains("<w:pBdr><w:bottom"));
    }

    #[test]
    fn build_produces_readable_package() {
        let mut doc = DocxBuilder::new("Arial");
        doc.push(Paragraph::new().run(Run::new("Bonjour")));
        let bytes = doc.build().expect("build should succeed");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]
        );

        let mut body = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part")
            .read_to_string(&mut body)
            .expect("utf-8");
        assert!(body.contains("Bonjour"));
    }
}
