use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

/// The main body part inside a WordprocessingML package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the uncompressed body part. Uploads are capped compressed.
const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a DOCX container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("word/document.xml exceeds {limit} bytes uncompressed")]
    TooLarge { limit: u64 },
}

/// Returns the text of every `w:p` paragraph in document order.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocxError> {
    extract_paragraphs_within(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_paragraphs_within(bytes: &[u8], limit: u64) -> Result<Vec<String>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let part = archive.by_name(DOCUMENT_PART)?;
    if part.size() > limit {
        return Err(DocxError::TooLarge { limit });
    }

    // The declared size comes from the archive header and is not trusted.
    let mut xml = String::new();
    part.take(limit + 1).read_to_string(&mut xml)?;
    if xml.len() as u64 > limit {
        return Err(DocxError::TooLarge { limit });
    }
    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Text boxes nest paragraphs inside paragraphs; inner ones close first.
    let mut open: Vec<String> = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text_run = true,
                // Legacy VML copy of the content already read under mc:Choice.
                b"mc:Fallback" => {
                    let end = e.to_end().into_owned();
                    reader.read_to_end(end.name())?;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_text(&mut open, "\t"),
                b"w:br" | b"w:cr" => push_text(&mut open, "\n"),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let text = t.unescape()?;
                push_text(&mut open, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_text(open: &mut [String], text: &str) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push_str(text);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Builds a minimal DOCX package with one paragraph per entry.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_paragraphs_in_order() {
        let bytes = build_docx(&["Summary", "Rust, Go, PostgreSQL"]);
        let paragraphs = extract_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Summary", "Rust, Go, PostgreSQL"]);
    }

    #[test]
    fn test_runs_within_a_paragraph_are_concatenated() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Led </w:t></w:r><w:r><w:t>migration</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), vec!["Led migration"]);
    }

    #[test]
    fn test_empty_paragraph_and_tabs() {
        let xml = r#"<w:document><w:body>
            <w:p/>
            <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), vec!["", "Skills\tRust"]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>R&amp;D &lt;team&gt;</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), vec!["R&D <team>"]);
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:instrText>PAGE</w:instrText><w:t>Visible</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), vec!["Visible"]);
    }

    #[test]
    fn test_alternate_content_text_box_is_read_once() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><mc:AlternateContent>
                <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>
                    <w:p><w:r><w:t>Boxed</w:t></w:r></w:p>
                </w:txbxContent></wps:txbx></w:drawing></mc:Choice>
                <mc:Fallback><w:pict><v:textbox><w:txbxContent>
                    <w:p><w:r><w:t>Boxed</w:t></w:r></w:p>
                </w:txbxContent></v:textbox></w:pict></mc:Fallback>
            </mc:AlternateContent></w:r></w:p>
            <w:p><w:r><w:t>After</w:t></w:r></w:p>
        </w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), vec!["Boxed", "", "After"]);
    }

    #[test]
    fn test_oversized_document_part_is_rejected() {
        let bytes = build_docx(&["Built scalable APIs using Go."]);
        assert!(matches!(
            extract_paragraphs_within(&bytes, 64),
            Err(DocxError::TooLarge { limit: 64 })
        ));
        assert_eq!(
            extract_paragraphs_within(&bytes, 4096).unwrap(),
            vec!["Built scalable APIs using Go."]
        );
    }

    #[test]
    fn test_missing_document_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("docProps/core.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<cp:coreProperties/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(matches!(extract_paragraphs(&bytes), Err(DocxError::Zip(_))));
    }
}
