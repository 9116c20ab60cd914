//! Document-to-text extraction for the text input.
//!
//! Dispatch is by lowercased file extension; anything outside the
//! supported set is rejected before any file I/O. The parsing itself is
//! delegated to existing crates - only the dispatch contract and the
//! joining conventions (pages separated by a blank line, markdown
//! stripped to plain text) are ours.

use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::anyhow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported file type '{0}' (supported: txt, md, pdf, docx)")]
    UnsupportedType(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to extract {format} text: {source}")]
    Parse {
        format: &'static str,
        source: anyhow::Error,
    },
}

pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(std::fs::read_to_string(path)?),
        "md" => extract_markdown(path),
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => Err(ExtractError::UnsupportedType(other.to_string())),
    }
}

/// Markdown rendered down to the plain text that should be read aloud:
/// heading markers, emphasis syntax and link targets are dropped.
fn extract_markdown(path: &Path) -> Result<String, ExtractError> {
    use pulldown_cmark::{Event, Parser, TagEnd};

    let source = std::fs::read_to_string(path)?;
    let mut text = String::new();

    for event in Parser::new(&source) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::BlockQuote(_)) => {
                if !text.ends_with("\n\n") {
                    text.push_str("\n\n");
                }
            }
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

/// Page-by-page text, pages joined by a blank line. A page that fails to
/// extract is skipped as long as some page succeeded; a document where
/// every page fails surfaces the first error.
fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let document = lopdf::Document::load(path).map_err(|e| ExtractError::Parse {
        format: "pdf",
        source: anyhow!(e),
    })?;

    let mut pages = Vec::new();
    let mut first_error = None;

    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text.trim().to_string()),
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if pages.is_empty() {
        if let Some(e) = first_error {
            return Err(ExtractError::Parse {
                format: "pdf",
                source: anyhow!(e),
            });
        }
    }

    Ok(pages.join("\n\n"))
}

/// DOCX is a zip archive; the document text lives in the text runs of
/// word/document.xml, with `w:p` elements as paragraph boundaries.
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ExtractError::Parse {
        format: "docx",
        source: anyhow!(e),
    })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Parse {
            format: "docx",
            source: anyhow!(e),
        })?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(t)) => {
                let content = t.unescape().map_err(|e| ExtractError::Parse {
                    format: "docx",
                    source: anyhow!(e),
                })?;
                text.push_str(&content);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Parse {
                    format: "docx",
                    source: anyhow!(e),
                })
            }
        }
        buf.clear();
    }

    Ok(text.trim().to_string())
}
