//! Document content envelope
//!
//! Binary document content arrives from the upstream producer as a
//! base64 payload wrapped in a small XML envelope that also declares the
//! file extension and media type:
//!
//! ```xml
//! <Document Extension="pdf" MimeType="application/pdf">
//!   <Content>JVBERi0xLjQK...</Content>
//! </Document>
//! ```

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{RepositoryError, RepositoryResult};

/// Upper bound on an encoded envelope accepted for decoding.
const MAX_ENVELOPE_SIZE: usize = 64 * 1024 * 1024;

/// Decoded binary content for a document, with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContent {
    /// Raw bytes of the document.
    pub data: Vec<u8>,

    /// File extension, without a leading dot (e.g. "pdf").
    pub extension: String,

    /// Declared media type (e.g. "application/pdf").
    pub mime_type: String,
}

impl DocumentContent {
    /// Create content from raw bytes.
    pub fn new(
        data: Vec<u8>,
        extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            data,
            extension: extension.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Parse a content envelope.
    ///
    /// Rejects oversized input before attempting the base64 decode.
    pub fn from_envelope(xml: &str) -> RepositoryResult<Self> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        if xml.len() > MAX_ENVELOPE_SIZE {
            return Err(RepositoryError::invalid_content(format!(
                "envelope exceeds maximum size ({} > {} bytes)",
                xml.len(),
                MAX_ENVELOPE_SIZE
            )));
        }

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut extension = None;
        let mut mime_type = None;
        let mut encoded = None;
        let mut in_content = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e) | Event::Empty(e)) => {
                    let name = e.local_name();
                    let name_str = std::str::from_utf8(name.as_ref()).unwrap_or("");

                    match name_str {
                        "Document" => {
                            for attr in e.attributes().flatten() {
                                let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
                                let value = attr.unescape_value().unwrap_or_default();

                                match key {
                                    "Extension" => {
                                        extension =
                                            Some(value.trim_start_matches('.').to_string());
                                    }
                                    "MimeType" => mime_type = Some(value.to_string()),
                                    _ => {}
                                }
                            }
                        }
                        "Content" => in_content = true,
                        _ => {}
                    }
                }
                Ok(Event::Text(e)) => {
                    if in_content {
                        encoded = Some(e.unescape().unwrap_or_default().to_string());
                    }
                }
                Ok(Event::End(e)) => {
                    let local_name = e.local_name();
                    if local_name.as_ref() == b"Content" {
                        in_content = false;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(RepositoryError::invalid_content(format!(
                        "XML parse error: {e}"
                    )));
                }
                _ => {}
            }
        }

        let encoded = encoded
            .ok_or_else(|| RepositoryError::invalid_content("missing Content element"))?;

        // base64 payloads may arrive wrapped with whitespace
        let compact: String = encoded.split_whitespace().collect();
        let data = STANDARD
            .decode(compact)
            .map_err(|e| RepositoryError::invalid_content(format!("base64 decode failed: {e}")))?;

        Ok(Self {
            data,
            extension: extension.unwrap_or_default(),
            mime_type: mime_type.unwrap_or_default(),
        })
    }

    /// Render this content back into envelope form.
    #[must_use]
    pub fn to_envelope(&self) -> String {
        format!(
            "<Document Extension=\"{}\" MimeType=\"{}\"><Content>{}</Content></Document>",
            self.extension,
            self.mime_type,
            STANDARD.encode(&self.data)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_round_trip() {
        let content = DocumentContent::new(b"%PDF-1.4".to_vec(), "pdf", "application/pdf");
        let envelope = content.to_envelope();
        let parsed = DocumentContent::from_envelope(&envelope).unwrap();

        assert_eq!(parsed, content);
    }

    #[test]
    fn test_envelope_decodes_declared_bytes() {
        let xml = "<Document Extension=\".txt\" MimeType=\"text/plain\">\
                   <Content>aGVsbG8=</Content></Document>";
        let parsed = DocumentContent::from_envelope(xml).unwrap();

        assert_eq!(parsed.data, b"hello");
        assert_eq!(parsed.extension, "txt");
        assert_eq!(parsed.mime_type, "text/plain");
    }

    #[test]
    fn test_envelope_tolerates_wrapped_base64() {
        let xml = "<Document Extension=\"txt\" MimeType=\"text/plain\">\
                   <Content>aGVs\n  bG8=</Content></Document>";
        let parsed = DocumentContent::from_envelope(xml).unwrap();
        assert_eq!(parsed.data, b"hello");
    }

    #[test]
    fn test_missing_content_element() {
        let xml = "<Document Extension=\"pdf\" MimeType=\"application/pdf\"></Document>";
        let err = DocumentContent::from_envelope(xml).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONTENT");
    }

    #[test]
    fn test_malformed_base64() {
        let xml = "<Document Extension=\"pdf\" MimeType=\"application/pdf\">\
                   <Content>not base64!!</Content></Document>";
        assert!(DocumentContent::from_envelope(xml).is_err());
    }
}
