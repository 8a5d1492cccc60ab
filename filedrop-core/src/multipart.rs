//! Single-file `multipart/form-data` extraction
//!
//! The body is scanned as a sequence of segments:
//! ```text
//! [preamble] --boundary CRLF headers CRLF CRLF payload
//!            CRLF --boundary CRLF headers CRLF CRLF payload
//!            CRLF --boundary --  [epilogue]
//! ```
//! Every segment becomes a [`Part`]. Payloads are zero-copy slices of the
//! input `Bytes` and are never decoded as text, so arbitrary binary content
//! survives extraction byte-for-byte. Only the header block of each part is
//! read as UTF-8.
//!
//! [`extract_single_file`] then accepts exactly one file part; multiple parts
//! and plain form fields are representable but rejected.

use bytes::Bytes;
use memchr::memmem;

use crate::error::MultipartError;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";
const CLOSE_MARKER: &[u8] = b"--";

/// One segment of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Part whose disposition carries a `filename` parameter
    File {
        field_name: Option<String>,
        filename: String,
        content_type: Option<String>,
        payload: Bytes,
    },
    /// Plain form field
    Field { name: String, value: Bytes },
}

impl Part {
    /// Form field name, if the part declared one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::File { field_name, .. } => field_name.as_deref(),
            Self::Field { name, .. } => Some(name),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

/// The single uploaded file pulled out of a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Form field the file was posted under (`name="..."`)
    pub field_name: Option<String>,
    /// Client-declared filename, untrusted
    pub filename: String,
    /// Client-declared content type, not sniffed
    pub content_type: String,
    /// Raw file bytes
    pub payload: Bytes,
}

/// Parse the `boundary` parameter out of a `Content-Type` header value.
///
/// Parameter names are matched case-insensitively; a quoted value has its
/// quotes removed.
pub fn parse_boundary(content_type: &str) -> Result<String, MultipartError> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| {
            let value = value.trim();
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
                .to_string()
        })
        .filter(|boundary| !boundary.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Split a multipart body into its parts.
///
/// Parsing stops at the close delimiter `--boundary--`; anything after it
/// is ignored, as is any preamble before the first delimiter.
pub fn parse_parts(body: &Bytes, boundary: &str) -> Result<Vec<Part>, MultipartError> {
    if boundary.is_empty() {
        return Err(MultipartError::MissingBoundary);
    }

    let data = body.as_ref();
    let dash_boundary = format!("--{}", boundary).into_bytes();
    let delimiter = format!("\r\n--{}", boundary).into_bytes();
    let delimiter_finder = memmem::Finder::new(&delimiter);

    // The first delimiter may sit at the very start (no leading CRLF).
    let mut pos = if data.starts_with(&dash_boundary) {
        dash_boundary.len()
    } else {
        delimiter_finder
            .find(data)
            .map(|idx| idx + delimiter.len())
            .ok_or(MultipartError::NoOpeningBoundary)?
    };

    let mut parts = Vec::new();

    loop {
        if data[pos..].starts_with(CLOSE_MARKER) {
            break;
        }

        // Transport padding is allowed between the boundary and its CRLF.
        pos += data[pos..]
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        if !data[pos..].starts_with(CRLF) {
            return Err(MultipartError::MalformedDelimiter { offset: pos });
        }
        pos += CRLF.len();

        let (header_block, payload_start) = if data[pos..].starts_with(CRLF) {
            (&data[pos..pos], pos + CRLF.len())
        } else {
            let header_len = memmem::find(&data[pos..], HEADER_END).ok_or(
                MultipartError::MalformedHeaders {
                    reason: "missing blank line after part headers",
                },
            )?;
            (
                &data[pos..pos + header_len],
                pos + header_len + HEADER_END.len(),
            )
        };

        let payload_end = delimiter_finder
            .find(&data[payload_start..])
            .map(|idx| payload_start + idx)
            .ok_or(MultipartError::Unterminated)?;

        let headers = PartHeaders::parse(header_block)?;
        parts.push(headers.into_part(body.slice(payload_start..payload_end))?);

        pos = payload_end + delimiter.len();
    }

    tracing::trace!(parts = parts.len(), "parsed multipart body");
    Ok(parts)
}

/// Extract the one file carried by a single-part upload body.
pub fn extract_single_file(body: &Bytes, boundary: &str) -> Result<ExtractedFile, MultipartError> {
    let mut parts = parse_parts(body, boundary)?;

    let part = match parts.len() {
        0 => return Err(MultipartError::NoParts),
        1 => parts.remove(0),
        count => return Err(MultipartError::UnsupportedParts { count }),
    };

    match part {
        Part::Field { name, .. } => Err(MultipartError::NoFile { name }),
        Part::File {
            field_name,
            filename,
            content_type,
            payload,
        } => {
            if filename.is_empty() {
                return Err(MultipartError::MissingFilename);
            }
            let content_type = content_type.ok_or(MultipartError::MissingContentType)?;
            if payload.is_empty() {
                return Err(MultipartError::EmptyPayload);
            }

            Ok(ExtractedFile {
                field_name,
                filename,
                content_type,
                payload,
            })
        }
    }
}

/// Headers of one part that matter for form uploads
#[derive(Debug, Default)]
struct PartHeaders {
    disposition: Option<Disposition>,
    content_type: Option<String>,
}

#[derive(Debug, Default)]
struct Disposition {
    name: Option<String>,
    filename: Option<String>,
}

impl PartHeaders {
    fn parse(block: &[u8]) -> Result<Self, MultipartError> {
        let text = std::str::from_utf8(block).map_err(|_| MultipartError::MalformedHeaders {
            reason: "part headers are not valid UTF-8",
        })?;

        let mut headers = Self::default();
        for line in text.split("\r\n").filter(|l| !l.is_empty()) {
            let (name, value) = line
                .split_once(':')
                .ok_or(MultipartError::MalformedHeaders {
                    reason: "header line without a colon",
                })?;
            let name = name.trim();
            let value = value.trim();

            if name.eq_ignore_ascii_case("content-disposition") {
                headers.disposition = Some(Disposition::parse(value)?);
            } else if name.eq_ignore_ascii_case("content-type") {
                headers.content_type = Some(value.to_string());
            }
        }

        Ok(headers)
    }

    fn into_part(self, payload: Bytes) -> Result<Part, MultipartError> {
        let disposition = self.disposition.ok_or(MultipartError::MissingDisposition)?;

        match disposition.filename {
            Some(filename) => Ok(Part::File {
                field_name: disposition.name,
                filename,
                content_type: self.content_type,
                payload,
            }),
            None => {
                let name = disposition.name.ok_or(MultipartError::MalformedHeaders {
                    reason: "form field without a name",
                })?;
                Ok(Part::Field {
                    name,
                    value: payload,
                })
            }
        }
    }
}

impl Disposition {
    /// Parse `form-data; name="..."; filename="..."`
    fn parse(value: &str) -> Result<Self, MultipartError> {
        let (kind, mut rest) = value.split_once(';').unwrap_or((value, ""));
        if !kind.trim().eq_ignore_ascii_case("form-data") {
            return Err(MultipartError::MissingDisposition);
        }

        let mut disposition = Self::default();
        loop {
            rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
            if rest.is_empty() {
                break;
            }

            let eq = rest.find('=').ok_or(MultipartError::MalformedHeaders {
                reason: "disposition parameter without a value",
            })?;
            let param = rest[..eq].trim().to_ascii_lowercase();
            rest = rest[eq + 1..].trim_start();

            let (value, remaining) = match rest.strip_prefix('"') {
                Some(quoted) => read_quoted(quoted)?,
                None => {
                    let end = rest.find(';').unwrap_or(rest.len());
                    (rest[..end].trim().to_string(), &rest[end..])
                }
            };
            rest = remaining;

            match param.as_str() {
                "name" => disposition.name = Some(value),
                "filename" => disposition.filename = Some(value),
                _ => {}
            }
        }

        Ok(disposition)
    }
}

/// Read a quoted-string body (opening quote already consumed).
///
/// Only `\"` is treated as an escape; browsers send other backslashes
/// verbatim.
fn read_quoted(input: &str) -> Result<(String, &str), MultipartError> {
    let mut value = String::new();
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, '"'))) => {
                value.push('"');
                chars.next();
            }
            '"' => return Ok((value, &input[idx + 1..])),
            other => value.push(other),
        }
    }

    Err(MultipartError::MalformedHeaders {
        reason: "unterminated quoted string",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

    fn file_body(filename: &str, content_type: &str, payload: &[u8]) -> Bytes {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        Bytes::from(body)
    }

    #[test]
    fn test_parse_boundary() {
        assert_eq!(
            parse_boundary("multipart/form-data; boundary=abc123").unwrap(),
            "abc123"
        );
        assert_eq!(
            parse_boundary("multipart/form-data; charset=utf-8; BOUNDARY=\"a b\"").unwrap(),
            "a b"
        );
    }

    #[test]
    fn test_parse_boundary_missing() {
        assert_eq!(
            parse_boundary("multipart/form-data"),
            Err(MultipartError::MissingBoundary)
        );
        assert_eq!(
            parse_boundary("multipart/form-data; boundary="),
            Err(MultipartError::MissingBoundary)
        );
        assert_eq!(
            parse_boundary("application/json"),
            Err(MultipartError::MissingBoundary)
        );
    }

    #[test]
    fn test_extract_simple_file() {
        let body = file_body("report.pdf", "application/pdf", b"%PDF-1.7 hello");
        let file = extract_single_file(&body, BOUNDARY).unwrap();

        assert_eq!(file.field_name.as_deref(), Some("file"));
        assert_eq!(file.filename, "report.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.payload.as_ref(), b"%PDF-1.7 hello");
    }

    #[test]
    fn test_extract_preserves_every_byte_value() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let body = file_body("blob.png", "image/png", &payload);
        let file = extract_single_file(&body, BOUNDARY).unwrap();

        assert_eq!(file.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn test_payload_containing_dashes_after_crlf() {
        let payload = b"line one\r\n--not-the-boundary\r\n\r\nline two\r\n-";
        let body = file_body("notes.pdf", "application/pdf", payload);
        let file = extract_single_file(&body, BOUNDARY).unwrap();

        assert_eq!(file.payload.as_ref(), payload);
    }

    #[test]
    fn test_boundary_with_regex_characters() {
        let boundary = "a+b*c?(d)[e]$^.";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"x.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG\r\n--{b}--\r\n",
            b = boundary
        );
        let file = extract_single_file(&Bytes::from(body), boundary).unwrap();
        assert_eq!(file.payload.as_ref(), b"PNG");
    }

    #[test]
    fn test_preamble_and_epilogue_ignored() {
        let body = format!(
            "this is a preamble\r\n--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nJPEG\r\n--{b}--\r\ntrailing epilogue",
            b = BOUNDARY
        );
        let file = extract_single_file(&Bytes::from(body), BOUNDARY).unwrap();
        assert_eq!(file.filename, "a.jpg");
        assert_eq!(file.payload.as_ref(), b"JPEG");
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let body = format!(
            "--{b}\r\ncontent-disposition: Form-Data; filename=\"a.png\"; name=\"upload\"\r\n\
             CONTENT-TYPE: image/png\r\n\r\nPNG\r\n--{b}--",
            b = BOUNDARY
        );
        let file = extract_single_file(&Bytes::from(body), BOUNDARY).unwrap();
        assert_eq!(file.field_name.as_deref(), Some("upload"));
        assert_eq!(file.content_type, "image/png");
    }

    #[test]
    fn test_quoted_filename_with_escaped_quote() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"say \\\"hi\\\"; ok.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG\r\n--{b}--",
            b = BOUNDARY
        );
        let file = extract_single_file(&Bytes::from(body), BOUNDARY).unwrap();
        assert_eq!(file.filename, "say \"hi\"; ok.png");
    }

    #[test]
    fn test_unquoted_parameters() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=f; filename=plain.pdf\r\n\
             Content-Type: application/pdf\r\n\r\nPDF\r\n--{b}--",
            b = BOUNDARY
        );
        let file = extract_single_file(&Bytes::from(body), BOUNDARY).unwrap();
        assert_eq!(file.filename, "plain.pdf");
    }

    #[test]
    fn test_missing_terminator() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG data with no end",
            b = BOUNDARY
        );
        assert_eq!(
            extract_single_file(&Bytes::from(body), BOUNDARY),
            Err(MultipartError::Unterminated)
        );
    }

    #[test]
    fn test_missing_filename_marker() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n--{b}--",
            b = BOUNDARY
        );
        assert_eq!(
            extract_single_file(&Bytes::from(body), BOUNDARY),
            Err(MultipartError::NoFile {
                name: "comment".into()
            })
        );
    }

    #[test]
    fn test_missing_content_type() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.png\"\r\n\r\nPNG\r\n--{b}--",
            b = BOUNDARY
        );
        assert_eq!(
            extract_single_file(&Bytes::from(body), BOUNDARY),
            Err(MultipartError::MissingContentType)
        );
    }

    #[test]
    fn test_missing_header_terminator() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.png\"\r\n--{b}--",
            b = BOUNDARY
        );
        assert!(matches!(
            extract_single_file(&Bytes::from(body), BOUNDARY),
            Err(MultipartError::MalformedHeaders { .. })
        ));
    }

    #[test]
    fn test_wrong_boundary() {
        let body = file_body("a.png", "image/png", b"PNG");
        assert_eq!(
            extract_single_file(&body, "something-else"),
            Err(MultipartError::NoOpeningBoundary)
        );
    }

    #[test]
    fn test_empty_payload_and_filename() {
        let body = file_body("a.png", "image/png", b"");
        assert_eq!(
            extract_single_file(&body, BOUNDARY),
            Err(MultipartError::EmptyPayload)
        );

        // What a browser sends when no file was chosen
        let body = file_body("", "application/octet-stream", b"");
        assert_eq!(
            extract_single_file(&body, BOUNDARY),
            Err(MultipartError::MissingFilename)
        );
    }

    #[test]
    fn test_multiple_parts_rejected() {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nHoliday\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNG\r\n--{b}--\r\n",
            b = BOUNDARY
        );
        let body = Bytes::from(body);

        let parts = parse_parts(&body, BOUNDARY).unwrap();
        assert_eq!(parts.len(), 2);
        assert!(!parts[0].is_file());
        assert_eq!(parts[0].name(), Some("title"));
        assert!(parts[1].is_file());

        assert_eq!(
            extract_single_file(&body, BOUNDARY),
            Err(MultipartError::UnsupportedParts { count: 2 })
        );
    }

    #[test]
    fn test_no_parts() {
        let body = Bytes::from(format!("--{}--\r\n", BOUNDARY));
        assert_eq!(
            extract_single_file(&body, BOUNDARY),
            Err(MultipartError::NoParts)
        );
    }

    #[test]
    fn test_garbage_after_delimiter() {
        let body = Bytes::from(format!("--{}garbage\r\n", BOUNDARY));
        assert!(matches!(
            parse_parts(&body, BOUNDARY),
            Err(MultipartError::MalformedDelimiter { .. })
        ));
    }

    #[test]
    fn test_payload_is_zero_copy_slice() {
        let body = file_body("a.png", "image/png", b"PNGDATA");
        let file = extract_single_file(&body, BOUNDARY).unwrap();

        let body_range = body.as_ptr() as usize..body.as_ptr() as usize + body.len();
        assert!(body_range.contains(&(file.payload.as_ptr() as usize)));
    }
}
