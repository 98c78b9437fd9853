use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use url::form_urlencoded;

const FILE_CHUNK_SIZE: usize = 4096;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// GET query string or `application/x-www-form-urlencoded` body.
    UrlEncoded,
    /// `multipart/form-data`: values travel raw inside their part.
    Multipart,
}

/// Request body ready to be written to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EncodedBody {
    pub fn url_encoded(params: &[(String, String)]) -> Self {
        Self {
            content_type: FORM_CONTENT_TYPE.to_owned(),
            bytes: query_string(params).into_bytes(),
        }
    }

    pub fn multipart(
        params: &[(String, String)],
        files: &[PathBuf],
        charset: &str,
    ) -> Result<Self, EncodeError> {
        let boundary = generate_boundary();
        let bytes = multipart_body(params, files, charset, &boundary)?;
        Ok(Self {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            bytes,
        })
    }
}

pub fn encode_value(value: &str, kind: BodyKind) -> String {
    match kind {
        BodyKind::UrlEncoded => form_urlencoded::byte_serialize(value.as_bytes()).collect(),
        BodyKind::Multipart => value.to_owned(),
    }
}

/// `key=value` pairs joined by `&`, percent-encoded.
pub fn query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_value(key, BodyKind::UrlEncoded),
                encode_value(value, BodyKind::UrlEncoded)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn generate_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("----------{nanos:x}")
}

/// Files first (`File1`, `File2`, ...), then parameters, both in input order.
pub fn multipart_body(
    params: &[(String, String)],
    files: &[PathBuf],
    charset: &str,
    boundary: &str,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();

    for (idx, path) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        push_part_header(
            &mut out,
            boundary,
            &format!("name=\"File{}\"; filename=\"{filename}\"", idx + 1),
            "application/octet-stream",
        );
        append_file(&mut out, path)?;
        out.extend_from_slice(b"\r\n");
    }

    let text_type = format!("text/plain; charset=\"{charset}\"");
    for (key, value) in params {
        push_part_header(&mut out, boundary, &format!("name=\"{key}\""), &text_type);
        out.extend_from_slice(encode_value(value, BodyKind::Multipart).as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(out)
}

fn push_part_header(out: &mut Vec<u8>, boundary: &str, disposition: &str, content_type: &str) {
    out.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; {disposition}\r\n\
             Content-Type: {content_type}\r\n\
             Content-Transfer-Encoding: binary\r\n\
             \r\n"
        )
        .as_bytes(),
    );
}

fn append_file(out: &mut Vec<u8>, path: &Path) -> Result<(), EncodeError> {
    let attachment_error = |source| EncodeError::Attachment {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(attachment_error)?;
    copy_chunked(file, out).map_err(attachment_error)
}

fn copy_chunked<R: Read>(mut reader: R, out: &mut Vec<u8>) -> io::Result<()> {
    let mut buffer = [0u8; FILE_CHUNK_SIZE];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(read) => out.extend_from_slice(&buffer[..read]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}
