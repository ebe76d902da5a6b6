//! Minimal HTTP/1.1 request parsing off raw socket bytes.
//!
//! Exactly what the fixed API surface needs and nothing more: request line,
//! case-normalized headers, and a `Content-Length`-delimited body. One
//! request per connection, so there is no pipelining or keep-alive state to
//! track.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::ServerError;

/// One parsed inbound request. Ephemeral — lives for a single connection.
#[derive(Debug)]
pub struct Request {
    pub method: String,
    pub path: String,
    /// Header map with lowercased keys and trimmed values.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Parse the body as JSON. Malformed payloads become the 400 envelope.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ServerError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ServerError::MalformedRequest(e.to_string()))
    }
}

/// Failures while reading a request off the socket.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Connection closed (or blank) before a request line arrived.
    /// Closed silently, without a response.
    #[error("connection closed before a request line")]
    Empty,
    #[error("malformed request line")]
    BadRequestLine,
    #[error("invalid Content-Length header")]
    BadContentLength,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read one request: request line, headers until the blank line, then
/// exactly `Content-Length` body bytes.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 || line.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(ParseError::BadRequestLine)?.to_string();
    let path = parts.next().ok_or(ParseError::BadRequestLine)?.to_string();

    let mut headers = HashMap::new();
    let mut content_length = 0usize;
    loop {
        let mut header_line = String::new();
        let n = reader.read_line(&mut header_line).await?;
        if n == 0 {
            // EOF inside the header block: treat as end of headers.
            break;
        }
        let header_line = header_line.trim_end();
        if header_line.is_empty() {
            break;
        }
        if let Some((key, value)) = header_line.split_once(':') {
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if key == "content-length" {
                content_length = value
                    .parse()
                    .map_err(|_| ParseError::BadContentLength)?;
            }
            headers.insert(key, value);
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).await?;
    }

    Ok(Request {
        method,
        path,
        headers,
        body,
    })
}
