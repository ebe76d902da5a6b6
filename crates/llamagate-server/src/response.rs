//! HTTP response shaping and serialization.
//!
//! Three primitives cover the whole API surface: a buffered JSON writer
//! with an exact `Content-Length`, a chunked-transfer writer for the
//! NDJSON streaming shape, and the CORS preflight short-circuit. Every
//! response carries `Access-Control-Allow-Origin: *`.

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A fully-shaped response, ready to be serialized onto the socket.
#[derive(Debug)]
pub enum Response {
    /// Buffered JSON body with exact Content-Length.
    Json { status: u16, body: String },
    /// One NDJSON line delivered inside a chunked-transfer body.
    ///
    /// The protocol requires chunked framing even though exactly one chunk
    /// is produced today; an incremental generator would call the same
    /// writer once per token without changing the wire format.
    Chunked { body: String },
    /// 204 CORS preflight.
    NoContent,
}

impl Response {
    /// A JSON response with the given status.
    pub fn json(status: u16, body: String) -> Self {
        Response::Json { status, body }
    }

    /// The JSON error envelope: `{"error": "<message>"}`.
    pub fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Response::Json { status, body }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

/// Serialize a response onto the socket and flush it.
pub async fn write_response<W>(stream: &mut W, response: Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match response {
        Response::Json { status, body } => write_json(stream, status, &body).await,
        Response::Chunked { body } => write_chunked(stream, &body).await,
        Response::NoContent => write_preflight(stream).await,
    }
}

async fn write_json<W>(stream: &mut W, status: u16, body: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Content-Length: {}\r\n\
         \r\n",
        status,
        reason(status),
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await
}

/// Chunked transfer framing: size-in-hex CRLF, payload CRLF, zero chunk.
/// The payload is the body plus the NDJSON newline.
async fn write_chunked<W>(stream: &mut W, body: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = "HTTP/1.1 200 OK\r\n\
                Content-Type: application/x-ndjson\r\n\
                Access-Control-Allow-Origin: *\r\n\
                Transfer-Encoding: chunked\r\n\
                \r\n";
    stream.write_all(head.as_bytes()).await?;

    let chunk = format!("{body}\n");
    stream
        .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
        .await?;
    stream.write_all(chunk.as_bytes()).await?;
    stream.write_all(b"\r\n").await?;

    stream.write_all(b"0\r\n\r\n").await?;
    stream.flush().await
}

async fn write_preflight<W>(stream: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = "HTTP/1.1 204 No Content\r\n\
                Access-Control-Allow-Origin: *\r\n\
                Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
                Access-Control-Allow-Headers: Content-Type\r\n\
                Access-Control-Max-Age: 86400\r\n\
                \r\n";
    stream.write_all(head.as_bytes()).await?;
    stream.flush().await
}
