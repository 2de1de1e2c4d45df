//! PasteQueue - Native messaging host
//!
//! Serves router commands to the browser extension over stdio. Each message is
//! a 4-byte little-endian length followed by that many bytes of UTF-8 JSON.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::{Command, Response, RouterHandle};

/// Largest request the browser will send to a host (64 MiB)
pub const MAX_INBOUND_LEN: u32 = 64 * 1024 * 1024;

/// Largest reply the browser accepts from a host (1 MiB)
pub const MAX_OUTBOUND_LEN: usize = 1024 * 1024;

/// Host error type
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Message of {0} bytes exceeds limit")]
    MessageTooLarge(usize),
}

/// Read one framed message. `None` on a clean end of stream.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Vec<u8>>, HostError>
where
    R: AsyncRead + Unpin,
{
    read_message_limited(reader, MAX_INBOUND_LEN).await
}

/// An oversized body is skipped so the next frame still lines up
async fn read_message_limited<R>(reader: &mut R, limit: u32) -> Result<Option<Vec<u8>>, HostError>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32_le().await {
        Ok(len) => len,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if len > limit {
        let mut body = (&mut *reader).take(len as u64);
        let skipped = tokio::io::copy(&mut body, &mut tokio::io::sink()).await?;
        if skipped < len as u64 {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
        return Err(HostError::MessageTooLarge(len as usize));
    }

    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Write one framed reply. A reply the browser would refuse is replaced by a
/// failure response.
pub async fn write_message<W>(writer: &mut W, response: &Response) -> Result<(), HostError>
where
    W: AsyncWrite + Unpin,
{
    let mut body = serde_json::to_vec(response)?;
    if body.len() > MAX_OUTBOUND_LEN {
        log::warn!("[Host] Reply of {} bytes exceeds limit", body.len());
        body = serde_json::to_vec(&Response::failed(format!(
            "Response of {} bytes exceeds limit",
            body.len()
        )))?;
    }
    writer.write_u32_le(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Answer requests until the extension closes the stream
///
/// A request that does not parse or is too large gets a failure response; the
/// host keeps serving. IO errors end the session.
pub async fn serve<R, W>(router: &RouterHandle, reader: &mut R, writer: &mut W) -> Result<(), HostError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    log::info!("[Host] Serving native messaging requests");
    loop {
        let body = match read_message(reader).await {
            Ok(Some(body)) => body,
            Ok(None) => break,
            Err(HostError::MessageTooLarge(len)) => {
                log::warn!("[Host] Skipped request of {} bytes", len);
                let response = Response::failed(format!("Request of {} bytes exceeds limit", len));
                write_message(writer, &response).await?;
                continue;
            }
            Err(e) => return Err(e),
        };
        let response = match serde_json::from_slice::<Command>(&body) {
            Ok(command) => match router.request(command).await {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("[Host] {}", e);
                    Response::failed(e.to_string())
                }
            },
            Err(e) => {
                log::warn!("[Host] Rejected request: {}", e);
                Response::failed(format!("Invalid request: {}", e))
            }
        };
        write_message(writer, &response).await?;
    }
    log::info!("[Host] Extension closed the connection");
    Ok(())
}
