//! Length-prefixed frame streams.
//!
//! Stream transports carry one frame per record:
//!
//! ```text
//! +----------------+--------------------+
//! | length (4 BE)  |  protobuf Frame    |
//! +----------------+--------------------+
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::MAX_FRAME_SIZE;
use crate::codec::{decode_frame, encode_frame};
use crate::error::{ProtocolError, ProtocolResult};
use crate::messages::Frame;

/// Prefixes already-encoded frame bytes with their length.
pub fn length_prefixed(body: &[u8]) -> ProtocolResult<Vec<u8>> {
    if body.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: body.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    let mut buffer = Vec::with_capacity(4 + body.len());
    buffer.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buffer.extend_from_slice(body);
    Ok(buffer)
}

/// Reads framed messages from a byte stream.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the raw body of the next record.
    ///
    /// Returns `Ok(None)` on EOF before a length prefix.
    pub async fn read_body(&mut self) -> ProtocolResult<Option<Vec<u8>>> {
        let mut len_buf = [0u8; 4];
        match self.reader.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_SIZE,
            });
        }
        if len == 0 {
            return Err(ProtocolError::EmptyFrame);
        }

        let mut body = vec![0u8; len];
        self.reader.read_exact(&mut body).await?;
        Ok(Some(body))
    }

    /// Reads and decodes the next frame.
    pub async fn read_frame(&mut self) -> ProtocolResult<Option<Frame>> {
        match self.read_body().await? {
            Some(body) => Ok(Some(decode_frame(&body)?)),
            None => Ok(None),
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Writes framed messages to a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes already-encoded frame bytes as one record.
    pub async fn write_body(&mut self, body: &[u8]) -> ProtocolResult<()> {
        let data = length_prefixed(body)?;
        self.writer.write_all(&data).await?;
        Ok(())
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> ProtocolResult<()> {
        let body = encode_frame(frame)?;
        self.write_body(&body).await
    }

    pub async fn flush(&mut self) -> ProtocolResult<()> {
        self.writer.flush().await?;
        Ok(())
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
