//! Stdio transport with LSP header framing.
//!
//! LSP frames each message over stdio as:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{ChildStdin, ChildStdout};

use crate::error::TransportError;

/// Transport over the spawned server's stdio handles.
pub type StdioTransport = FramedTransport<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

impl StdioTransport {
    /// Creates a transport from the child process handles.
    #[must_use]
    pub fn from_child_io(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self::new(BufReader::new(stdout), BufWriter::new(stdin))
    }
}

/// Reads and writes LSP-framed messages over any reader/writer pair.
///
/// Generic so tests can drive the production framing code over in-memory
/// buffers while the session uses child-process stdio.
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> FramedTransport<R, W> {
    /// Wraps a reader/writer pair.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Sends one framed message.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` when writing to the peer fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let header = format!("Content-Length: {}\r\n\r\n", message.len());
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Receives one framed message, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::MissingContentLength` when the headers carry
    /// no `Content-Length`, and `TransportError::Io` when reading fails or
    /// the peer closes the stream mid-message.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Reads header lines up to the blank separator and extracts the
    /// `Content-Length` value.
    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length: Option<usize> = None;

        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }

            if let Some(value) = trimmed.strip_prefix("Content-Length: ") {
                content_length = Some(value.parse().map_err(|_| TransportError::InvalidHeader)?);
            }
            // Other headers (e.g. Content-Type) are ignored.
        }

        content_length.ok_or(TransportError::MissingContentLength)
    }
}
