//! Bounded streaming copy of a byte range from a seekable source into a sink.
//!
//! The copier reads through a single fixed-size buffer. A range that runs past
//! the end of the source is not an error: copying stops at end-of-file and the
//! bytes that existed are reported as a successful, truncated [`Transfer`].

use crate::{
    error::{CopyError, Result},
    hexdump::HexDumpWriter,
    range::ByteRange,
};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Default transfer buffer capacity, the usual platform `BUFSIZ`.
pub const BUFFER_SIZE: usize = 8192;

/// Outcome of a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub range: ByteRange,
    /// Bytes written to the sink.
    pub copied: u64,
    /// Whether the source ran out before the range was exhausted.
    pub reached_eof: bool,
}

impl Transfer {
    pub fn truncated(&self) -> bool {
        self.copied < self.range.len()
    }
}

/// Copies byte ranges through a buffer that is allocated once and reused.
pub struct RangeCopier {
    buf: Box<[u8]>,
}

impl Default for RangeCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeCopier {
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_SIZE)
    }

    /// A zero capacity is bumped to one byte.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Seek `src` to the start of `range` and copy the range into `sink`.
    pub fn copy<R, W>(
        &mut self,
        src: &mut R,
        sink: &mut W,
        range: ByteRange,
    ) -> std::result::Result<Transfer, CopyError>
    where
        R: Read + Seek + ?Sized,
        W: Write + ?Sized,
    {
        let offset = range.begin();
        src.seek(SeekFrom::Start(offset))
            .map_err(|source| CopyError::Seek { offset, source })?;
        debug!(offset, "positioned source");
        self.stream(src, sink, range)
    }

    /// Copy `range.len()` bytes from the current position of `src`.
    ///
    /// When a read fails part-way through a chunk, the bytes already read are
    /// written to `sink` before [`CopyError::ShortRead`] is returned, so the
    /// sink always holds an in-order prefix of the range.
    pub fn stream<R, W>(
        &mut self,
        src: &mut R,
        sink: &mut W,
        range: ByteRange,
    ) -> std::result::Result<Transfer, CopyError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut remaining = range.len();
        let mut copied = 0u64;
        let mut eof = false;

        while !eof && remaining > 0 {
            let want = usize::try_from(remaining).map_or(self.buf.len(), |r| r.min(self.buf.len()));
            let chunk = &mut self.buf[..want];
            let filled = fill(src, chunk);
            let got = filled.len;

            if let Some(source) = filled.error {
                warn!(wanted = want, got, copied, error = %source, "short read");
                if let Err(e) = emit(sink, &chunk[..got]) {
                    warn!(error = %e, "could not flush partial chunk");
                }
                return Err(CopyError::ShortRead { wanted: want, got, source });
            }

            emit(sink, &chunk[..got])?;
            trace!(got, remaining, "chunk copied");
            copied += got as u64;
            remaining -= got as u64;
            eof = filled.eof;
        }

        let transfer = Transfer {
            range,
            copied,
            reached_eof: eof,
        };
        if transfer.truncated() {
            debug!(%range, copied, "source ended inside the range");
        }
        Ok(transfer)
    }

    /// [`copy`](Self::copy) through a [`HexDumpWriter`] labelled from `range.begin()`.
    ///
    /// The dump is finished on the failure path too, so the rendered prefix is
    /// complete. A copy error takes precedence over an error while finishing.
    pub fn copy_hex<R, W>(
        &mut self,
        src: &mut R,
        sink: W,
        range: ByteRange,
    ) -> std::result::Result<Transfer, CopyError>
    where
        R: Read + Seek + ?Sized,
        W: Write,
    {
        let mut dump = HexDumpWriter::new(sink, range.begin());
        let result = self.copy(src, &mut dump, range);
        let finished = dump.finish();
        match result {
            Ok(transfer) => {
                finished.map_err(CopyError::Write)?;
                Ok(transfer)
            }
            Err(e) => {
                if let Err(fe) = finished {
                    warn!(error = %fe, "could not render trailing hex line");
                }
                Err(e)
            }
        }
    }
}

/// Open `path` and copy `range` of it into `sink`.
///
/// The file is closed when this returns, on success and on every error path.
///
/// ```no_run
/// use byterange::{ByteRange, extract_range};
///
/// fn main() -> anyhow::Result<()> {
///     let range = ByteRange::new(16, 48)?;
///     let mut out = std::io::stdout().lock();
///     let transfer = extract_range("disk.img", range, &mut out)?;
///     eprintln!("copied {} bytes", transfer.copied);
///     Ok(())
/// }
/// ```
pub fn extract_range<P, W>(path: P, range: ByteRange, sink: &mut W) -> Result<Transfer>
where
    P: AsRef<Path>,
    W: Write + ?Sized,
{
    let mut file = open_source(path.as_ref(), range)?;
    let transfer = RangeCopier::new().copy(&mut file, sink, range)?;
    debug!(copied = transfer.copied, reached_eof = transfer.reached_eof, "copy finished");
    Ok(transfer)
}

/// Open `path` and write `range` of it into `sink` as a hex dump.
pub fn extract_range_hex<P, W>(path: P, range: ByteRange, sink: W) -> Result<Transfer>
where
    P: AsRef<Path>,
    W: Write,
{
    let mut file = open_source(path.as_ref(), range)?;
    Ok(RangeCopier::new().copy_hex(&mut file, sink, range)?)
}

fn open_source(path: &Path, range: ByteRange) -> std::result::Result<File, CopyError> {
    let file = File::open(path).map_err(|source| CopyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %range, "opened source");
    Ok(file)
}

struct Fill {
    len: usize,
    eof: bool,
    error: Option<io::Error>,
}

// Read until `buf` is full, the source reports end-of-file, or a read fails.
fn fill<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> Fill {
    let mut len = 0;
    while len < buf.len() {
        match src.read(&mut buf[len..]) {
            Ok(0) => {
                return Fill {
                    len,
                    eof: true,
                    error: None,
                };
            }
            Ok(n) => len += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                return Fill {
                    len,
                    eof: false,
                    error: Some(e),
                };
            }
        }
    }
    Fill {
        len,
        eof: false,
        error: None,
    }
}

// Write all of `data`, then flush so the prefix is visible before any later failure.
fn emit<W: Write + ?Sized>(sink: &mut W, data: &[u8]) -> std::result::Result<(), CopyError> {
    let mut written = 0;
    while written < data.len() {
        match sink.write(&data[written..]) {
            Ok(0) => {
                return Err(CopyError::ShortWrite {
                    wanted: data.len(),
                    written,
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(CopyError::Write(e)),
        }
    }
    sink.flush().map_err(CopyError::Write)
}
