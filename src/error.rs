use std::io;
use std::path::PathBuf;

/// Rejected `BEGIN`/`END` arguments. Always raised before the source is opened.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("BEGIN is not an integer")]
    BeginNotInteger,
    #[error("END is not an integer")]
    EndNotInteger,
    #[error("invalid range: BEGIN should be non-negative")]
    NegativeBegin,
    #[error("invalid range: END should be larger than BEGIN")]
    EndNotAfterBegin,
}

/// Failures while opening, positioning, reading or writing.
#[derive(thiserror::Error, Debug)]
pub enum CopyError {
    #[error("open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("seek to offset {offset}: {source}")]
    Seek {
        offset: u64,
        #[source]
        source: io::Error,
    },
    #[error("short read: got {got} of {wanted} bytes: {source}")]
    ShortRead {
        wanted: usize,
        got: usize,
        #[source]
        source: io::Error,
    },
    #[error("short write: sink accepted {written} of {wanted} bytes")]
    ShortWrite { wanted: usize, written: usize },
    #[error("write: {0}")]
    Write(#[source] io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidArgument(#[from] RangeError),
    #[error(transparent)]
    Io(#[from] CopyError),
}

pub type Result<T> = std::result::Result<T, Error>;
