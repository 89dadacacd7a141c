pub mod copier;
pub mod error;
pub mod hexdump;
pub mod range;

pub use copier::{BUFFER_SIZE, RangeCopier, Transfer, extract_range, extract_range_hex};
pub use error::{CopyError, Error, RangeError, Result};
pub use hexdump::HexDumpWriter;
pub use range::ByteRange;
