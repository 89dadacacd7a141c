use crate::error::RangeError;
use std::fmt;

/// Half-open byte interval `[begin, end)` with `begin < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    begin: u64,
    end: u64,
}

impl ByteRange {
    pub fn new(begin: i64, end: i64) -> Result<Self, RangeError> {
        if begin < 0 {
            return Err(RangeError::NegativeBegin);
        }
        if end <= begin {
            return Err(RangeError::EndNotAfterBegin);
        }
        Ok(Self {
            begin: begin as u64,
            end: end as u64,
        })
    }

    /// Parse the textual `BEGIN` and `END` arguments.
    ///
    /// Each argument only needs to start with a decimal integer: `"12k"` reads
    /// as 12 and values too large for `i64` saturate.
    ///
    /// Both arguments are checked for being integers before the shape of the
    /// range is looked at, so `parse("x", "-1")` reports `BEGIN`, not the sign.
    pub fn parse(begin: &str, end: &str) -> Result<Self, RangeError> {
        let begin = parse_offset(begin).ok_or(RangeError::BeginNotInteger)?;
        let end = parse_offset(end).ok_or(RangeError::EndNotInteger)?;
        Self::new(begin, end)
    }

    pub fn begin(&self) -> u64 {
        self.begin
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes requested. Never zero.
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

// Decimal prefix parse: leading whitespace, optional sign, then the longest run
// of digits. Trailing text is ignored and overflow saturates. Only a missing
// digit run is an error.
fn parse_offset(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let run = digits.bytes().take_while(u8::is_ascii_digit).count();
    if run == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for d in digits[..run].bytes() {
        let d = i64::from(d - b'0');
        let next = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(d) } else { v.checked_add(d) });
        match next {
            Some(v) => value = v,
            None => return Some(if negative { i64::MIN } else { i64::MAX }),
        }
    }
    Some(value)
}
