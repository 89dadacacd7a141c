use std::io::{self, Write};

const LINE_WIDTH: usize = 16;

fn format_line(offset: u64, chunk: &[u8]) -> String {
    let hexs: String = chunk.iter().map(|b| format!("{:02x} ", b)).collect();
    let ascii: String = chunk
        .iter()
        .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
        .collect();
    format!("{:08x}  {:<48}  |{}|\n", offset, hexs, ascii)
}

/// A sink adapter that renders everything written to it as hex dump lines:
/// an 8-digit offset, up to 16 bytes in hex, then the printable ASCII.
///
/// A complete line is pushed to the inner writer on the next write or on
/// `flush`. Call [`finish`] to emit the trailing partial line; dropping the
/// writer discards it.
///
/// [`finish`]: HexDumpWriter::finish
pub struct HexDumpWriter<W: Write> {
    inner: W,
    offset: u64,
    line: Vec<u8>,
}

impl<W: Write> HexDumpWriter<W> {
    pub fn new(inner: W, start_offset: u64) -> Self {
        Self {
            inner,
            offset: start_offset,
            line: Vec::with_capacity(LINE_WIDTH),
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if !self.line.is_empty() {
            self.write_line()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    // `line` is only cleared once the inner writer took the whole line.
    fn write_line(&mut self) -> io::Result<()> {
        self.inner.write_all(format_line(self.offset, &self.line).as_bytes())?;
        self.offset += self.line.len() as u64;
        self.line.clear();
        Ok(())
    }
}

impl<W: Write> Write for HexDumpWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut consumed = 0;
        for &b in buf {
            if self.line.len() == LINE_WIDTH {
                if let Err(e) = self.write_line() {
                    return if consumed == 0 { Err(e) } else { Ok(consumed) };
                }
            }
            self.line.push(b);
            consumed += 1;
        }
        Ok(consumed)
    }

    // A partial line waits for more bytes or `finish`.
    fn flush(&mut self) -> io::Result<()> {
        if self.line.len() == LINE_WIDTH {
            self.write_line()?;
        }
        self.inner.flush()
    }
}
