use byterange::{ByteRange, CopyError, HexDumpWriter, RangeCopier};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Yields `fail_after` bytes of its data, then every read fails.
struct FlakySource {
    inner: Cursor<Vec<u8>>,
    fail_after: u64,
}

impl Read for FlakySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let pos = self.inner.position();
        if pos >= self.fail_after {
            return Err(io::Error::other("device went away"));
        }
        let room = (self.fail_after - pos) as usize;
        let n = buf.len().min(room);
        self.inner.read(&mut buf[..n])
    }
}

impl Seek for FlakySource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Accepts `budget` bytes, then reports that nothing more fits.
struct CrampedSink {
    taken: Vec<u8>,
    budget: usize,
}

impl Write for CrampedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.budget - self.taken.len());
        self.taken.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn data() -> Vec<u8> {
    (0u8..100).collect()
}

#[test]
fn read_failure_emits_prefix_then_fails() {
    let mut src = FlakySource {
        inner: Cursor::new(data()),
        fail_after: 22,
    };
    let mut out = Vec::new();
    let mut copier = RangeCopier::with_capacity(8);

    let err = copier
        .copy(&mut src, &mut out, ByteRange::new(2, 90).unwrap())
        .unwrap_err();

    match err {
        CopyError::ShortRead { wanted, got, .. } => {
            assert_eq!(wanted, 8);
            assert_eq!(got, 4);
        }
        other => panic!("expected short read, got {other:?}"),
    }
    // Everything read before the failure reached the sink, in order.
    assert_eq!(out, &data()[2..22]);
}

#[test]
fn read_failure_in_tail_chunk() {
    let mut src = FlakySource {
        inner: Cursor::new(data()),
        fail_after: 13,
    };
    let mut out = Vec::new();
    let mut copier = RangeCopier::with_capacity(64);

    let err = copier
        .copy(&mut src, &mut out, ByteRange::new(10, 20).unwrap())
        .unwrap_err();

    assert!(matches!(err, CopyError::ShortRead { wanted: 10, got: 3, .. }));
    assert_eq!(out, &data()[10..13]);
}

#[test]
fn sink_that_fills_up_is_a_short_write() {
    let mut src = Cursor::new(data());
    let mut sink = CrampedSink {
        taken: Vec::new(),
        budget: 5,
    };
    let mut copier = RangeCopier::with_capacity(8);

    let err = copier
        .copy(&mut src, &mut sink, ByteRange::new(0, 16).unwrap())
        .unwrap_err();

    assert!(matches!(err, CopyError::ShortWrite { wanted: 8, written: 5 }));
    assert_eq!(sink.taken, &data()[..5]);
}

#[test]
fn sink_error_is_propagated() {
    let mut src = Cursor::new(data());
    let err = RangeCopier::new()
        .copy(&mut src, &mut BrokenPipe, ByteRange::new(0, 16).unwrap())
        .unwrap_err();

    match err {
        CopyError::Write(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected write error, got {other:?}"),
    }
}

#[test]
fn stream_starts_at_current_position() {
    let mut src = Cursor::new(data());
    src.set_position(50);
    let mut out = Vec::new();

    // Range only sets the length here; no seek happens.
    let t = RangeCopier::new()
        .stream(&mut src, &mut out, ByteRange::new(0, 5).unwrap())
        .unwrap();

    assert_eq!(out, &data()[50..55]);
    assert_eq!(t.copied, 5);
}

#[test]
fn hex_rendering_keeps_prefix_after_read_failure() {
    let mut src = FlakySource {
        inner: Cursor::new(data()),
        fail_after: 22,
    };
    let mut out = Vec::new();
    let mut copier = RangeCopier::with_capacity(8);

    let err = copier
        .copy_hex(&mut src, &mut out, ByteRange::new(2, 90).unwrap())
        .unwrap_err();
    assert!(matches!(err, CopyError::ShortRead { .. }), "got {err:?}");

    let out = String::from_utf8(out).unwrap();
    assert_eq!(
        out,
        format!(
            "00000002  02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 10 11   |................|\n\
             00000012  {:<48}  |....|\n",
            "12 13 14 15 "
        )
    );
}

/// Accepts `writes_left` writes, then fails every write.
struct GivesOut {
    taken: Vec<u8>,
    writes_left: usize,
}

impl Write for GivesOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.writes_left == 0 {
            return Err(io::Error::other("no space left"));
        }
        self.writes_left -= 1;
        self.taken.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn read_failure_outranks_failure_to_finish_hex_dump() {
    let mut src = FlakySource {
        inner: Cursor::new(data()),
        fail_after: 22,
    };
    // Room for the first full line only; the trailing line cannot be written.
    let mut sink = GivesOut {
        taken: Vec::new(),
        writes_left: 1,
    };

    let err = RangeCopier::with_capacity(8)
        .copy_hex(&mut src, &mut sink, ByteRange::new(2, 90).unwrap())
        .unwrap_err();

    assert!(matches!(err, CopyError::ShortRead { .. }), "got {err:?}");
    assert!(String::from_utf8(sink.taken).unwrap().ends_with("|................|\n"));
}

#[test]
fn hex_writer_adapts_any_sink() {
    let mut src = Cursor::new(data());
    let mut dump = HexDumpWriter::new(Vec::new(), 65);
    RangeCopier::new()
        .copy(&mut src, &mut dump, ByteRange::new(65, 68).unwrap())
        .unwrap();
    let out = String::from_utf8(dump.finish().unwrap()).unwrap();
    assert_eq!(out, format!("00000041  {:<48}  |ABC|\n", "41 42 43 "));
}
