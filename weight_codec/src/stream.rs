//! File access shared by weight readers and writers.
//!
//! The path `-` maps to stdin/stdout and a `.zst` extension adds zstd
//! (de)compression.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use zstd::stream::write::Encoder;

const STDIO_PATH: &str = "-";
const ZSTD_EXTENSION: &str = "zst";

/// Opens `path` for reading.
pub fn open_reader(path: &Path) -> io::Result<Box<dyn Read>> {
    let source: Box<dyn Read> = if is_stdio(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(path)?)
    };
    if is_zstd(path) {
        Ok(Box::new(zstd::stream::read::Decoder::new(source)?))
    } else {
        Ok(source)
    }
}

/// Buffered output that reports flush and compression errors on [`finish`](Self::finish).
pub struct WeightSink {
    inner: SinkInner,
}

enum SinkInner {
    Plain(BufWriter<Box<dyn Write>>),
    Zstd(Encoder<'static, BufWriter<Box<dyn Write>>>),
}

impl WeightSink {
    /// Creates (or truncates) `path` for writing.
    pub fn create(path: &Path) -> io::Result<Self> {
        let target: Box<dyn Write> = if is_stdio(path) {
            Box::new(io::stdout().lock())
        } else {
            Box::new(File::create(path)?)
        };
        let buffered = BufWriter::new(target);
        let inner = if is_zstd(path) {
            SinkInner::Zstd(Encoder::new(buffered, 0)?)
        } else {
            SinkInner::Plain(buffered)
        };
        Ok(Self { inner })
    }

    /// Completes the stream and flushes every layer.
    pub fn finish(self) -> io::Result<()> {
        match self.inner {
            SinkInner::Plain(mut writer) => writer.flush(),
            SinkInner::Zstd(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for WeightSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            SinkInner::Plain(writer) => writer.write(buf),
            SinkInner::Zstd(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            SinkInner::Plain(writer) => writer.flush(),
            SinkInner::Zstd(encoder) => encoder.flush(),
        }
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

fn is_zstd(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ZSTD_EXTENSION)
}
