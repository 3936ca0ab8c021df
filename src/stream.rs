//! Input and output streams, with transparent (de)compression by extension
//!
//! Compressed files are piped through the matching command-line tool
//! (`gzip`, `bzip2`, `xz`, `zstd`) instead of being loaded into memory.
//! Every stream is released on drop, which for piped streams means the
//! helper process is stopped and reaped.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::config::Destination;
use crate::error::{MergeError, Result};
use crate::merge::{Delimiter, Source};

/// Per-source read buffer
const READ_BUFFER: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Compression::Gzip,
            Some("bz2") => Compression::Bzip2,
            Some("xz") => Compression::Xz,
            Some("zst") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Helper program that handles this codec, if any
    pub fn program(self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gzip"),
            Compression::Bzip2 => Some("bzip2"),
            Compression::Xz => Some("xz"),
            Compression::Zstd => Some("zstd"),
        }
    }
}

/// A readable input file, decompressed on the fly when needed
pub enum InputStream {
    Plain(File),
    Piped(PipedInput),
}

pub struct PipedInput {
    child: Child,
    stdout: ChildStdout,
}

impl InputStream {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let program = match Compression::from_path(path).program() {
            Some(program) => program,
            None => return Ok(InputStream::Plain(file)),
        };

        let mut child = Command::new(program)
            .arg("-dc")
            .stdin(Stdio::from(file))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| io::Error::new(e.kind(), format!("failed to start {}: {}", program, e)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, format!("failed to get {} stdout", program)))?;

        Ok(InputStream::Piped(PipedInput { child, stdout }))
    }
}

impl Read for InputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputStream::Plain(file) => file.read(buf),
            InputStream::Piped(piped) => piped.stdout.read(buf),
        }
    }
}

impl Drop for PipedInput {
    fn drop(&mut self) {
        // The helper may still be blocked writing to a pipe nobody reads
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Where merged rows go: stdout, a plain file, or a compressor feeding a file
pub enum OutputStream {
    Stdout(io::Stdout),
    File(File),
    Piped(PipedOutput),
}

pub struct PipedOutput {
    program: &'static str,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl OutputStream {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        let program = match Compression::from_path(path).program() {
            Some(program) => program,
            None => return Ok(OutputStream::File(file)),
        };

        let mut child = Command::new(program)
            .arg("-c")
            .stdin(Stdio::piped())
            .stdout(Stdio::from(file))
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| io::Error::new(e.kind(), format!("failed to start {}: {}", program, e)))?;
        let stdin = child.stdin.take();

        Ok(OutputStream::Piped(PipedOutput {
            program,
            child,
            stdin,
        }))
    }

    /// Open the configured destination, mapping failures to a sink error
    pub fn open(destination: &Destination) -> Result<Self> {
        match destination {
            Destination::Stdout => Ok(OutputStream::Stdout(io::stdout())),
            Destination::File(path) => {
                OutputStream::create(path).map_err(|e| MergeError::sink(path, e))
            }
        }
    }

    /// Flush everything and, for compressed output, wait for the compressor
    pub fn finish(mut self) -> io::Result<()> {
        self.flush()?;
        if let OutputStream::Piped(piped) = &mut self {
            drop(piped.stdin.take());
            let status = piped.child.wait()?;
            if !status.success() {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("{} exited with {}", piped.program, status),
                ));
            }
        }
        Ok(())
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Stdout(out) => out.write(buf),
            OutputStream::File(file) => file.write(buf),
            OutputStream::Piped(piped) => match piped.stdin.as_mut() {
                Some(stdin) => stdin.write(buf),
                None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "compressor input closed")),
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Stdout(out) => out.flush(),
            OutputStream::File(file) => file.flush(),
            OutputStream::Piped(piped) => match piped.stdin.as_mut() {
                Some(stdin) => stdin.flush(),
                None => Ok(()),
            },
        }
    }
}

impl Drop for PipedOutput {
    fn drop(&mut self) {
        // Closing stdin lets the compressor finish; then reap it
        drop(self.stdin.take());
        let _ = self.child.wait();
    }
}

/// How input paths become readable streams
pub trait StreamOpener {
    type Stream: Read;

    fn open(&self, path: &Path) -> io::Result<Self::Stream>;
}

/// Opens real files, decompressing by extension
#[derive(Debug, Default, Clone, Copy)]
pub struct FileOpener;

impl StreamOpener for FileOpener {
    type Stream = InputStream;

    fn open(&self, path: &Path) -> io::Result<Self::Stream> {
        InputStream::open(path)
    }
}

/// Open every input in order and load each one's first record
///
/// If input *k* fails to open, inputs `1..k-1` are dropped (closed) before
/// the error is returned.
pub fn open_sources<O: StreamOpener>(
    opener: &O,
    paths: &[PathBuf],
    delimiter: Delimiter,
) -> Result<Vec<Source<BufReader<O::Stream>>>> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let stream = opener.open(path).map_err(|e| MergeError::open(path, e))?;
        let reader = BufReader::with_capacity(READ_BUFFER, stream);
        sources.push(Source::new(path.display().to_string(), reader, delimiter));
    }
    Ok(sources)
}
