use crate::error::{Error, Result};
use crate::util::ring_buffer::RingBuffer;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Stream `path` into `out` unmodified. Returns the number of bytes written.
pub fn cat(path: &Path, out: &mut impl Write) -> Result<u64> {
    let mut file = File::open(path).map_err(|e| Error::read(path, e))?;
    io::copy(&mut file, out).map_err(|e| Error::read(path, e))
}

/// The last `keep` lines of `path`, oldest first. Files shorter than `keep`
/// lines come back whole.
pub fn tail(path: &Path, keep: usize) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    let mut last = RingBuffer::new(keep)?;
    for line in BufReader::new(file).lines() {
        last.push(line.map_err(|e| Error::read(path, e))?);
    }
    let mut out = Vec::with_capacity(last.len());
    while let Some(line) = last.pop() {
        out.push(line);
    }
    Ok(out)
}
