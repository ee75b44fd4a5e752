//! SHA-256 of downloaded files, computed inline while the body streams to disk.

use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// Wraps a writer and hashes everything that passes through it.
pub struct Sha256Writer<W: Write> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
}

impl<W: Write> Sha256Writer<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Returns the inner writer and the digest as lowercase hex.
    pub fn finish(self) -> (W, String) {
        let digest = self.hasher.finalize();
        (self.inner, hex::encode(digest))
    }
}

impl<W: Write> Write for Sha256Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
