//! Error type tunggal untuk semua operasi I/O
//!
//! Setiap failure membawa nama syscall yang gagal plus OS error code
//! aslinya, jadi diagnostik tidak kehilangan konteks saat error
//! di-propagate ke atas.

use std::borrow::Cow;
use std::io;

/// Result alias untuk seluruh crate
pub type IoResult<T> = Result<T, IoError>;

/// OS-level I/O failure dengan nama operasi yang gagal
///
/// Contoh display: `open /data/out.bin: No such file or directory (os error 2)`
#[derive(Debug, thiserror::Error)]
#[error("{op}: {source}")]
pub struct IoError {
    op: Cow<'static, str>,
    #[source]
    source: io::Error,
}

impl IoError {
    /// Bungkus `io::Error` yang sudah ada dengan nama operasi
    pub fn new(op: impl Into<Cow<'static, str>>, source: io::Error) -> Self {
        Self {
            op: op.into(),
            source,
        }
    }

    /// Capture errno saat ini - panggil LANGSUNG setelah syscall gagal,
    /// sebelum ada call lain yang bisa menimpa errno
    pub fn last_os(op: impl Into<Cow<'static, str>>) -> Self {
        Self::new(op, io::Error::last_os_error())
    }

    /// Nama operasi yang gagal (misal `"flock"`, `"linkat"`)
    pub fn op(&self) -> &str {
        &self.op
    }

    /// OS error code mentah, jika ada
    pub fn raw_os_error(&self) -> Option<i32> {
        self.source.raw_os_error()
    }

    /// Kind dari underlying `io::Error`
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Lepas underlying `io::Error`
    pub fn into_source(self) -> io::Error {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_op_and_os_error() {
        let err = IoError::new(
            "open /tmp/x",
            io::Error::from_raw_os_error(libc::ENOENT),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("open /tmp/x: "));
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    }

    #[test]
    fn test_kind_maps_from_errno() {
        let err = IoError::new("flock", io::Error::from_raw_os_error(libc::EWOULDBLOCK));
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert_eq!(err.op(), "flock");
    }
}
