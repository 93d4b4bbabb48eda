//! In-Memory Byte Window: view non-owning yang menyusut dari depan
//!
//! Dipakai sebagai source/sink in-memory untuk testing dan komposisi,
//! lewat trait yang sama dengan file descriptor. Setiap read/write
//! mengkonsumsi bagian depan window; window tidak pernah melebihi
//! batas buffer aslinya dan tidak memiliki storage-nya.

use crate::error::IoResult;
use crate::io::traits::{ReadResource, WriteResource};

/// Window read-only di atas byte slice
#[derive(Debug, Clone, Copy)]
pub struct ByteWindow<'a> {
    data: &'a [u8],
}

impl<'a> ByteWindow<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Jumlah bytes yang masih bisa dibaca
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ReadResource for ByteWindow<'_> {
    #[inline]
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize> {
        let n = self.data.len().min(dest.len());
        dest[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Window mutable: bisa jadi source maupun sink
#[derive(Debug)]
pub struct ByteWindowMut<'a> {
    data: &'a mut [u8],
}

impl<'a> ByteWindowMut<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    /// Jumlah bytes yang masih bisa dibaca/ditulis
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Potong `n` bytes terdepan dari window, return slice-nya
    fn split_front(&mut self, n: usize) -> &'a mut [u8] {
        let data = std::mem::take(&mut self.data);
        let (front, rest) = data.split_at_mut(n);
        self.data = rest;
        front
    }
}

impl ReadResource for ByteWindowMut<'_> {
    #[inline]
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize> {
        let n = self.data.len().min(dest.len());
        dest[..n].copy_from_slice(&self.split_front(n)[..]);
        Ok(n)
    }
}

impl WriteResource for ByteWindowMut<'_> {
    #[inline]
    fn write(&mut self, src: &[u8]) -> IoResult<usize> {
        let n = self.data.len().min(src.len());
        self.split_front(n).copy_from_slice(&src[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_shrinks_from_front() {
        let mut window = ByteWindow::new(b"qwe rty");
        let mut buf = [0u8; 5];

        let n = window.read(&mut buf).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buf, b"qwe r");
        assert_eq!(window.remaining(), 2);

        let n = window.read(&mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..2], b"ty");
        assert!(window.is_empty());
    }

    #[test]
    fn test_exhausted_window_reads_zero_without_error() {
        let mut window = ByteWindow::new(b"ab");
        let mut buf = [0u8; 8];

        assert_eq!(window.read(&mut buf).unwrap(), 2);
        assert_eq!(window.read(&mut buf).unwrap(), 0);
        assert_eq!(window.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_zero_length_dest_consumes_nothing() {
        let mut window = ByteWindow::new(b"abc");
        let mut buf = [0u8; 0];

        assert_eq!(window.read(&mut buf).unwrap(), 0);
        assert_eq!(window.remaining(), 3);
    }

    #[test]
    fn test_write_truncates_to_remaining_capacity() {
        let mut storage = [0u8; 3];
        let mut window = ByteWindowMut::new(&mut storage);

        let n = window.write(b"abcdef").unwrap();
        assert_eq!(n, 3);
        assert!(window.is_empty());
        assert_eq!(window.write(b"xyz").unwrap(), 0);
        assert_eq!(&storage, b"abc");
    }

    #[test]
    fn test_mut_window_reads_too() {
        let mut storage = *b"hello";
        let mut window = ByteWindowMut::new(&mut storage);
        let mut buf = [0u8; 2];

        assert_eq!(window.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"he");
        assert_eq!(window.remaining(), 3);
    }

    #[test]
    fn test_interleaved_write_then_write() {
        let mut storage = [0u8; 6];
        let mut window = ByteWindowMut::new(&mut storage);

        assert_eq!(window.write(b"abc").unwrap(), 3);
        assert_eq!(window.write(b"def").unwrap(), 3);
        assert_eq!(&storage, b"abcdef");
    }
}
