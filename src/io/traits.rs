//! Byte-Resource traits: customization point untuk generic I/O
//!
//! Kontrak kedua trait:
//! - Transfer pendek adalah hasil terminal yang valid, BUKAN error
//! - Return 0 hanya pada end-of-data (read) atau sink penuh (write)
//! - Interrupted-before-any-progress di-retry secara transparan di dalam
//!   impl; interrupted-after-partial dilaporkan sebagai hasil pendek biasa

use crate::error::IoResult;

/// Buffer size untuk streaming copy - tuned untuk typical transfer sizes
const COPY_BUFFER_SIZE: usize = 64 * 1024; // 64KB

/// Resource yang bisa menghasilkan bytes
pub trait ReadResource {
    /// Isi `dest` sebanyak yang tersedia sekarang, maksimal kapasitasnya.
    ///
    /// Returns jumlah bytes yang ditransfer; 0 berarti end-of-data.
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize>;
}

/// Resource yang bisa menerima bytes
pub trait WriteResource {
    /// Konsumsi `src` sebanyak yang resource bisa terima sekarang.
    ///
    /// Returns jumlah bytes yang ditransfer; 0 berarti sink penuh.
    fn write(&mut self, src: &[u8]) -> IoResult<usize>;
}

impl<R: ReadResource + ?Sized> ReadResource for &mut R {
    #[inline]
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize> {
        (**self).read(dest)
    }
}

impl<W: WriteResource + ?Sized> WriteResource for &mut W {
    #[inline]
    fn write(&mut self, src: &[u8]) -> IoResult<usize> {
        (**self).write(src)
    }
}

/// Baca berulang sampai `dest` penuh atau source habis.
///
/// Returns jumlah bytes yang benar-benar terisi; lebih kecil dari
/// `dest.len()` hanya jika source mencapai end-of-data.
pub fn read_full<R: ReadResource>(src: &mut R, dest: &mut [u8]) -> IoResult<usize> {
    let mut filled = 0;
    while filled < dest.len() {
        let n = src.read(&mut dest[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Tulis berulang sampai `src` habis atau sink berhenti menerima.
///
/// Returns jumlah bytes yang benar-benar dikonsumsi.
pub fn write_all<W: WriteResource>(sink: &mut W, src: &[u8]) -> IoResult<usize> {
    let mut consumed = 0;
    while consumed < src.len() {
        let n = sink.write(&src[consumed..])?;
        if n == 0 {
            break;
        }
        consumed += n;
    }
    Ok(consumed)
}

/// Streaming copy dari source ke sink lewat buffer internal.
///
/// Berhenti saat source end-of-data atau sink penuh.
/// Returns total bytes yang sampai di sink.
pub fn copy<R: ReadResource, W: WriteResource>(src: &mut R, sink: &mut W) -> IoResult<u64> {
    // Alokasi sekali di heap, bukan di stack (64KB terlalu besar untuk stack)
    let mut buf = vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice();
    let mut total = 0u64;

    loop {
        let n = src.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let written = write_all(sink, &buf[..n])?;
        total += written as u64;
        if written < n {
            break; // sink penuh sebelum chunk habis
        }
    }

    Ok(total)
}
