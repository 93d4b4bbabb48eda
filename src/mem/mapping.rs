//! Owned Memory Mapping: RAII wrapper di atas mapped region
//!
//! Region di-unmap saat owner di-drop - unconditional dan independent
//! dari file descriptor yang membuatnya (semantik POSIX: munmap tidak
//! peduli fd-nya masih terbuka atau tidak).

use std::io;
use std::ops::{Deref, DerefMut};
use std::os::unix::io::AsRawFd;

use memmap2::MmapOptions;

use crate::error::{IoError, IoResult};
use crate::fs::FileDesc;

/// Sharing mode untuk mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sharing {
    /// Copy-on-write privat: mutasi tidak pernah sampai ke backing file
    Private,
    /// Shared dengan backing file: mutasi (pada mapping mutable) tembus ke file
    Shared,
}

fn options(offset: u64, len: usize) -> IoResult<MmapOptions> {
    if len == 0 {
        // mmap(2) dengan length 0 adalah EINVAL; tolak deterministik di sini
        return Err(IoError::new(
            "mmap",
            io::Error::from_raw_os_error(libc::EINVAL),
        ));
    }
    let mut opts = MmapOptions::new();
    opts.offset(offset).len(len);
    Ok(opts)
}

/// Mapped region read-only
///
/// Tidak ada jalan ke `&mut [u8]` dari type ini - refusal mutasi terjadi
/// di compile time, bukan SIGSEGV di runtime.
#[derive(Debug)]
pub struct Mapping {
    map: memmap2::Mmap,
}

impl Mapping {
    /// Map `len` bytes mulai `offset` dari file di belakang `fd`
    pub fn new(fd: &FileDesc, offset: u64, len: usize, sharing: Sharing) -> IoResult<Self> {
        let opts = options(offset, len)?;
        // SAFETY: fd valid selama call ini; aliasing dengan penulis lain
        // ke file yang sama adalah tanggung jawab caller (lihat Sharing)
        let map = unsafe {
            match sharing {
                Sharing::Shared => opts.map(fd.as_raw_fd()),
                Sharing::Private => opts.map_copy_read_only(fd.as_raw_fd()),
            }
        }
        .map_err(|e| IoError::new("mmap", e))?;
        Ok(Self { map })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.map.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.map
    }
}

impl Deref for Mapping {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.map
    }
}

impl AsRef<[u8]> for Mapping {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.map
    }
}

/// Mapped region writable
#[derive(Debug)]
pub struct MappingMut {
    map: memmap2::MmapMut,
}

impl MappingMut {
    /// Map writable; `Shared` butuh fd yang dibuka read-write.
    ///
    /// Dengan `Sharing::Private`, tulisan hanya mengubah copy privat
    /// proses ini (copy-on-write), file aslinya tidak tersentuh.
    pub fn new(fd: &FileDesc, offset: u64, len: usize, sharing: Sharing) -> IoResult<Self> {
        let opts = options(offset, len)?;
        // SAFETY: sama dengan Mapping::new; untuk Shared, kernel menolak
        // sendiri fd yang tidak writable (EACCES)
        let map = unsafe {
            match sharing {
                Sharing::Shared => opts.map_mut(fd.as_raw_fd()),
                Sharing::Private => opts.map_copy(fd.as_raw_fd()),
            }
        }
        .map_err(|e| IoError::new("mmap", e))?;
        Ok(Self { map })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.map.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.map.as_mut_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.map
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.map
    }

    /// msync: dorong dirty pages ke backing file.
    ///
    /// Hanya bermakna untuk `Sharing::Shared`; pada mapping privat ini no-op
    /// terhadap file.
    pub fn flush(&self) -> IoResult<()> {
        self.map.flush().map_err(|e| IoError::new("msync", e))
    }
}

impl Deref for MappingMut {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.map
    }
}

impl DerefMut for MappingMut {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl AsRef<[u8]> for MappingMut {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.map
    }
}

impl AsMut<[u8]> for MappingMut {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }
}
