//! Owned File Handle: RAII wrapper di atas native file descriptor
//!
//! Semua syscall yang bisa kena interrupt di-retry selama errno == EINTR
//! dan belum ada byte yang ditransfer. Interrupt setelah partial transfer
//! muncul sebagai hasil pendek biasa, sesuai kontrak `ReadResource`.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::path::Path;

use libc::{c_int, c_uint};

use crate::error::{IoError, IoResult};
use crate::io::{ReadResource, WriteResource};

/// Retry syscall selama gagal dengan EINTR.
///
/// Return value negatif selain EINTR diteruskan apa adanya; errno masih
/// valid saat fungsi ini return, jadi caller bisa langsung capture.
pub(crate) fn retry_eintr<F>(mut syscall: F) -> isize
where
    F: FnMut() -> isize,
{
    loop {
        let res = syscall();
        if res >= 0 {
            return res;
        }
        if io::Error::last_os_error().raw_os_error() != Some(libc::EINTR) {
            return res;
        }
    }
}

/// Konversi path ke CString untuk syscall
pub(crate) fn cstring(path: &Path, op: &'static str) -> IoResult<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        IoError::new(
            op,
            io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL byte"),
        )
    })
}

/// Flag untuk open/create - bit-set yang bisa dikombinasi dengan `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode(c_int);

impl Mode {
    pub const CREATE: Mode = Mode(libc::O_CREAT);
    pub const WRITE_ONLY: Mode = Mode(libc::O_WRONLY);
    pub const READ_ONLY: Mode = Mode(libc::O_RDONLY);
    pub const READ_WRITE: Mode = Mode(libc::O_RDWR);
    pub const TRUNCATE: Mode = Mode(libc::O_TRUNC);
    /// File anonim: ada storage dan descriptor, tanpa entry di namespace
    pub const TMPFILE: Mode = Mode(libc::O_TMPFILE);
    /// Alias historis untuk NONBLOCK - bit yang sama
    pub const NDELAY: Mode = Mode(libc::O_NDELAY);
    pub const NONBLOCK: Mode = Mode(libc::O_NONBLOCK);

    #[inline]
    pub const fn bits(self) -> c_int {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Mode {
    type Output = Mode;

    #[inline]
    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Mode {
    #[inline]
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

/// Permission bits untuk file baru
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perms(libc::mode_t);

impl Perms {
    /// Default: owner read/write, group dan other read (0644)
    pub const DEFAULT: Perms = Perms(0o644);

    #[inline]
    pub const fn new(bits: libc::mode_t) -> Self {
        Perms(bits)
    }

    #[inline]
    pub const fn bits(self) -> libc::mode_t {
        self.0
    }
}

impl Default for Perms {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Origin untuk seek
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolut dari awal file
    Set,
    /// Relatif terhadap posisi sekarang
    Current,
    /// Relatif terhadap akhir file
    End,
}

impl Whence {
    #[inline]
    fn as_raw(self) -> c_int {
        match self {
            Whence::Set => libc::SEEK_SET,
            Whence::Current => libc::SEEK_CUR,
            Whence::End => libc::SEEK_END,
        }
    }
}

/// Owner tunggal dari sebuah native file descriptor
///
/// Move-only: tidak ada Clone, jadi invariant "satu fd hidup = satu owner"
/// dijaga oleh type system. Descriptor ditutup saat drop.
#[derive(Debug)]
pub struct FileDesc {
    fd: RawFd,
}

impl FileDesc {
    const INVALID: RawFd = -1;

    /// Apakah handle masih memegang descriptor
    #[inline]
    pub fn is_open(&self) -> bool {
        self.fd != Self::INVALID
    }

    /// Tutup descriptor sekarang. Idempotent; no-op untuk handle invalid.
    pub fn close(&mut self) {
        if self.fd != Self::INVALID {
            let fd = std::mem::replace(&mut self.fd, Self::INVALID);
            // SAFETY: fd valid dan kita owner tunggalnya
            unsafe { libc::close(fd) };
        }
    }

    /// Lock exclusive, blocking sampai dapat
    pub fn lock(&self) -> IoResult<()> {
        self.flock(libc::LOCK_EX)
    }

    /// Lock shared, blocking sampai dapat
    pub fn lock_shared(&self) -> IoResult<()> {
        self.flock(libc::LOCK_SH)
    }

    /// Coba lock exclusive tanpa blocking.
    ///
    /// `Ok(false)` artinya lock sedang dipegang pihak lain - outcome
    /// normal, bukan error.
    pub fn try_lock(&self) -> IoResult<bool> {
        self.flock_nb(libc::LOCK_EX)
    }

    /// Coba lock shared tanpa blocking
    pub fn try_lock_shared(&self) -> IoResult<bool> {
        self.flock_nb(libc::LOCK_SH)
    }

    /// Lepas lock (exclusive maupun shared)
    pub fn unlock(&self) -> IoResult<()> {
        self.flock(libc::LOCK_UN)
    }

    fn flock(&self, op: c_int) -> IoResult<()> {
        let fd = self.fd;
        // SAFETY: flock hanya membaca fd, tidak menyentuh memory kita
        let res = retry_eintr(|| unsafe { libc::flock(fd, op) } as isize);
        if res < 0 {
            return Err(IoError::last_os("flock"));
        }
        Ok(())
    }

    fn flock_nb(&self, op: c_int) -> IoResult<bool> {
        let fd = self.fd;
        // SAFETY: sama dengan flock di atas
        let res = retry_eintr(|| unsafe { libc::flock(fd, op | libc::LOCK_NB) } as isize);
        if res == 0 {
            return Ok(true);
        }
        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
            // Lock sedang dipegang: expected outcome
            Ok(false)
        } else {
            Err(IoError::new("flock", err))
        }
    }
}

impl Drop for FileDesc {
    fn drop(&mut self) {
        self.close();
    }
}

impl AsRawFd for FileDesc {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl FromRawFd for FileDesc {
    /// SAFETY kontrak: caller menjamin `fd` valid dan belum punya owner lain
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl IntoRawFd for FileDesc {
    /// Serahkan descriptor mentah; destructor tidak jalan lagi
    fn into_raw_fd(self) -> RawFd {
        let fd = self.fd;
        std::mem::forget(self);
        fd
    }
}

impl ReadResource for FileDesc {
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize> {
        let fd = self.fd;
        let ptr = dest.as_mut_ptr();
        let len = dest.len();
        // SAFETY: ptr/len datang dari slice valid; kernel menulis maksimal len bytes
        let res = retry_eintr(|| unsafe { libc::read(fd, ptr.cast(), len) });
        if res < 0 {
            return Err(IoError::last_os("read"));
        }
        Ok(res as usize)
    }
}

impl WriteResource for FileDesc {
    fn write(&mut self, src: &[u8]) -> IoResult<usize> {
        let fd = self.fd;
        let ptr = src.as_ptr();
        let len = src.len();
        // SAFETY: ptr/len datang dari slice valid; kernel hanya membaca
        let res = retry_eintr(|| unsafe { libc::write(fd, ptr.cast(), len) });
        if res < 0 {
            return Err(IoError::last_os("write"));
        }
        Ok(res as usize)
    }
}

/// Buka atau buat file di `path`
pub fn open(path: &Path, mode: Mode, perms: Perms) -> IoResult<FileDesc> {
    let c_path = cstring(path, "open")?;
    let res = retry_eintr(|| {
        // SAFETY: c_path NUL-terminated; mode dan perms adalah plain bits
        unsafe { libc::open(c_path.as_ptr(), mode.bits(), c_uint::from(perms.bits())) as isize }
    });
    if res < 0 {
        return Err(IoError::new(
            format!("open {}", path.display()),
            io::Error::last_os_error(),
        ));
    }
    // SAFETY: fd baru dari open(2), belum ada owner lain
    Ok(unsafe { FileDesc::from_raw_fd(res as RawFd) })
}

/// Buka file anonim di dalam `dir`: punya storage tapi tanpa nama.
///
/// Harus di directory yang satu filesystem dengan destination akhirnya
/// kalau file ini nanti mau di-publish lewat [`PendingFile`].
///
/// [`PendingFile`]: crate::fs::PendingFile
pub fn open_anonymous(dir: &Path, mode: Mode, perms: Perms) -> IoResult<FileDesc> {
    open(dir, mode | Mode::TMPFILE, perms)
}

/// Paksa bytes yang sudah ditulis sampai ke durable storage
pub fn sync(fd: &FileDesc) -> IoResult<()> {
    let raw = fd.as_raw_fd();
    // SAFETY: fsync hanya membaca fd
    let res = retry_eintr(|| unsafe { libc::fsync(raw) } as isize);
    if res < 0 {
        return Err(IoError::last_os("fsync"));
    }
    Ok(())
}

/// Resize file ke `len` bytes
pub fn truncate(fd: &FileDesc, len: i64) -> IoResult<()> {
    let raw = fd.as_raw_fd();
    // SAFETY: ftruncate hanya menyentuh file, bukan memory kita
    let res = retry_eintr(|| unsafe { libc::ftruncate(raw, len as libc::off_t) } as isize);
    if res < 0 {
        return Err(IoError::last_os("ftruncate"));
    }
    Ok(())
}

/// Pindahkan cursor baca/tulis; return posisi absolut hasilnya
pub fn seek(fd: &FileDesc, offset: i64, whence: Whence) -> IoResult<u64> {
    // SAFETY: lseek hanya mengubah state cursor di kernel
    let res = unsafe { libc::lseek(fd.as_raw_fd(), offset as libc::off_t, whence.as_raw()) };
    if res < 0 {
        return Err(IoError::last_os("lseek"));
    }
    Ok(res as u64)
}
