//! Transactional File Publisher: write-then-publish atomik
//!
//! Protokolnya:
//! 1. Buka file anonim (O_TMPFILE) di parent directory tujuan
//! 2. Tulis isi lewat descriptor - belum ada nama, tidak ada yang bisa lihat
//! 3. `commit()`: fsync dulu, lalu linkat descriptor ke nama tujuan
//!
//! Observer di path tujuan hanya pernah melihat dua state: tidak ada file,
//! atau file lengkap yang sudah durable. Tidak pernah partial write.
//! Drop tanpa commit = file anonim hilang begitu descriptor tertutup.

use std::path::{Path, PathBuf};

use std::io;
use std::os::unix::io::AsRawFd;

use crate::error::{IoError, IoResult};
use crate::fs::file::{cstring, open_anonymous, retry_eintr, sync, FileDesc, Mode, Perms};
use crate::io::{ReadResource, WriteResource};

/// File yang sedang ditulis tapi belum di-publish ke path tujuannya
#[derive(Debug)]
pub struct PendingFile {
    fd: FileDesc,
    dest: PathBuf,
}

impl PendingFile {
    /// Buka file anonim di parent directory dari `dest`.
    ///
    /// Parent harus ada; `dest` sendiri belum disentuh sama sekali.
    pub fn create(dest: impl Into<PathBuf>, mode: Mode, perms: Perms) -> IoResult<Self> {
        let dest = dest.into();
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                IoError::new(
                    "open_anonymous",
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "destination has no parent directory",
                    ),
                )
            })?;
        let fd = open_anonymous(parent, mode, perms)?;
        Ok(Self { fd, dest })
    }

    /// Path tujuan yang akan dipakai saat commit
    #[inline]
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Publish: flush durable, lalu beri nama secara atomik.
    ///
    /// Kalau `dest` sudah ada, linkat gagal dengan EEXIST - tidak ada
    /// silent overwrite. Setelah commit gagal, descriptor tetap terbuka
    /// dan terpakai: caller bisa retry ke tujuan lain atau discard.
    pub fn commit(&self) -> IoResult<()> {
        sync(&self.fd)?;

        // Link lewat referensi open-file milik proses sendiri
        let proc_link = format!("/proc/self/fd/{}", self.fd.as_raw_fd());
        let c_proc = cstring(Path::new(&proc_link), "linkat")?;
        let c_dest = cstring(&self.dest, "linkat")?;

        // SAFETY: kedua path NUL-terminated dan hidup selama call
        let res = retry_eintr(|| {
            (unsafe {
                libc::linkat(
                    libc::AT_FDCWD,
                    c_proc.as_ptr(),
                    libc::AT_FDCWD,
                    c_dest.as_ptr(),
                    libc::AT_SYMLINK_FOLLOW,
                )
            }) as isize
        });
        if res < 0 {
            return Err(IoError::new(
                format!("linkat {}", self.dest.display()),
                io::Error::last_os_error(),
            ));
        }
        Ok(())
    }

    /// Ganti path tujuan, misal setelah commit gagal karena collision.
    ///
    /// Tujuan baru harus tetap di filesystem yang sama dengan directory
    /// tempat file anonimnya dibuka.
    pub fn retarget(&mut self, dest: impl Into<PathBuf>) {
        self.dest = dest.into();
    }

    /// Lepas binding ke path tujuan, pertahankan handle anonimnya
    pub fn into_fd(self) -> FileDesc {
        self.fd
    }
}

impl std::ops::Deref for PendingFile {
    type Target = FileDesc;

    #[inline]
    fn deref(&self) -> &FileDesc {
        &self.fd
    }
}

impl std::ops::DerefMut for PendingFile {
    #[inline]
    fn deref_mut(&mut self) -> &mut FileDesc {
        &mut self.fd
    }
}

impl ReadResource for PendingFile {
    #[inline]
    fn read(&mut self, dest: &mut [u8]) -> IoResult<usize> {
        self.fd.read(dest)
    }
}

impl WriteResource for PendingFile {
    #[inline]
    fn write(&mut self, src: &[u8]) -> IoResult<usize> {
        self.fd.write(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::write_all;

    #[test]
    fn test_commit_publishes_exact_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");

        let mut pending =
            PendingFile::create(&dest, Mode::READ_WRITE, Perms::DEFAULT).unwrap();
        write_all(&mut pending, &[0x1f, 0x8b, 0x08, 0x00]).unwrap();
        pending.commit().unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), [0x1f, 0x8b, 0x08, 0x00]);
    }

    #[test]
    fn test_drop_without_commit_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("never.bin");

        {
            let mut pending =
                PendingFile::create(&dest, Mode::READ_WRITE, Perms::DEFAULT).unwrap();
            write_all(&mut pending, b"discard me").unwrap();
        }

        assert!(!dest.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_collision_fails_and_keeps_old_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("taken.bin");
        std::fs::write(&dest, b"original").unwrap();

        let mut pending =
            PendingFile::create(&dest, Mode::READ_WRITE, Perms::DEFAULT).unwrap();
        write_all(&mut pending, b"usurper").unwrap();

        let err = pending.commit().unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EEXIST));

        // Destination tidak tersentuh, handle masih terpakai
        assert_eq!(std::fs::read(&dest).unwrap(), b"original");
        write_all(&mut pending, b"!").unwrap();

        // Konten tetap bisa diinspeksi lewat handle-nya sendiri
        crate::fs::seek(&pending, 0, crate::fs::Whence::Set).unwrap();
        let mut buf = [0u8; 16];
        let n = crate::io::read_full(&mut pending, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"usurper!");
    }

    #[test]
    fn test_create_without_parent_is_rejected() {
        let err = PendingFile::create("no-parent.bin", Mode::READ_WRITE, Perms::DEFAULT)
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_failed_commit_can_retry_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked.bin");
        std::fs::write(&blocked, b"x").unwrap();

        let mut pending =
            PendingFile::create(&blocked, Mode::READ_WRITE, Perms::DEFAULT).unwrap();
        write_all(&mut pending, b"payload").unwrap();
        assert!(pending.commit().is_err());

        // Handle yang sama bisa di-retarget dan commit ke path lain
        let fallback = dir.path().join("fallback.bin");
        pending.retarget(&fallback);
        pending.commit().unwrap();
        assert_eq!(std::fs::read(&fallback).unwrap(), b"payload");
    }
}
