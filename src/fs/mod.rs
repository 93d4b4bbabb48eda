//! Filesystem module: Owned file descriptors dan atomic publishing
//!
//! Prinsip desain:
//! - RAII: Descriptor ditutup otomatis saat owner di-drop, di setiap exit path
//! - Move-Only: Satu fd hidup = satu owner; transfer ownership = move
//! - Advisory Locking: flock semantics, scoped ke open file description
//! - Write-Then-Publish: File O_TMPFILE baru dapat nama setelah fsync sukses

mod file;
mod publish;

pub use file::{open, open_anonymous, seek, sync, truncate, FileDesc, Mode, Perms, Whence};
pub use publish::PendingFile;
