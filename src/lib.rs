//! Iris - Safe Zero-Cost POSIX I/O Primitives
//!
//! Arsitektur:
//! - RAII Ownership: File descriptor dan mmap region punya owner tunggal
//! - Zero-Cost Generics: Satu algoritma copy untuk file, buffer, dan mapping
//! - Atomic Publish: File muncul di path tujuan hanya setelah fully-synced
//! - Single Error Channel: Semua failure membawa errno + nama syscall

mod error;
pub mod fs;
pub mod io;
pub mod mem;

pub use crate::error::{IoError, IoResult};
pub use crate::fs::{
    open, open_anonymous, seek, sync, truncate, FileDesc, Mode, PendingFile, Perms, Whence,
};
pub use crate::io::{
    copy, read_full, write_all, ByteWindow, ByteWindowMut, ReadResource, WriteResource,
};
pub use crate::mem::{Mapping, MappingMut, Sharing};
