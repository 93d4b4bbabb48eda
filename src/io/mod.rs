//! I/O module: Byte-resource traits dan generic transfer algorithms
//!
//! Prinsip desain:
//! - Customization Point: Resource apapun (file, buffer, socket) cukup
//!   implement `ReadResource`/`WriteResource` untuk dipakai algoritma generic
//! - Short Transfer is Not an Error: Hasil pendek adalah outcome valid,
//!   caller yang butuh exact count melakukan loop sendiri
//! - EINTR Invisible: Retry interrupted-before-progress terjadi di dalam impl

mod traits;
mod window;

pub use traits::{copy, read_full, write_all, ReadResource, WriteResource};
pub use window::{ByteWindow, ByteWindowMut};
