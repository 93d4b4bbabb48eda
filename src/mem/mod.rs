//! Memory module: Owned memory-mapped views di atas file content
//!
//! Prinsip desain:
//! - Zero-Copy Read: Bytes langsung dari page cache, tanpa copy ke buffer
//! - Type-Level Mutability: `Mapping` read-only dan `MappingMut` adalah
//!   type berbeda; mutasi lewat mapping read-only tidak bisa di-compile
//! - Independent Lifetime: Mapping tetap valid setelah fd sumbernya ditutup

mod mapping;

pub use mapping::{Mapping, MappingMut, Sharing};
