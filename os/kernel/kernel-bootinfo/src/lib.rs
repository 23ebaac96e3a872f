//! # Multiboot2 Boot Information Walker
//!
//! A bounded decoder for the boot information structure a Multiboot2
//! bootloader hands to the kernel. This is where firmware-controlled bytes
//! become kernel data, so every size field is checked against the structure's
//! declared total size before anything behind it is read.
//!
//! ## Layout
//!
//! ```text
//! offset 0  ┌──────────────┬──────────────┐
//!           │ total_size   │ reserved     │   8-byte header
//! offset 8  ├──────────────┼──────────────┤
//!           │ type         │ size         │   tag header
//!           ├──────────────┴──────────────┤
//!           │ payload (size - 8 bytes)    │
//!           ├─────────────────────────────┤   padded to 8 bytes
//!           │ next tag ...                │
//!           ├──────────────┬──────────────┤
//!           │ 0 (end)      │ 8            │   end tag
//!           └──────────────┴──────────────┘
//! ```
//!
//! ## Components
//!
//! * [`BootInfo`] validates the header and clips the view to `total_size`.
//! * [`Tags`] iterates tags and decodes them into [`Tag`] records. A missing
//!   end tag, a tag smaller than its header, or a tag reaching past the end
//!   is reported as [`BootInfoError::MalformedStream`] instead of walking on.
//! * [`parse`] drives the iterator and forwards known tags to a [`TagSink`];
//!   unknown tag types are skipped.
//! * [`FmtSink`] and [`LogSink`] render decoded tags for humans.
//! * [`BootInfoCollector`] aggregates tags into a
//!   [`KernelDescription`](kernel_info::boot::KernelDescription).
//! * [`TagWriter`] writes streams in the same format.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kernel_bootinfo::{BootInfoCollector, LogSink, parse_at};
//! use kernel_info::boot::AreaDescription;
//!
//! # let multiboot_info_addr = 0usize;
//! let mut collector = BootInfoCollector::new();
//! let mut sink = (LogSink::default(), &mut collector);
//!
//! // SAFETY: the bootloader placed the structure there and nothing writes to it.
//! unsafe { parse_at(multiboot_info_addr, &mut sink) }.expect("boot information");
//!
//! let kernel_areas = [AreaDescription::new(0x10_0000, 0x10_0000, 0x1F_FFFF)];
//! let kinfo = collector.description(&kernel_areas);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod collect;
mod cursor;
mod error;
mod parser;
mod sink;
pub mod tag;
mod writer;

pub use collect::BootInfoCollector;
pub use error::BootInfoError;
pub use parser::{BOOT_INFO_HEADER_SIZE, BootInfo, Tags, parse, parse_at};
pub use sink::{FmtSink, LogSink, TagSink};
pub use tag::{BasicMemInfo, MemoryMapEntry, MemoryMapTag, ModuleTag, RegionType, Tag};
pub use writer::TagWriter;
