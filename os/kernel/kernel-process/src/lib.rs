//! # Initial Process Table
//!
//! Turns the [`KernelDescription`](kernel_info::boot::KernelDescription)
//! assembled from the boot information into a fixed-capacity table of
//! process descriptors: one for the kernel and one per boot module.
//!
//! ## Guarantees
//!
//! * Every memory area in the table passed [`MemoryArea::validate`]: it is
//!   non-empty, `base + size - 1 == limit`, and nothing exceeds the configured
//!   [`AddressWidth`](kernel_info::memory::AddressWidth).
//! * Command lines are copied into fixed storage and never truncated; an
//!   oversized one fails the build.
//! * Construction is all or nothing. After a failed [`ProcessTable::init`]
//!   the table is exactly [`ProcessTable::new`], so later boot stages only ever
//!   see an empty or a complete table.
//!
//! ## Usage
//!
//! ```rust
//! use kernel_info::boot::{AreaDescription, KernelDescription, ModuleDescription};
//! use kernel_process::{ProcessOrigin, ProcessTable};
//!
//! let areas = [AreaDescription::new(0, 0x1000, 0xFFF)];
//! let modules = [ModuleDescription::new(0x2000, 0x100, 0x20FF, "init")];
//! let kinfo = KernelDescription::new("boot=disk", &areas, &modules);
//!
//! let mut table = ProcessTable::new();
//! table.init(&kinfo)?;
//!
//! let init = table.get(1).unwrap();
//! assert_eq!(init.created_from(), ProcessOrigin::Module);
//! assert_eq!(init.cmdline(), "init");
//! # Ok::<(), kernel_process::ProcessError>(())
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod area;
mod error;
mod process;
mod table;

pub use area::MemoryArea;
pub use error::ProcessError;
pub use process::{Process, ProcessOrigin};
pub use table::{ProcessTable, ProcessTableBuilder};
