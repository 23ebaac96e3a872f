//! # Capacity Limits
//!
//! Every structure built during early boot has a fixed size; there is no
//! allocator yet. These constants size that storage.

/// Number of slots in the initial process table.
///
/// Slot `0` holds the kernel, the remaining slots hold boot modules.
pub const PROCESS_LIST_LENGTH: usize = 20;

/// Maximum length of a process command line in bytes, not counting a terminator.
pub const CMDLINE_SLEN_MAX: usize = 255;

/// Maximum number of memory areas a single process may describe.
pub const AREAS_LENGTH_MAX: usize = 32;

/// Maximum number of modules the boot information collector keeps.
///
/// This equals [`PROCESS_LIST_LENGTH`] rather than `PROCESS_LIST_LENGTH - 1`
/// so that a bootloader handing over too many modules is reported by the
/// process table builder instead of being silently truncated.
pub const MODULES_MAX: usize = PROCESS_LIST_LENGTH;

/// Maximum number of memory map entries the boot information collector keeps.
pub const MEMORY_REGIONS_MAX: usize = 64;

/// Required alignment of the boot information structure and of every tag in it.
pub const BOOT_INFO_ALIGN: usize = 8;

const _: () = {
    assert!(PROCESS_LIST_LENGTH >= 1);
    assert!(AREAS_LENGTH_MAX >= 1);
    assert!(MODULES_MAX >= PROCESS_LIST_LENGTH);
    assert!(BOOT_INFO_ALIGN.is_power_of_two());
};
