//! # Kernel Boot Description
//!
//! The aggregated view of what the bootloader handed over: the kernel's own
//! command line and memory areas, and the list of preloaded modules. Nothing
//! in here is validated; the process table builder does that.

/// An unvalidated `(base, size, limit)` triple as reported by the boot environment.
///
/// For a consistent area `base + size - 1 == limit` holds.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AreaDescription {
    /// First address of the area.
    pub base: u64,
    /// Length of the area in bytes.
    pub size: u64,
    /// Last address of the area (inclusive).
    pub limit: u64,
}

impl AreaDescription {
    #[must_use]
    pub const fn new(base: u64, size: u64, limit: u64) -> Self {
        Self { base, size, limit }
    }

    /// Describes the half-open range `start..end`.
    ///
    /// An empty or inverted range produces a triple that fails validation
    /// (zero size, or a size that wrapped around).
    #[must_use]
    pub const fn from_range(start: u64, end: u64) -> Self {
        Self {
            base: start,
            size: end.wrapping_sub(start),
            limit: end.wrapping_sub(1),
        }
    }
}

/// A preloaded boot module: one memory area plus its command line.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ModuleDescription<'a> {
    /// Memory occupied by the module image.
    pub area: AreaDescription,
    /// Command line the bootloader attached to the module.
    pub cmdline: &'a str,
}

impl<'a> ModuleDescription<'a> {
    #[must_use]
    pub const fn new(base: u64, size: u64, limit: u64, cmdline: &'a str) -> Self {
        Self {
            area: AreaDescription::new(base, size, limit),
            cmdline,
        }
    }
}

/// Everything the process table builder needs to know about the boot environment.
///
/// The description only borrows; the caller owns the storage (usually a
/// `BootInfoCollector` plus a static array of kernel areas).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct KernelDescription<'a> {
    cmdline: &'a str,
    areas: &'a [AreaDescription],
    modules: &'a [ModuleDescription<'a>],
}

impl<'a> KernelDescription<'a> {
    #[must_use]
    pub const fn new(
        cmdline: &'a str,
        areas: &'a [AreaDescription],
        modules: &'a [ModuleDescription<'a>],
    ) -> Self {
        Self {
            cmdline,
            areas,
            modules,
        }
    }

    /// The kernel's command line.
    #[must_use]
    pub const fn cmdline(&self) -> &'a str {
        self.cmdline
    }

    /// Memory areas occupied by the kernel image.
    #[must_use]
    pub const fn areas(&self) -> &'a [AreaDescription] {
        self.areas
    }

    /// Boot modules in the order the bootloader reported them.
    #[must_use]
    pub const fn modules(&self) -> &'a [ModuleDescription<'a>] {
        self.modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_range_is_inclusive_limit() {
        let area = AreaDescription::from_range(0x2000, 0x2100);
        assert_eq!(area, AreaDescription::new(0x2000, 0x100, 0x20FF));
    }

    #[test]
    fn from_range_empty_has_zero_size() {
        let area = AreaDescription::from_range(0x2000, 0x2000);
        assert_eq!(area.size, 0);
    }

    #[test]
    fn description_borrows_parts() {
        let areas = [AreaDescription::new(0, 0x1000, 0xFFF)];
        let modules = [ModuleDescription::new(0x2000, 0x100, 0x20FF, "init")];
        let kinfo = KernelDescription::new("boot=disk", &areas, &modules);

        assert_eq!(kinfo.cmdline(), "boot=disk");
        assert_eq!(kinfo.areas(), &areas);
        assert_eq!(kinfo.modules()[0].cmdline, "init");
    }
}
