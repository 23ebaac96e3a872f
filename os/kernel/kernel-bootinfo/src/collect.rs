//! # Boot Information Collector
//!
//! Aggregates decoded tags into the [`KernelDescription`] the process table
//! builder consumes. The collector only borrows from the boot information
//! buffer; nothing is copied until the builder takes command lines into the
//! process table.

use crate::TagSink;
use crate::tag::{BasicMemInfo, MemoryMapEntry, ModuleTag, RegionType, Tag};
use arrayvec::ArrayVec;
use kernel_info::boot::{AreaDescription, KernelDescription, ModuleDescription};
use kernel_info::limits::{MEMORY_REGIONS_MAX, MODULES_MAX};
use log::warn;

/// A [`TagSink`] that remembers the tags the kernel needs later on.
#[derive(Debug, Default, Clone)]
pub struct BootInfoCollector<'a> {
    cmdline: Option<&'a str>,
    meminfo: Option<BasicMemInfo>,
    modules: ArrayVec<ModuleDescription<'a>, MODULES_MAX>,
    regions: ArrayVec<MemoryMapEntry, MEMORY_REGIONS_MAX>,
    dropped_modules: usize,
    dropped_regions: usize,
}

impl<'a> BootInfoCollector<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cmdline: None,
            meminfo: None,
            modules: ArrayVec::new_const(),
            regions: ArrayVec::new_const(),
            dropped_modules: 0,
            dropped_regions: 0,
        }
    }

    /// The kernel command line, if the bootloader provided one.
    #[must_use]
    pub const fn cmdline(&self) -> Option<&'a str> {
        self.cmdline
    }

    #[must_use]
    pub const fn basic_meminfo(&self) -> Option<BasicMemInfo> {
        self.meminfo
    }

    /// Modules in the order they were reported.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDescription<'a>] {
        &self.modules
    }

    /// Memory map entries in the order they were reported.
    #[must_use]
    pub fn memory_regions(&self) -> &[MemoryMapEntry] {
        &self.regions
    }

    /// Number of modules that did not fit.
    ///
    /// Any overflow leaves [`MODULES_MAX`] modules behind, which the process
    /// table builder rejects as too many.
    #[must_use]
    pub const fn dropped_modules(&self) -> usize {
        self.dropped_modules
    }

    /// Number of memory map entries that did not fit.
    #[must_use]
    pub const fn dropped_regions(&self) -> usize {
        self.dropped_regions
    }

    /// Total bytes of [`RegionType::Available`] memory in the collected map.
    #[must_use]
    pub fn available_memory(&self) -> u64 {
        self.regions
            .iter()
            .filter(|r| r.region_type == RegionType::Available)
            .fold(0u64, |acc, r| acc.saturating_add(r.length))
    }

    /// Combines the collected tags with the kernel's own memory areas.
    ///
    /// A missing command line tag yields an empty command line.
    #[must_use]
    pub fn description<'s>(&'s self, kernel_areas: &'s [AreaDescription]) -> KernelDescription<'s>
    where
        'a: 's,
    {
        KernelDescription::new(self.cmdline.unwrap_or(""), kernel_areas, &self.modules)
    }

    fn push_module(&mut self, module: &ModuleTag<'a>) {
        let description = ModuleDescription {
            area: AreaDescription::from_range(
                u64::from(module.mod_start),
                u64::from(module.mod_end),
            ),
            cmdline: module.cmdline,
        };

        if self.modules.try_push(description).is_err() {
            self.dropped_modules += 1;
            warn!(
                "Dropping boot module {:#x}-{:#x}: more than {MODULES_MAX} modules",
                module.mod_start, module.mod_end
            );
        }
    }
}

impl<'a> TagSink<'a> for BootInfoCollector<'a> {
    fn tag(&mut self, tag: &Tag<'a>) {
        match tag {
            Tag::CommandLine(cmdline) => self.cmdline = Some(*cmdline),
            Tag::Module(module) => self.push_module(module),
            Tag::BasicMemInfo(info) => self.meminfo = Some(*info),
            Tag::MemoryMap(mmap) => {
                let mut dropped = 0usize;
                for entry in mmap.entries() {
                    if self.regions.try_push(entry).is_err() {
                        dropped += 1;
                    }
                }
                if dropped > 0 {
                    self.dropped_regions += dropped;
                    warn!("Memory map truncated to {MEMORY_REGIONS_MAX} entries, {dropped} dropped");
                }
            }
            Tag::Unknown { .. } => {}
        }
    }
}
