//! # Process Descriptors

use crate::{MemoryArea, ProcessError};
use arrayvec::{ArrayString, ArrayVec};
use kernel_info::boot::{KernelDescription, ModuleDescription};
use kernel_info::limits::{AREAS_LENGTH_MAX, CMDLINE_SLEN_MAX};

/// What an initial process was created from.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProcessOrigin {
    /// The kernel image itself, always slot 0.
    #[default]
    Kernel,
    /// A module preloaded by the bootloader.
    Module,
}

/// One slot of the initial process table.
///
/// Command line and memory areas are copied into fixed-size storage, so a
/// descriptor never borrows from the boot information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    present: bool,
    created_from: ProcessOrigin,
    cmdline: ArrayString<CMDLINE_SLEN_MAX>,
    areas: ArrayVec<MemoryArea, AREAS_LENGTH_MAX>,
}

impl Process {
    /// An unused slot.
    pub const EMPTY: Self = Self {
        present: false,
        created_from: ProcessOrigin::Kernel,
        cmdline: ArrayString::new_const(),
        areas: ArrayVec::new_const(),
    };

    /// Builds the kernel's descriptor.
    pub(crate) fn from_kernel(
        kinfo: &KernelDescription<'_>,
        max_address: u64,
    ) -> Result<Self, ProcessError> {
        let cmdline = copy_cmdline(kinfo.cmdline())?;

        if kinfo.areas().len() > AREAS_LENGTH_MAX {
            return Err(ProcessError::KernelAreasLengthTooLong);
        }

        let mut areas = ArrayVec::new();
        for area in kinfo.areas() {
            areas
                .try_push(MemoryArea::from_description(area, max_address)?)
                .map_err(|_| ProcessError::KernelAreasLengthTooLong)?;
        }

        Ok(Self {
            present: true,
            created_from: ProcessOrigin::Kernel,
            cmdline,
            areas,
        })
    }

    /// Builds a module's descriptor with its single memory area.
    pub(crate) fn from_module(
        module: &ModuleDescription<'_>,
        max_address: u64,
    ) -> Result<Self, ProcessError> {
        let cmdline = copy_cmdline(module.cmdline)?;

        let mut areas = ArrayVec::new();
        areas.push(MemoryArea::from_description(&module.area, max_address)?);

        Ok(Self {
            present: true,
            created_from: ProcessOrigin::Module,
            cmdline,
            areas,
        })
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    #[must_use]
    pub const fn created_from(&self) -> ProcessOrigin {
        self.created_from
    }

    #[must_use]
    pub fn cmdline(&self) -> &str {
        &self.cmdline
    }

    #[must_use]
    pub fn areas(&self) -> &[MemoryArea] {
        &self.areas
    }
}

impl Default for Process {
    fn default() -> Self {
        Self::EMPTY
    }
}

fn copy_cmdline(cmdline: &str) -> Result<ArrayString<CMDLINE_SLEN_MAX>, ProcessError> {
    ArrayString::from(cmdline).map_err(|_| ProcessError::CmdlineTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_info::boot::AreaDescription;

    const MAX32: u64 = 0xFFFF_FFFF;

    #[test]
    fn empty_slot_is_default() {
        let p = Process::default();
        assert!(!p.is_present());
        assert_eq!(p.cmdline(), "");
        assert!(p.areas().is_empty());
    }

    #[test]
    fn kernel_without_areas() {
        let kinfo = KernelDescription::new("quiet", &[], &[]);
        let p = Process::from_kernel(&kinfo, MAX32).unwrap();
        assert!(p.is_present());
        assert_eq!(p.created_from(), ProcessOrigin::Kernel);
        assert_eq!(p.cmdline(), "quiet");
        assert!(p.areas().is_empty());
    }

    #[test]
    fn cmdline_is_checked_before_areas() {
        let long = "x".repeat(CMDLINE_SLEN_MAX + 1);
        let areas = [AreaDescription::new(0, 0, 0); AREAS_LENGTH_MAX + 1];
        let kinfo = KernelDescription::new(&long, &areas, &[]);
        assert_eq!(
            Process::from_kernel(&kinfo, MAX32),
            Err(ProcessError::CmdlineTooLong)
        );
    }

    #[test]
    fn area_count_is_checked_before_contents() {
        let areas = [AreaDescription::new(0, 0, 0); AREAS_LENGTH_MAX + 1];
        let kinfo = KernelDescription::new("", &areas, &[]);
        assert_eq!(
            Process::from_kernel(&kinfo, MAX32),
            Err(ProcessError::KernelAreasLengthTooLong)
        );
    }

    #[test]
    fn module_has_one_area() {
        let module = ModuleDescription::new(0x2000, 0x100, 0x20FF, "init");
        let p = Process::from_module(&module, MAX32).unwrap();
        assert_eq!(p.created_from(), ProcessOrigin::Module);
        assert_eq!(p.areas().len(), 1);
        assert_eq!(p.areas()[0].limit(), 0x20FF);
    }

    #[test]
    fn multibyte_cmdline_counts_bytes() {
        // 128 two-byte characters, 256 bytes.
        let cmdline = "ä".repeat(128);
        let module = ModuleDescription::new(0x2000, 0x100, 0x20FF, &cmdline);
        assert_eq!(
            Process::from_module(&module, MAX32),
            Err(ProcessError::CmdlineTooLong)
        );
    }
}
