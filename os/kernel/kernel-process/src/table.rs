//! # Initial Process Table

use crate::{Process, ProcessError};
use kernel_info::boot::KernelDescription;
use kernel_info::limits::PROCESS_LIST_LENGTH;
use kernel_info::memory::{AddressWidth, DEFAULT_ADDRESS_WIDTH};
use log::{debug, warn};

/// Fixed-capacity table of the processes known at boot.
///
/// Slot 0 is the kernel, slots `1..=N` are the boot modules in the order the
/// bootloader reported them. The table is either entirely empty or entirely
/// populated; a failed [`ProcessTable::init`] leaves it empty.
///
/// The constructor is `const`, so the table can live in a `static`:
///
/// ```rust
/// use kernel_process::ProcessTable;
///
/// static TABLE: ProcessTable = ProcessTable::new();
/// assert!(TABLE.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTable {
    slots: [Process; PROCESS_LIST_LENGTH],
}

impl ProcessTable {
    /// Number of slots, including the kernel's.
    pub const CAPACITY: usize = PROCESS_LIST_LENGTH;

    /// An empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [Process::EMPTY; PROCESS_LIST_LENGTH],
        }
    }

    /// Populates the table from `kinfo` using the default 32-bit address width.
    ///
    /// # Errors
    /// See [`ProcessTableBuilder::build`].
    pub fn init(&mut self, kinfo: &KernelDescription<'_>) -> Result<(), ProcessError> {
        ProcessTableBuilder::default().build(self, kinfo)
    }

    /// Resets every slot to empty.
    pub fn clear(&mut self) {
        self.slots.fill(Process::EMPTY);
    }

    /// The slot at `index`, if it holds a process.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Process> {
        self.slots.get(index).filter(|p| p.is_present())
    }

    /// The kernel's descriptor.
    #[must_use]
    pub fn kernel(&self) -> Option<&Process> {
        self.get(0)
    }

    /// Module descriptors in boot order.
    pub fn modules(&self) -> impl Iterator<Item = &Process> {
        self.slots[1..].iter().filter(|p| p.is_present())
    }

    /// All present descriptors, kernel first.
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.slots.iter().filter(|p| p.is_present())
    }

    /// All slots, including empty ones.
    #[must_use]
    pub const fn slots(&self) -> &[Process] {
        &self.slots
    }

    /// Number of present descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kernel().is_none()
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`ProcessTable`] for a given address width.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProcessTableBuilder {
    width: AddressWidth,
}

impl ProcessTableBuilder {
    #[must_use]
    pub const fn new(width: AddressWidth) -> Self {
        Self { width }
    }

    #[must_use]
    pub const fn width(&self) -> AddressWidth {
        self.width
    }

    /// Populates `table` from `kinfo`, all or nothing.
    ///
    /// The kernel goes to slot 0, module `i` to slot `i + 1`.
    ///
    /// # Errors
    /// * [`ProcessError::CmdlineTooLong`] for an oversized kernel or module command line.
    /// * [`ProcessError::KernelAreasLengthTooLong`] for too many kernel areas.
    /// * [`ProcessError::ModulesTooMany`] if the modules do not fit after the kernel.
    /// * [`ProcessError::AddrTooBig`] / [`ProcessError::InvalidArea`] for a bad area.
    ///
    /// On error the table is empty.
    pub fn build(
        &self,
        table: &mut ProcessTable,
        kinfo: &KernelDescription<'_>,
    ) -> Result<(), ProcessError> {
        table.clear();

        if let Err(e) = self.populate(table, kinfo) {
            table.clear();
            return Err(e);
        }

        debug!(
            "Process table built: kernel + {} modules ({}-bit addresses)",
            kinfo.modules().len(),
            self.width.bits()
        );
        Ok(())
    }

    fn populate(
        &self,
        table: &mut ProcessTable,
        kinfo: &KernelDescription<'_>,
    ) -> Result<(), ProcessError> {
        let max_address = self.width.max_address();

        table.slots[0] = Process::from_kernel(kinfo, max_address).inspect_err(|e| {
            warn!("Cannot create kernel process: {e}");
        })?;

        let modules = kinfo.modules();
        if modules.len() > PROCESS_LIST_LENGTH - 1 {
            warn!(
                "Cannot create module processes: {} modules, at most {}",
                modules.len(),
                PROCESS_LIST_LENGTH - 1
            );
            return Err(ProcessError::ModulesTooMany);
        }

        for (index, (slot, module)) in table.slots[1..].iter_mut().zip(modules).enumerate() {
            *slot = Process::from_module(module, max_address).inspect_err(|e| {
                warn!("Cannot create process for module {index} ({}): {e}", module.cmdline);
            })?;
        }

        Ok(())
    }
}

impl Default for ProcessTableBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_WIDTH)
    }
}
