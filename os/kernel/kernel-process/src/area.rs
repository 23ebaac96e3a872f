//! # Memory Areas

use crate::ProcessError;
use core::fmt;
use kernel_info::boot::AreaDescription;

/// A validated, non-empty, contiguous address range.
///
/// Invariant: `size > 0`, `base + size - 1 == limit`, and all three values
/// are within the address width the area was validated against.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemoryArea {
    base: u64,
    size: u64,
    limit: u64,
}

impl MemoryArea {
    /// Checks a `(base, size, limit)` triple.
    ///
    /// # Errors
    /// * [`ProcessError::AddrTooBig`] if any value exceeds `max_address`.
    /// * [`ProcessError::InvalidArea`] if `size` is zero or
    ///   `base + size - 1 != limit`.
    pub const fn validate(
        base: u64,
        size: u64,
        limit: u64,
        max_address: u64,
    ) -> Result<Self, ProcessError> {
        if base > max_address || size > max_address || limit > max_address {
            return Err(ProcessError::AddrTooBig);
        }

        if size == 0 {
            return Err(ProcessError::InvalidArea);
        }

        match base.checked_add(size - 1) {
            Some(last) if last == limit => Ok(Self { base, size, limit }),
            _ => Err(ProcessError::InvalidArea),
        }
    }

    /// Validates an area reported by the boot environment.
    ///
    /// # Errors
    /// See [`MemoryArea::validate`].
    pub const fn from_description(
        area: &AreaDescription,
        max_address: u64,
    ) -> Result<Self, ProcessError> {
        Self::validate(area.base, area.size, area.limit, max_address)
    }

    #[must_use]
    pub const fn base(&self) -> u64 {
        self.base
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Last address of the area (inclusive).
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        addr >= self.base && addr <= self.limit
    }
}

impl fmt::Display for MemoryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}..={:#x}", self.base, self.limit)
    }
}
