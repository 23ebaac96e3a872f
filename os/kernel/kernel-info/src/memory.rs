//! # Address Width

/// Width of the addresses a memory area may use.
///
/// The initial process table is built before paging is reconfigured, so the
/// usable range is whatever the boot CPU mode can address.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// 32-bit protected mode addressing (`0..=0xFFFF_FFFF`).
    #[default]
    Bits32,
    /// Full 64-bit addressing.
    Bits64,
}

impl AddressWidth {
    /// The largest address (and size) representable with this width.
    #[must_use]
    pub const fn max_address(self) -> u64 {
        match self {
            Self::Bits32 => 0xFFFF_FFFF,
            Self::Bits64 => u64::MAX,
        }
    }

    /// Number of address bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}

/// Address width used by `ProcessTable::init`.
pub const DEFAULT_ADDRESS_WIDTH: AddressWidth = AddressWidth::Bits32;

const _: () = {
    assert!(AddressWidth::Bits32.max_address() == 0xFFFF_FFFF);
    assert!(AddressWidth::Bits64.max_address() == u64::MAX);
};
