/// Reasons the initial process table could not be built.
///
/// Every error leaves the table empty.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ProcessError {
    /// A command line is longer than `CMDLINE_SLEN_MAX` bytes.
    #[error("command line too long")]
    CmdlineTooLong,
    /// The kernel describes more than `AREAS_LENGTH_MAX` memory areas.
    #[error("kernel has too many memory areas")]
    KernelAreasLengthTooLong,
    /// More modules than process table slots after the kernel.
    #[error("too many boot modules")]
    ModulesTooMany,
    /// A base, size or limit is beyond the configured address width.
    #[error("address exceeds the addressable range")]
    AddrTooBig,
    /// A zero-sized area, or one where `base + size - 1 != limit`.
    #[error("inconsistent memory area")]
    InvalidArea,
}
