//! # Tag Records
//!
//! Typed, borrowed views of the tags this kernel understands. Decoding checks
//! every length before reading, so a [`Tag`] that exists is always complete.

use crate::BootInfoError;
use crate::cursor::{read_u32_le, read_u64_le};
use core::ffi::CStr;
use core::fmt;

/// Terminates the tag sequence.
pub const TAG_TYPE_END: u32 = 0;
/// Kernel command line.
pub const TAG_TYPE_CMDLINE: u32 = 1;
/// A module loaded alongside the kernel.
pub const TAG_TYPE_MODULE: u32 = 3;
/// Amount of lower and upper memory.
pub const TAG_TYPE_BASIC_MEMINFO: u32 = 4;
/// BIOS-style memory map.
pub const TAG_TYPE_MMAP: u32 = 6;

/// Size of the `type` + `size` header in front of every tag.
pub const TAG_HEADER_SIZE: usize = 8;

/// Size of one memory map entry as defined by the format (version 0).
pub const MMAP_ENTRY_SIZE: usize = 24;

/// Type of a memory map region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegionType {
    /// RAM usable by the OS.
    Available,
    /// Reserved, must not be used.
    Reserved,
    /// Holds ACPI tables; usable once they are consumed.
    AcpiReclaimable,
    /// ACPI non-volatile storage, preserve across sleep.
    Nvs,
    /// Defective RAM.
    BadRam,
    /// A code this kernel does not know.
    Other(u32),
}

impl RegionType {
    /// The raw type code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Available => 1,
            Self::Reserved => 2,
            Self::AcpiReclaimable => 3,
            Self::Nvs => 4,
            Self::BadRam => 5,
            Self::Other(code) => code,
        }
    }
}

impl From<u32> for RegionType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Available,
            2 => Self::Reserved,
            3 => Self::AcpiReclaimable,
            4 => Self::Nvs,
            5 => Self::BadRam,
            other => Self::Other(other),
        }
    }
}

/// A boot module: the image lives at `mod_start..mod_end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleTag<'a> {
    pub mod_start: u32,
    /// One past the last byte of the image.
    pub mod_end: u32,
    pub cmdline: &'a str,
}

/// Lower and upper memory in KiB.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BasicMemInfo {
    pub mem_lower: u32,
    pub mem_upper: u32,
}

/// One memory map region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MemoryMapEntry {
    pub base_addr: u64,
    pub length: u64,
    pub region_type: RegionType,
}

impl MemoryMapEntry {
    #[must_use]
    pub const fn new(base_addr: u64, length: u64, region_type: RegionType) -> Self {
        Self {
            base_addr,
            length,
            region_type,
        }
    }
}

/// The memory map tag: a header plus a strided entry array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MemoryMapTag<'a> {
    entry_size: u32,
    entry_version: u32,
    entries: &'a [u8],
}

impl<'a> MemoryMapTag<'a> {
    /// Stride between consecutive entries in bytes.
    #[must_use]
    pub const fn entry_size(&self) -> u32 {
        self.entry_size
    }

    #[must_use]
    pub const fn entry_version(&self) -> u32 {
        self.entry_version
    }

    /// Number of entries in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len().div_ceil(self.entry_size as usize)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in the order the bootloader wrote them.
    #[must_use]
    pub const fn entries(&self) -> MemoryMapEntries<'a> {
        MemoryMapEntries {
            entries: self.entries,
            stride: self.entry_size as usize,
            pos: 0,
        }
    }
}

/// Iterator over [`MemoryMapEntry`] values of a [`MemoryMapTag`].
#[derive(Debug, Clone)]
pub struct MemoryMapEntries<'a> {
    entries: &'a [u8],
    stride: usize,
    pos: usize,
}

impl Iterator for MemoryMapEntries<'_> {
    type Item = MemoryMapEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.entries.len() {
            return None;
        }
        let off = self.pos;
        self.pos = self.pos.saturating_add(self.stride);

        // Every entry was bounds checked when the tag was decoded.
        Some(MemoryMapEntry {
            base_addr: read_u64_le(self.entries, off).ok()?,
            length: read_u64_le(self.entries, off + 8).ok()?,
            region_type: RegionType::from(read_u32_le(self.entries, off + 16).ok()?),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let r = self
            .entries
            .len()
            .saturating_sub(self.pos)
            .div_ceil(self.stride);
        (r, Some(r))
    }
}

impl ExactSizeIterator for MemoryMapEntries<'_> {}
impl core::iter::FusedIterator for MemoryMapEntries<'_> {}

/// A decoded tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tag<'a> {
    CommandLine(&'a str),
    Module(ModuleTag<'a>),
    BasicMemInfo(BasicMemInfo),
    MemoryMap(MemoryMapTag<'a>),
    /// A tag type this kernel does not interpret.
    Unknown { tag_type: u32, size: u32 },
}

impl<'a> Tag<'a> {
    /// Decodes one tag.
    ///
    /// `raw` covers exactly the tag, header included (`raw.len()` is the
    /// tag's `size` field).
    pub(crate) fn decode(tag_type: u32, raw: &'a [u8]) -> Result<Self, BootInfoError> {
        let payload = raw
            .get(TAG_HEADER_SIZE..)
            .ok_or(BootInfoError::MalformedStream)?;

        match tag_type {
            TAG_TYPE_CMDLINE => Ok(Self::CommandLine(c_str(payload)?)),
            TAG_TYPE_MODULE => Ok(Self::Module(ModuleTag {
                mod_start: read_u32_le(payload, 0)?,
                mod_end: read_u32_le(payload, 4)?,
                cmdline: c_str(payload.get(8..).ok_or(BootInfoError::MalformedStream)?)?,
            })),
            TAG_TYPE_BASIC_MEMINFO => Ok(Self::BasicMemInfo(BasicMemInfo {
                mem_lower: read_u32_le(payload, 0)?,
                mem_upper: read_u32_le(payload, 4)?,
            })),
            TAG_TYPE_MMAP => decode_mmap(payload).map(Self::MemoryMap),
            _ => Ok(Self::Unknown {
                tag_type,
                size: u32::try_from(raw.len()).map_err(|_| BootInfoError::MalformedStream)?,
            }),
        }
    }

    /// Renders the tag as human-readable lines, each terminated by `\n`.
    ///
    /// # Errors
    /// Propagates errors of the underlying writer.
    pub fn write_lines<W: fmt::Write + ?Sized>(&self, w: &mut W) -> fmt::Result {
        match self {
            Self::CommandLine(cmdline) => writeln!(w, "Kernel command line: {cmdline}"),
            Self::Module(m) => writeln!(
                w,
                "Module at {:#x}-{:#x}, command line: {}",
                m.mod_start, m.mod_end, m.cmdline
            ),
            Self::BasicMemInfo(info) => writeln!(
                w,
                "mem_lower = {}KB, mem_upper = {}KB",
                info.mem_lower, info.mem_upper
            ),
            Self::MemoryMap(mmap) => {
                writeln!(w, "Memory map:")?;
                for entry in mmap.entries() {
                    writeln!(
                        w,
                        " base_addr = {:#x}, length = {:#x}, type = {:#x}",
                        entry.base_addr,
                        entry.length,
                        entry.region_type.code()
                    )?;
                }
                Ok(())
            }
            Self::Unknown { tag_type, size } => {
                writeln!(w, "Unknown tag {tag_type} ({size} bytes)")
            }
        }
    }
}

fn decode_mmap(payload: &[u8]) -> Result<MemoryMapTag<'_>, BootInfoError> {
    let entry_size = read_u32_le(payload, 0)?;
    let entry_version = read_u32_le(payload, 4)?;
    let entries = payload.get(8..).ok_or(BootInfoError::MalformedStream)?;

    let stride = usize::try_from(entry_size).map_err(|_| BootInfoError::MalformedStream)?;
    if stride < MMAP_ENTRY_SIZE {
        return Err(BootInfoError::MalformedStream);
    }

    // The walk visits every stride start below the tag end; the last one
    // must still hold a complete entry.
    if !entries.is_empty() {
        let last = (entries.len().div_ceil(stride) - 1) * stride;
        if last + MMAP_ENTRY_SIZE > entries.len() {
            return Err(BootInfoError::MalformedStream);
        }
    }

    Ok(MemoryMapTag {
        entry_size,
        entry_version,
        entries,
    })
}

fn c_str(bytes: &[u8]) -> Result<&str, BootInfoError> {
    CStr::from_bytes_until_nul(bytes)
        .map_err(|_| BootInfoError::MalformedStream)?
        .to_str()
        .map_err(|_| BootInfoError::InvalidString)
}
