//! # Tag Stream Walker

use crate::cursor::{Cursor, read_u32_le};
use crate::tag::{TAG_HEADER_SIZE, TAG_TYPE_END, Tag};
use crate::{BootInfoError, TagSink};
use kernel_info::limits::BOOT_INFO_ALIGN;
use log::{debug, trace};

/// Size of the `total_size` + `reserved` header of the boot information.
pub const BOOT_INFO_HEADER_SIZE: usize = 8;

/// A validated view of the boot information structure.
///
/// The view is clipped to the declared `total_size`, so nothing derived from
/// it can reach past the end of the structure.
#[derive(Debug, Copy, Clone)]
pub struct BootInfo<'a> {
    buf: &'a [u8],
}

impl<'a> BootInfo<'a> {
    /// Validates the header of the boot information in `buffer`.
    ///
    /// `base_address` is where `buffer` lives in memory; it is only used for
    /// the alignment check.
    ///
    /// # Errors
    /// * [`BootInfoError::Alignment`] if `base_address` is not 8-byte aligned.
    /// * [`BootInfoError::MalformedStream`] if the header is truncated, or the
    ///   declared total size is smaller than the header or larger than `buffer`.
    pub fn new(buffer: &'a [u8], base_address: u64) -> Result<Self, BootInfoError> {
        if !base_address.is_multiple_of(BOOT_INFO_ALIGN as u64) {
            return Err(BootInfoError::Alignment);
        }

        let total_size = usize::try_from(read_u32_le(buffer, 0)?)
            .map_err(|_| BootInfoError::MalformedStream)?;
        if total_size < BOOT_INFO_HEADER_SIZE {
            return Err(BootInfoError::MalformedStream);
        }

        let buf = buffer
            .get(..total_size)
            .ok_or(BootInfoError::MalformedStream)?;
        Ok(Self { buf })
    }

    /// Validates the boot information at a raw address, as handed over in
    /// `ebx` by a Multiboot2 bootloader.
    ///
    /// # Errors
    /// Same as [`BootInfo::new`]. A null `addr` is
    /// [`BootInfoError::MalformedStream`]. Both checks run before any memory
    /// is read.
    ///
    /// # Safety
    /// `addr` must point to a boot information structure whose declared total
    /// size is readable and stays unmodified for `'a`.
    pub unsafe fn from_addr(addr: usize) -> Result<Self, BootInfoError> {
        if !addr.is_multiple_of(BOOT_INFO_ALIGN) {
            return Err(BootInfoError::Alignment);
        }
        if addr == 0 {
            return Err(BootInfoError::MalformedStream);
        }

        // SAFETY: the caller guarantees the header is readable; the address is aligned.
        let total_size = u32::from_le(unsafe { core::ptr::read(addr as *const u32) });
        let len = usize::try_from(total_size).map_err(|_| BootInfoError::MalformedStream)?;
        if len < BOOT_INFO_HEADER_SIZE {
            return Err(BootInfoError::MalformedStream);
        }

        // SAFETY: the caller guarantees `total_size` bytes are readable for `'a`.
        let buf = unsafe { core::slice::from_raw_parts(addr as *const u8, len) };
        Self::new(buf, addr as u64)
    }

    /// The declared total size in bytes, header included.
    #[must_use]
    pub const fn total_size(&self) -> usize {
        self.buf.len()
    }

    /// The raw bytes of the structure.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.buf
    }

    /// Iterates all tags, including unknown ones, up to the end tag.
    #[must_use]
    pub const fn tags(&self) -> Tags<'a> {
        Tags {
            cursor: Cursor::new(self.buf, BOOT_INFO_HEADER_SIZE),
            done: false,
        }
    }

    /// Decodes every tag and forwards the known ones to `sink`.
    ///
    /// Unknown tag types are skipped. Each tag is fully checked before it is
    /// forwarded; tags forwarded before an error stay forwarded.
    ///
    /// # Errors
    /// The first decoding error, see [`Tags`].
    pub fn walk<S: TagSink<'a> + ?Sized>(&self, sink: &mut S) -> Result<(), BootInfoError> {
        let mut forwarded = 0usize;
        for tag in self.tags() {
            match tag? {
                Tag::Unknown { tag_type, size } => {
                    trace!("Skipping unknown boot information tag {tag_type} ({size} bytes)");
                }
                tag => {
                    sink.tag(&tag);
                    forwarded += 1;
                }
            }
        }

        debug!(
            "Walked {} bytes of boot information, {forwarded} tags decoded",
            self.total_size()
        );
        Ok(())
    }
}

/// Iterator over the tags of a [`BootInfo`].
///
/// Yields `Err` at most once, after which it is exhausted. Reaching the
/// declared end of the structure without seeing an end tag, or a tag whose
/// size is smaller than its header or reaches past the end, is reported as
/// [`BootInfoError::MalformedStream`].
#[derive(Debug, Clone)]
pub struct Tags<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Tags<'a> {
    fn step(&mut self) -> Result<Option<Tag<'a>>, BootInfoError> {
        if !self.cursor.has_remaining() {
            return Err(BootInfoError::MalformedStream);
        }

        let start = self.cursor.position();
        let tag_type = self.cursor.read_u32()?;
        let size = self.cursor.read_u32()?;
        trace!("Boot information tag {tag_type} at offset {start:#x}, {size} bytes");

        if tag_type == TAG_TYPE_END {
            return Ok(None);
        }

        let size = usize::try_from(size).map_err(|_| BootInfoError::MalformedStream)?;
        if size < TAG_HEADER_SIZE {
            return Err(BootInfoError::MalformedStream);
        }

        let raw = self.cursor.slice(start, size)?;
        self.cursor.skip_aligned(start, size)?;
        Tag::decode(tag_type, raw).map(Some)
    }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Result<Tag<'a>, BootInfoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.step() {
            Ok(Some(tag)) => Some(Ok(tag)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for Tags<'_> {}

/// Walks the boot information in `buffer` and forwards every decoded tag to `sink`.
///
/// # Errors
/// * [`BootInfoError::Alignment`] if `base_address` is not 8-byte aligned; the
///   sink is not called.
/// * [`BootInfoError::MalformedStream`] / [`BootInfoError::InvalidString`] for
///   inconsistent sizes, truncated payloads, a missing end tag or bad strings.
pub fn parse<'a, S: TagSink<'a> + ?Sized>(
    buffer: &'a [u8],
    base_address: u64,
    sink: &mut S,
) -> Result<(), BootInfoError> {
    BootInfo::new(buffer, base_address)?.walk(sink)
}

/// Walks the boot information at a raw address.
///
/// # Errors
/// Same as [`parse`].
///
/// # Safety
/// See [`BootInfo::from_addr`].
pub unsafe fn parse_at<'a, S: TagSink<'a> + ?Sized>(
    addr: usize,
    sink: &mut S,
) -> Result<(), BootInfoError> {
    // SAFETY: forwarded to the caller.
    unsafe { BootInfo::from_addr(addr) }?.walk(sink)
}
