//! # Tag Stream Writer
//!
//! Produces boot information in the same layout a Multiboot2 bootloader
//! hands over. Used by the host tooling to build test images, and by tests.
//! Writes into a caller-provided buffer; nothing is allocated.

use crate::BootInfoError;
use crate::cursor::align8;
use crate::parser::BOOT_INFO_HEADER_SIZE;
use crate::tag::{
    MMAP_ENTRY_SIZE, MemoryMapEntry, TAG_HEADER_SIZE, TAG_TYPE_BASIC_MEMINFO, TAG_TYPE_CMDLINE,
    TAG_TYPE_END, TAG_TYPE_MMAP, TAG_TYPE_MODULE,
};

/// Appends tags to a buffer, then seals it with an end tag.
///
/// After any error the partially written tag is left in place; discard the
/// writer.
///
/// ```rust
/// # use kernel_bootinfo::{BootInfoCollector, TagWriter, parse};
/// let mut buf = [0u8; 128];
/// let mut w = TagWriter::new(&mut buf).unwrap();
/// w.command_line("console=ttyS0").unwrap();
/// let len = w.finish().unwrap();
///
/// let mut collector = BootInfoCollector::new();
/// parse(&buf[..len], 0x1000, &mut collector).unwrap();
/// assert_eq!(collector.cmdline(), Some("console=ttyS0"));
/// ```
pub struct TagWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> TagWriter<'a> {
    /// Starts a new stream at the beginning of `buf`.
    ///
    /// # Errors
    /// [`BootInfoError::BufferTooSmall`] if `buf` cannot even hold the header.
    pub fn new(buf: &'a mut [u8]) -> Result<Self, BootInfoError> {
        if buf.len() < BOOT_INFO_HEADER_SIZE {
            return Err(BootInfoError::BufferTooSmall);
        }
        buf[..BOOT_INFO_HEADER_SIZE].fill(0);
        Ok(Self {
            buf,
            pos: BOOT_INFO_HEADER_SIZE,
        })
    }

    /// Bytes written so far, header included.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Writes a kernel command line tag.
    ///
    /// # Errors
    /// [`BootInfoError::InvalidString`] if `cmdline` contains a NUL byte,
    /// [`BootInfoError::BufferTooSmall`] if the tag does not fit.
    pub fn command_line(&mut self, cmdline: &str) -> Result<&mut Self, BootInfoError> {
        let start = self.begin(TAG_TYPE_CMDLINE)?;
        self.put_c_str(cmdline)?;
        self.end(start)
    }

    /// Writes a module tag for the image at `mod_start..mod_end`.
    ///
    /// # Errors
    /// See [`TagWriter::command_line`].
    pub fn module(
        &mut self,
        mod_start: u32,
        mod_end: u32,
        cmdline: &str,
    ) -> Result<&mut Self, BootInfoError> {
        let start = self.begin(TAG_TYPE_MODULE)?;
        self.put(&mod_start.to_le_bytes())?;
        self.put(&mod_end.to_le_bytes())?;
        self.put_c_str(cmdline)?;
        self.end(start)
    }

    /// Writes a basic memory information tag (values in KiB).
    ///
    /// # Errors
    /// [`BootInfoError::BufferTooSmall`] if the tag does not fit.
    pub fn basic_meminfo(
        &mut self,
        mem_lower: u32,
        mem_upper: u32,
    ) -> Result<&mut Self, BootInfoError> {
        let start = self.begin(TAG_TYPE_BASIC_MEMINFO)?;
        self.put(&mem_lower.to_le_bytes())?;
        self.put(&mem_upper.to_le_bytes())?;
        self.end(start)
    }

    /// Writes a version 0 memory map tag with 24-byte entries.
    ///
    /// # Errors
    /// [`BootInfoError::BufferTooSmall`] if the tag does not fit.
    pub fn memory_map(&mut self, entries: &[MemoryMapEntry]) -> Result<&mut Self, BootInfoError> {
        let start = self.begin(TAG_TYPE_MMAP)?;
        #[allow(clippy::cast_possible_truncation)]
        self.put(&(MMAP_ENTRY_SIZE as u32).to_le_bytes())?;
        self.put(&0u32.to_le_bytes())?;
        for entry in entries {
            self.put(&entry.base_addr.to_le_bytes())?;
            self.put(&entry.length.to_le_bytes())?;
            self.put(&entry.region_type.code().to_le_bytes())?;
            self.put(&0u32.to_le_bytes())?;
        }
        self.end(start)
    }

    /// Writes an arbitrary tag with the given payload.
    ///
    /// # Errors
    /// [`BootInfoError::BufferTooSmall`] if the tag does not fit.
    pub fn raw_tag(&mut self, tag_type: u32, payload: &[u8]) -> Result<&mut Self, BootInfoError> {
        let start = self.begin(tag_type)?;
        self.put(payload)?;
        self.end(start)
    }

    /// Appends the end tag and fills in the total size.
    ///
    /// Returns the length of the finished stream.
    ///
    /// # Errors
    /// [`BootInfoError::BufferTooSmall`] if the end tag does not fit.
    pub fn finish(mut self) -> Result<usize, BootInfoError> {
        let start = self.begin(TAG_TYPE_END)?;
        self.end(start)?;

        let total = u32::try_from(self.pos).map_err(|_| BootInfoError::BufferTooSmall)?;
        self.buf[..4].copy_from_slice(&total.to_le_bytes());
        Ok(self.pos)
    }

    fn begin(&mut self, tag_type: u32) -> Result<usize, BootInfoError> {
        let start = self.pos;
        self.put(&tag_type.to_le_bytes())?;
        self.put(&0u32.to_le_bytes())?;
        Ok(start)
    }

    /// Patches the size of the tag at `start` and pads to the next 8-byte boundary.
    fn end(&mut self, start: usize) -> Result<&mut Self, BootInfoError> {
        debug_assert!(self.pos - start >= TAG_HEADER_SIZE);
        let size = u32::try_from(self.pos - start).map_err(|_| BootInfoError::BufferTooSmall)?;
        self.buf[start + 4..start + 8].copy_from_slice(&size.to_le_bytes());

        let padded = align8(self.pos).ok_or(BootInfoError::BufferTooSmall)?;
        let padding = padded - self.pos;
        self.put(&[0; 8][..padding])?;
        Ok(self)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), BootInfoError> {
        let end = self
            .pos
            .checked_add(bytes.len())
            .ok_or(BootInfoError::BufferTooSmall)?;
        self.buf
            .get_mut(self.pos..end)
            .ok_or(BootInfoError::BufferTooSmall)?
            .copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn put_c_str(&mut self, s: &str) -> Result<(), BootInfoError> {
        if s.as_bytes().contains(&0) {
            return Err(BootInfoError::InvalidString);
        }
        self.put(s.as_bytes())?;
        self.put(&[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stream_is_header_plus_end_tag() {
        let mut buf = [0xFFu8; 32];
        let w = TagWriter::new(&mut buf).unwrap();
        assert_eq!(w.finish(), Ok(16));
        assert_eq!(
            &buf[..16],
            &[16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8, 0, 0, 0]
        );
    }

    #[test]
    fn tags_are_padded_to_eight_bytes() {
        let mut buf = [0u8; 64];
        let mut w = TagWriter::new(&mut buf).unwrap();
        w.command_line("abc").unwrap();
        // header (8) + "abc\0" (4) = 12, padded to 16
        assert_eq!(w.position(), 8 + 16);
        assert_eq!(w.finish(), Ok(32));
        assert_eq!(&buf[12..16], &[12, 0, 0, 0]);
    }

    #[test]
    fn rejects_interior_nul() {
        let mut buf = [0u8; 64];
        let mut w = TagWriter::new(&mut buf).unwrap();
        assert!(matches!(
            w.command_line("a\0b"),
            Err(BootInfoError::InvalidString)
        ));
    }

    #[test]
    fn reports_full_buffer() {
        let mut buf = [0u8; 20];
        let mut w = TagWriter::new(&mut buf).unwrap();
        assert!(matches!(
            w.basic_meminfo(1, 2),
            Err(BootInfoError::BufferTooSmall)
        ));
        assert!(TagWriter::new(&mut [0u8; 4]).is_err());
    }
}
