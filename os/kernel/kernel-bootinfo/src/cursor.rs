//! Bounded little-endian reads over the boot information buffer.

use crate::BootInfoError;

#[inline]
pub(crate) fn read_u32_le(buf: &[u8], off: usize) -> Result<u32, BootInfoError> {
    let end = off.checked_add(4).ok_or(BootInfoError::MalformedStream)?;
    let s = buf.get(off..end).ok_or(BootInfoError::MalformedStream)?;
    Ok(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

#[inline]
pub(crate) fn read_u64_le(buf: &[u8], off: usize) -> Result<u64, BootInfoError> {
    let end = off.checked_add(8).ok_or(BootInfoError::MalformedStream)?;
    let s = buf.get(off..end).ok_or(BootInfoError::MalformedStream)?;
    Ok(u64::from_le_bytes([
        s[0], s[1], s[2], s[3], s[4], s[5], s[6], s[7],
    ]))
}

/// Rounds `value` up to the next multiple of 8, or `None` on overflow.
#[inline]
pub(crate) const fn align8(value: usize) -> Option<usize> {
    match value.checked_add(7) {
        Some(v) => Some(v & !7),
        None => None,
    }
}

/// A read position together with its hard upper bound.
///
/// The bound is the length of `buf`, which the caller has already clipped to
/// the stream's declared total size. No read ever goes past it.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    pub fn read_u32(&mut self) -> Result<u32, BootInfoError> {
        let value = read_u32_le(self.buf, self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Borrows `len` bytes starting at absolute offset `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<&'a [u8], BootInfoError> {
        let end = start.checked_add(len).ok_or(BootInfoError::MalformedStream)?;
        self.buf.get(start..end).ok_or(BootInfoError::MalformedStream)
    }

    /// Moves to the 8-byte aligned offset following `start + len`.
    ///
    /// Landing past the bound is allowed; the next read reports it.
    pub fn skip_aligned(&mut self, start: usize, len: usize) -> Result<(), BootInfoError> {
        self.pos = start
            .checked_add(len)
            .and_then(align8)
            .ok_or(BootInfoError::MalformedStream)?;
        Ok(())
    }
}
