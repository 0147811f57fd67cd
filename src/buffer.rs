//! Growable output buffer with an inline (stack) region and a heap overflow
//! region, plus the [`Sink`] trait any caller-provided destination must
//! implement.

use core::cmp;

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

use crate::error::FormatError;

/// Size, in bytes, of the buffer's inline region. While the logical length
/// stays at or below this, `Buffer::push`/`append` never touch the
/// allocator — this is what lets `formatted_size`-class callers avoid an
/// allocation entirely for short output, and is exercised by the
/// "no heap under `INLINE_CAP`" property test.
pub const INLINE_CAP: usize = 256;

/// Anything the formatting engine can write bytes into. A `Buffer` is the
/// default implementation; callers may also format directly into their own
/// type (a pre-sized `Vec<u8>`, a ring buffer, ...) by implementing this
/// trait themselves.
pub trait Sink {
    fn push(&mut self, byte: u8) -> Result<(), FormatError>;

    fn append(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        for &b in bytes {
            self.push(b)?;
        }
        Ok(())
    }

    fn size(&self) -> usize;
}

/// The growable output buffer described by the base spec: an inline array
/// while short, a heap `Vec` once output grows past it. Moving a buffer
/// that's still in its inline form is a copy (there's nothing to transfer
/// ownership of); moving one that has spilled transfers the `Vec` as usual.
#[derive(Clone)]
pub enum Buffer {
    Inline { data: [u8; INLINE_CAP], len: usize },
    #[cfg(feature = "alloc")]
    Heap(Vec<u8>),
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::Inline {
            data: [0; INLINE_CAP],
            len: 0,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Inline { len, .. } => *len,
            #[cfg(feature = "alloc")]
            Self::Heap(v) => v.len(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Inline { len, .. } => *len = 0,
            #[cfg(feature = "alloc")]
            Self::Heap(v) => v.clear(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Inline { data, len } => &data[..*len],
            #[cfg(feature = "alloc")]
            Self::Heap(v) => v.as_slice(),
        }
    }

    /// Borrows the buffer's contents as `str`. Never fails: every writer in
    /// this crate only ever appends bytes taken from a `&str`, a single
    /// `char` re-encoded to UTF-8, or ASCII fill bytes.
    pub fn as_str(&self) -> &str {
        // SAFETY: see the comment on `into_string` below; the same
        // invariant holds for any prefix of the buffer at any point.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Moves from the inline tier to the heap tier, copying what's already
    /// written and reserving `additional` more bytes. Growth uses
    /// `max(requested, floor(old_capacity * 3 / 2))`, same as the spec's
    /// growth policy for an already-heap buffer.
    #[cfg(feature = "alloc")]
    fn spill(&mut self, additional: usize) {
        if let Self::Inline { data, len } = self {
            let old_cap = INLINE_CAP;
            let required = *len + additional;
            let new_cap = cmp::max(required, old_cap * 3 / 2);
            let mut v = Vec::with_capacity(new_cap);
            v.extend_from_slice(&data[..*len]);
            *self = Self::Heap(v);
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), FormatError> {
        self.append(core::slice::from_ref(&byte))
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        match self {
            Self::Inline { data, len } => {
                if *len + bytes.len() <= INLINE_CAP {
                    data[*len..*len + bytes.len()].copy_from_slice(bytes);
                    *len += bytes.len();
                    return Ok(());
                }
                #[cfg(feature = "alloc")]
                {
                    self.spill(bytes.len());
                    return self.append(bytes);
                }
                #[cfg(not(feature = "alloc"))]
                {
                    return Err(FormatError::Allocation);
                }
            }
            #[cfg(feature = "alloc")]
            Self::Heap(v) => {
                if v.capacity() < v.len() + bytes.len() {
                    let new_cap = cmp::max(v.len() + bytes.len(), v.capacity() * 3 / 2);
                    v.reserve(new_cap - v.capacity());
                }
                v.extend_from_slice(bytes);
                Ok(())
            }
        }
    }

    /// Sets the logical length to `new_size`, growing capacity as needed.
    /// Newly exposed bytes are zeroed (the base spec only requires them to
    /// be *writable*, but zeroing keeps `as_bytes` well-defined even before
    /// a caller fills the reserved region).
    pub fn grow_to(&mut self, new_size: usize) -> Result<(), FormatError> {
        let current = self.size();
        if new_size <= current {
            match self {
                Self::Inline { len, .. } => *len = new_size,
                #[cfg(feature = "alloc")]
                Self::Heap(v) => v.truncate(new_size),
            }
            return Ok(());
        }
        let zeros = [0u8; 64];
        let mut remaining = new_size - current;
        while remaining > 0 {
            let chunk = cmp::min(remaining, zeros.len());
            self.append(&zeros[..chunk])?;
            remaining -= chunk;
        }
        Ok(())
    }

    /// Reserves `n` fresh bytes prefilled with `value` and returns their
    /// offset into the buffer, so the caller can later overwrite them
    /// in-place (used by the numeric formatters, which write digits
    /// right-to-left into a reserved run).
    pub fn reserve_and_fill(&mut self, n: usize, value: u8) -> Result<usize, FormatError> {
        let offset = self.size();
        let filler = [value; 64];
        let mut remaining = n;
        while remaining > 0 {
            let chunk = cmp::min(remaining, filler.len());
            self.append(&filler[..chunk])?;
            remaining -= chunk;
        }
        Ok(offset)
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        match self {
            Self::Inline { data, len } => &mut data[..*len],
            #[cfg(feature = "alloc")]
            Self::Heap(v) => v.as_mut_slice(),
        }
    }

    /// Consumes the buffer, returning its contents as a `String`. The
    /// engine only ever writes valid UTF-8 into a `Buffer` (ASCII padding,
    /// ASCII/UTF-8 literal text, and UTF-8 argument text), so this never
    /// needs to re-validate.
    #[cfg(feature = "alloc")]
    pub fn into_string(self) -> String {
        // SAFETY: every writer in this crate only ever appends bytes taken
        // from a `&str`, single `char`s re-encoded to UTF-8, or ASCII fill
        // bytes, so the buffer's content is valid UTF-8 by construction.
        unsafe { String::from_utf8_unchecked(self.into_bytes()) }
    }

    #[cfg(feature = "alloc")]
    fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Inline { data, len } => data[..len].to_vec(),
            Self::Heap(v) => v,
        }
    }
}

impl Sink for Buffer {
    fn push(&mut self, byte: u8) -> Result<(), FormatError> {
        Buffer::push(self, byte)
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        Buffer::append(self, bytes)
    }

    fn size(&self) -> usize {
        Buffer::size(self)
    }
}

/// A sink over a caller-provided fixed region (used by `format_to_n`).
/// Writes past capacity are silently dropped, but `logical_size` still
/// reports the length that would have been written, so the caller can
/// detect truncation the same way `snprintf` callers check its return
/// value against the buffer size.
pub struct FixedSink<'a> {
    data: &'a mut [u8],
    written: usize,
    logical_size: usize,
}

impl<'a> FixedSink<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            written: 0,
            logical_size: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn logical_size(&self) -> usize {
        self.logical_size
    }
}

impl Sink for FixedSink<'_> {
    fn push(&mut self, byte: u8) -> Result<(), FormatError> {
        if self.written < self.data.len() {
            self.data[self.written] = byte;
            self.written += 1;
        }
        self.logical_size += 1;
        Ok(())
    }

    fn size(&self) -> usize {
        self.logical_size
    }
}

/// A sink that only counts bytes, never storing them; backs
/// `formatted_size` so measurement runs through the exact same formatting
/// code path as a real write, rather than a separate estimator that could
/// drift out of sync.
#[derive(Default)]
pub struct CountingSink {
    size: usize,
}

impl Sink for CountingSink {
    fn push(&mut self, _byte: u8) -> Result<(), FormatError> {
        self.size += 1;
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.size += bytes.len();
        Ok(())
    }

    fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_region_holds_short_output() {
        let mut buf = Buffer::new();
        buf.append(b"hello").unwrap();
        assert!(matches!(buf, Buffer::Inline { .. }));
        assert_eq!(buf.as_bytes(), b"hello");
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn spills_to_heap_past_inline_capacity() {
        let mut buf = Buffer::new();
        let chunk = [b'x'; INLINE_CAP];
        buf.append(&chunk).unwrap();
        assert!(matches!(buf, Buffer::Inline { .. }));
        buf.push(b'y').unwrap();
        assert!(matches!(buf, Buffer::Heap(_)));
        assert_eq!(buf.size(), INLINE_CAP + 1);
    }

    #[test]
    fn fixed_sink_truncates_but_reports_logical_size() {
        let mut backing = [0u8; 4];
        let mut sink = FixedSink::new(&mut backing);
        sink.append(b"hello world").unwrap();
        assert_eq!(&backing, b"hell");
        assert_eq!(sink.logical_size(), 11);
        assert_eq!(sink.written(), 4);
    }
}
