//! Big-endian cursor over ROOT streamer bytes.

use crate::error::{Result, RootError};

/// `kByteCountMask`: set on the leading u32 of a streamed object that carries
/// a byte count.
const BYTE_COUNT_MASK: u32 = 0x4000_0000;

/// `kIsReferenced` bit of `TObject::fBits`.
const IS_REFERENCED: u32 = 0x0000_0010;

/// A version header read from the stream.
#[derive(Debug, Clone, Copy)]
pub struct Version {
    /// Class version.
    pub version: u16,
    /// Absolute end of the object when a byte count was written.
    pub end: Option<usize>,
}

/// Read cursor over a decompressed object payload (or the whole file).
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.data.len()).ok_or(
            RootError::BufferUnderflow {
                offset: self.pos,
                need: n,
                have: self.data.len().saturating_sub(self.pos),
            },
        )?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.array()?))
    }

    /// 32-bit seek pointer, or 64-bit when `large`.
    pub fn read_seek(&mut self, large: bool) -> Result<u64> {
        if large { self.read_u64() } else { self.read_u32().map(u64::from) }
    }

    /// ROOT string: one length byte, or `255` followed by a u32 length.
    pub fn read_string(&mut self) -> Result<String> {
        let len = match self.read_u8()? {
            255 => self.read_u32()? as usize,
            n => n as usize,
        };
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    /// Streamer version header. The byte count, when present, covers
    /// everything after the leading u32 (the version included).
    pub fn read_version(&mut self) -> Result<Version> {
        let start = self.pos;
        let raw = self.read_u32()?;
        if raw & BYTE_COUNT_MASK != 0 {
            let count = (raw & !BYTE_COUNT_MASK) as usize;
            let version = self.read_u16()?;
            Ok(Version { version, end: Some(start + 4 + count) })
        } else {
            self.pos = start;
            Ok(Version { version: self.read_u16()?, end: None })
        }
    }

    /// Skip an embedded object that was written with a byte count.
    pub fn skip_object(&mut self) -> Result<()> {
        let v = self.read_version()?;
        if let Some(end) = v.end {
            self.seek_forward(end)?;
        }
        Ok(())
    }

    /// Move to `end` if it lies ahead of the cursor.
    pub fn seek_forward(&mut self, end: usize) -> Result<()> {
        if end > self.data.len() {
            return Err(RootError::Deserialization(format!(
                "object end {} past buffer length {}",
                end,
                self.data.len()
            )));
        }
        if end > self.pos {
            self.pos = end;
        }
        Ok(())
    }

    /// `TObject` body: version, fUniqueID, fBits (+2 bytes pidf if referenced).
    pub fn read_tobject(&mut self) -> Result<()> {
        let _version = self.read_u16()?;
        let _unique_id = self.read_u32()?;
        let bits = self.read_u32()?;
        if bits & IS_REFERENCED != 0 {
            self.skip(2)?;
        }
        Ok(())
    }

    /// `TNamed`: version header, TObject, fName, fTitle.
    pub fn read_tnamed(&mut self) -> Result<(String, String)> {
        let v = self.read_version()?;
        self.read_tobject()?;
        let name = self.read_string()?;
        let title = self.read_string()?;
        if let Some(end) = v.end {
            self.seek_forward(end)?;
        }
        Ok((name, title))
    }

    pub fn read_f64s(&mut self, n: usize) -> Result<Vec<f64>> {
        (0..n).map(|_| self.read_f64()).collect()
    }

    pub fn read_f32s_as_f64(&mut self, n: usize) -> Result<Vec<f64>> {
        (0..n).map(|_| self.read_f32().map(f64::from)).collect()
    }

    /// `TArrayD`: u32 count followed by the values.
    pub fn read_tarray_d(&mut self) -> Result<Vec<f64>> {
        let n = self.read_u32()? as usize;
        self.read_f64s(n)
    }

    /// Pointer-to-array member (`Double_t* fX //[fNpoints]`): one flag byte,
    /// then `n` values when the flag is set.
    pub fn read_counted_f64s(&mut self, n: usize) -> Result<Vec<f64>> {
        match self.read_u8()? {
            0 => Ok(vec![0.0; n]),
            _ => self.read_f64s(n),
        }
    }
}
