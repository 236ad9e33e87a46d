//! TKey records: the header ROOT puts in front of every stored object.

use crate::error::Result;
use crate::rbuffer::RBuffer;

/// A parsed TKey header.
#[derive(Debug, Clone)]
pub struct Key {
    /// Key header plus (possibly compressed) object bytes.
    pub n_bytes: u32,
    /// Uncompressed object length.
    pub obj_len: u32,
    /// Length of the key header.
    pub key_len: u16,
    /// Cycle number; higher cycles supersede lower ones.
    pub cycle: u16,
    /// Absolute position of this key in the file.
    pub seek_key: u64,
    pub class_name: String,
    pub name: String,
    pub title: String,
}

/// Name and class of a stored object, as returned by `RootFile::list_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: String,
    pub class_name: String,
    pub cycle: u16,
}

impl From<&Key> for KeyInfo {
    fn from(key: &Key) -> Self {
        Self { name: key.name.clone(), class_name: key.class_name.clone(), cycle: key.cycle }
    }
}

impl Key {
    /// Read a key at the cursor. Keys with version > 1000 (or in large
    /// files) use 64-bit seek pointers.
    pub fn read(r: &mut RBuffer, large_file: bool) -> Result<Self> {
        let n_bytes = r.read_u32()?;
        let version = r.read_u16()?;
        let obj_len = r.read_u32()?;
        let _datime = r.read_u32()?;
        let key_len = r.read_u16()?;
        let cycle = r.read_u16()?;
        let large = large_file || version > 1000;
        let seek_key = r.read_seek(large)?;
        let _seek_pdir = r.read_seek(large)?;
        let class_name = r.read_string()?;
        let name = r.read_string()?;
        let title = r.read_string()?;
        Ok(Self { n_bytes, obj_len, key_len, cycle, seek_key, class_name, name, title })
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.class_name.as_str(), "TDirectoryFile" | "TDirectory")
    }

    /// Whether the stored object bytes are compressed.
    pub fn is_compressed(&self) -> bool {
        self.obj_len != self.n_bytes.saturating_sub(u32::from(self.key_len))
    }
}
