//! TDirectory streamers and key lists.

use crate::error::Result;
use crate::key::Key;
use crate::rbuffer::RBuffer;

/// The keys of one directory.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    keys: Vec<Key>,
}

impl Directory {
    /// Parse a TDirectory streamer at the cursor and load the key list it
    /// points to from `file`.
    pub fn read_streamer(r: &mut RBuffer, file: &[u8], large_file: bool) -> Result<Self> {
        let version = r.read_u16()?;
        let _datime_c = r.read_u32()?;
        let _datime_m = r.read_u32()?;
        let _nbytes_keys = r.read_u32()?;
        let _nbytes_name = r.read_u32()?;
        let large = version > 1000;
        let _seek_dir = r.read_seek(large)?;
        let _seek_parent = r.read_seek(large)?;
        let seek_keys = r.read_seek(large)?;
        if seek_keys == 0 {
            return Ok(Self::default());
        }
        Self::read_key_list(file, seek_keys as usize, large_file)
    }

    /// Key list record: a TKey for the list itself, a u32 count, the keys.
    pub fn read_key_list(file: &[u8], seek_keys: usize, large_file: bool) -> Result<Self> {
        let mut r = RBuffer::at(file, seek_keys);
        let _header = Key::read(&mut r, large_file)?;
        let n = r.read_u32()? as usize;
        let keys = (0..n).map(|_| Key::read(&mut r, large_file)).collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The highest cycle stored under `name`.
    pub fn find(&self, name: &str) -> Option<&Key> {
        self.keys.iter().filter(|k| k.name == name).max_by_key(|k| k.cycle)
    }
}
