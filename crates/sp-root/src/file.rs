//! Top-level ROOT file access.

use std::fs;
use std::path::{Path, PathBuf};

use crate::datasource::DataSource;
use crate::decompress::decompress;
use crate::directory::Directory;
use crate::error::{Result, RootError};
use crate::key::{Key, KeyInfo};
use crate::objects::{self, RootObject, TH1Data};
use crate::rbuffer::RBuffer;

const MAGIC: &[u8; 4] = b"root";
/// Smallest file that can hold the header fields we read.
const MIN_LEN: usize = 64;

/// A ROOT file opened read-only.
pub struct RootFile {
    data: DataSource,
    path: PathBuf,
    large: bool,
    /// Offset of the top directory streamer (`fBEGIN + fNbytesName`).
    top_dir: usize,
}

impl RootFile {
    /// Memory-map and open a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        // SAFETY: the mapping is read-only; the input file is not expected to
        // change while a plot is being produced.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::from_source(DataSource::Mmap(mmap), path)
    }

    /// Open a file held in memory.
    pub fn from_bytes(data: Vec<u8>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::from_source(DataSource::Owned(data), path.into())
    }

    fn from_source(data: DataSource, path: PathBuf) -> Result<Self> {
        if data.len() < MIN_LEN || &data[..4] != MAGIC {
            return Err(RootError::BadMagic);
        }
        // Header: magic, fVersion, fBEGIN, fEND, fSeekFree, fNbytesFree,
        // nfree, fNbytesName, ...
        let mut r = RBuffer::at(&data, 4);
        let version = r.read_u32()?;
        let large = version >= 1_000_000;
        let begin = r.read_u32()? as usize;
        let _end = r.read_seek(large)?;
        let _seek_free = r.read_seek(large)?;
        let _nbytes_free = r.read_u32()?;
        let _nfree = r.read_u32()?;
        let nbytes_name = r.read_u32()? as usize;

        let top_dir = begin + nbytes_name;
        if top_dir >= data.len() {
            return Err(RootError::Deserialization(format!(
                "top directory offset {} past end of file ({} bytes)",
                top_dir,
                data.len()
            )));
        }
        Ok(Self { data, path, large, top_dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys of the directory at `dir_path` (`""` for the top level).
    pub fn list_keys(&self, dir_path: &str) -> Result<Vec<KeyInfo>> {
        let mut dir = self.top_directory()?;
        for part in split_path(dir_path) {
            dir = self.enter(&dir, part, dir_path)?;
        }
        Ok(dir.keys().iter().map(KeyInfo::from).collect())
    }

    /// Fetch an object by `/`-separated path, e.g. `shapes_fit_s/eee/wz`.
    pub fn get(&self, path: &str) -> Result<RootObject> {
        let parts: Vec<&str> = split_path(path).collect();
        let (leaf, dirs) =
            parts.split_last().ok_or_else(|| RootError::KeyNotFound(path.to_string()))?;

        let mut dir = self.top_directory()?;
        for part in dirs {
            dir = self.enter(&dir, part, path)?;
        }
        let key = dir.find(leaf).ok_or_else(|| RootError::KeyNotFound(path.to_string()))?;
        let payload = self.payload(key)?;
        objects::read_object(&payload, &key.class_name)
    }

    /// Fetch an object that must be a histogram.
    pub fn get_histogram(&self, path: &str) -> Result<TH1Data> {
        match self.get(path)? {
            RootObject::Hist(h) => Ok(h),
            RootObject::Graph(_) => {
                Err(RootError::UnsupportedClass(format!("{} is a graph, not a histogram", path)))
            }
        }
    }

    fn top_directory(&self) -> Result<Directory> {
        let mut r = RBuffer::at(&self.data, self.top_dir);
        Directory::read_streamer(&mut r, &self.data, self.large)
    }

    fn enter(&self, dir: &Directory, name: &str, full_path: &str) -> Result<Directory> {
        let key = dir
            .find(name)
            .ok_or_else(|| RootError::KeyNotFound(format!("{} (in path {})", name, full_path)))?;
        if !key.is_directory() {
            return Err(RootError::Deserialization(format!(
                "'{}' in path {} is a {}, not a directory",
                name, full_path, key.class_name
            )));
        }
        let payload = self.payload(key)?;
        Directory::read_streamer(&mut RBuffer::new(&payload), &self.data, self.large)
    }

    /// Object bytes behind a key, inflated if needed.
    fn payload(&self, key: &Key) -> Result<Vec<u8>> {
        let start = key.seek_key as usize;
        let end = start + key.n_bytes as usize;
        let record = self.data.get(start..end).ok_or(RootError::BufferUnderflow {
            offset: start,
            need: key.n_bytes as usize,
            have: self.data.len().saturating_sub(start),
        })?;
        let body = record.get(key.key_len as usize..).ok_or_else(|| {
            RootError::Deserialization(format!("key '{}' shorter than its header", key.name))
        })?;
        if key.is_compressed() {
            decompress(body, key.obj_len as usize)
        } else {
            Ok(body.to_vec())
        }
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
