//! Backing bytes of an open ROOT file.

use std::ops::Deref;

pub enum DataSource {
    Owned(Vec<u8>),
    Mmap(memmap2::Mmap),
}

impl Deref for DataSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mmap(m) => m,
        }
    }
}
