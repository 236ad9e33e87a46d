//! Inflate ROOT compression blocks.
//!
//! A compressed object is a sequence of blocks, each with a 9-byte header:
//! ```text
//! 0..2  algorithm tag: "ZL" (zlib), "L4" (LZ4), "ZS" (ZSTD), "XZ" (LZMA)
//! 2     method byte
//! 3..6  compressed size, 24-bit little endian
//! 6..9  uncompressed size, 24-bit little endian
//! ```

use std::io::Read;

use crate::error::{Result, RootError};

const HEADER_LEN: usize = 9;

/// Inflate `src` into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut offset = 0;

    while out.len() < expected_len {
        let header = src.get(offset..offset + HEADER_LEN).ok_or_else(|| {
            RootError::Decompression(format!(
                "truncated block header at {} ({} of {} bytes inflated)",
                offset,
                out.len(),
                expected_len
            ))
        })?;
        let c_size = le24(&header[3..6]);
        let u_size = le24(&header[6..9]);
        let start = offset + HEADER_LEN;
        let block = src.get(start..start + c_size).ok_or_else(|| {
            RootError::Decompression(format!(
                "block claims {} compressed bytes, {} remain",
                c_size,
                src.len().saturating_sub(start)
            ))
        })?;

        let inflated = match &header[0..2] {
            b"ZL" => zlib(block, u_size)?,
            b"L4" => lz4(block, u_size)?,
            b"ZS" => zstd(block, u_size)?,
            b"XZ" => xz(block, u_size)?,
            tag => {
                return Err(RootError::Decompression(format!(
                    "unknown compression tag {:?}",
                    String::from_utf8_lossy(tag)
                )));
            }
        };
        if inflated.len() != u_size {
            return Err(RootError::Decompression(format!(
                "block inflated to {} bytes, header says {}",
                inflated.len(),
                u_size
            )));
        }
        out.extend_from_slice(&inflated);
        offset = start + c_size;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "inflated {} bytes, expected {}",
            out.len(),
            expected_len
        )));
    }
    Ok(out)
}

fn zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zlib: {}", e)))?;
    Ok(out)
}

fn lz4(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    // 8-byte xxhash64 checksum precedes the LZ4 payload; not verified.
    let payload = data
        .get(8..)
        .ok_or_else(|| RootError::Decompression("LZ4 block shorter than checksum".into()))?;
    lz4_flex::decompress(payload, expected)
        .map_err(|e| RootError::Decompression(format!("lz4: {}", e)))
}

fn zstd(mut data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut decoder = ruzstd::decoding::StreamingDecoder::new(&mut data)
        .map_err(|e| RootError::Decompression(format!("zstd: {}", e)))?;
    let mut out = Vec::with_capacity(expected);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zstd: {}", e)))?;
    Ok(out)
}

fn xz(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut input = std::io::BufReader::new(data);
    let mut out = Vec::with_capacity(expected);
    lzma_rs::xz_decompress(&mut input, &mut out)
        .map_err(|e| RootError::Decompression(format!("xz: {}", e)))?;
    Ok(out)
}

fn le24(b: &[u8]) -> usize {
    usize::from(b[0]) | usize::from(b[1]) << 8 | usize::from(b[2]) << 16
}
