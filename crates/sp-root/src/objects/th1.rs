//! TH1D / TH1F streamers.
//!
//! ```text
//! TH1D | TH1F          version + byte count
//!   TH1                version + byte count
//!     TNamed, TAttLine, TAttFill, TAttMarker
//!     fNcells
//!     fXaxis, fYaxis, fZaxis        (TAxis)
//!     fBarOffset, fBarWidth, fEntries, fTsumw, fTsumw2, fTsumwx, fTsumwx2
//!     fMaximum, fMinimum            (v >= 2)
//!     fNormFactor                   (v >= 3)
//!     fContour, fSumw2              (TArrayD)
//!     ...                           skipped through the byte count
//!   TArrayD | TArrayF  cell contents, fNcells values
//! ```

use super::TH1Data;
use crate::error::{Result, RootError};
use crate::rbuffer::RBuffer;

#[derive(Debug, Clone, Copy)]
pub(super) enum Storage {
    Double,
    Float,
}

struct Axis {
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    edges: Vec<f64>,
}

impl Axis {
    fn edges(self) -> Vec<f64> {
        if !self.edges.is_empty() {
            return self.edges;
        }
        let width = (self.x_max - self.x_min) / self.n_bins as f64;
        (0..=self.n_bins).map(|i| self.x_min + i as f64 * width).collect()
    }
}

pub(super) fn read(payload: &[u8], storage: Storage) -> Result<TH1Data> {
    let mut r = RBuffer::new(payload);
    let _outer = r.read_version()?;

    let th1 = r.read_version()?;
    let (name, title) = r.read_tnamed()?;
    r.skip_object()?; // TAttLine
    r.skip_object()?; // TAttFill
    r.skip_object()?; // TAttMarker

    let n_cells = r.read_i32()?;
    let x_axis = read_axis(&mut r)?;
    r.skip_object()?; // fYaxis
    r.skip_object()?; // fZaxis

    let _bar_offset = r.read_i16()?;
    let _bar_width = r.read_i16()?;
    let entries = r.read_f64()?;
    r.skip(4 * 8)?; // fTsumw, fTsumw2, fTsumwx, fTsumwx2
    if th1.version >= 2 {
        r.skip(2 * 8)?; // fMaximum, fMinimum
    }
    if th1.version >= 3 {
        r.skip(8)?; // fNormFactor
    }
    let _contour = r.read_tarray_d()?;
    let sumw2 = r.read_tarray_d()?;
    match th1.end {
        Some(end) => r.seek_forward(end)?,
        None => {
            return Err(RootError::Deserialization(format!(
                "TH1 '{}' written without byte count (version {})",
                name, th1.version
            )));
        }
    }

    let n = r.read_u32()? as usize;
    if n != n_cells as usize {
        return Err(RootError::Deserialization(format!(
            "'{}': {} stored cells but fNcells = {}",
            name, n, n_cells
        )));
    }
    let cells = match storage {
        Storage::Double => r.read_f64s(n)?,
        Storage::Float => r.read_f32s_as_f64(n)?,
    };
    if n != x_axis.n_bins + 2 {
        return Err(RootError::Deserialization(format!(
            "'{}': {} cells for {} bins (only 1D histograms are supported)",
            name, n, x_axis.n_bins
        )));
    }

    let sumw2 = match sumw2.len() {
        0 => None,
        len if len == n => Some(sumw2),
        len => {
            return Err(RootError::Deserialization(format!(
                "'{}': fSumw2 has {} entries, expected {}",
                name, len, n
            )));
        }
    };

    Ok(TH1Data { name, title, edges: x_axis.edges(), cells, sumw2, entries })
}

fn read_axis(r: &mut RBuffer) -> Result<Axis> {
    let v = r.read_version()?;
    let _ = r.read_tnamed()?;
    r.skip_object()?; // TAttAxis
    let n_bins = r.read_i32()?;
    if n_bins < 1 {
        return Err(RootError::Deserialization(format!("axis with {} bins", n_bins)));
    }
    let x_min = r.read_f64()?;
    let x_max = r.read_f64()?;
    let edges = r.read_tarray_d()?;
    if let Some(end) = v.end {
        r.seek_forward(end)?;
    }
    Ok(Axis { n_bins: n_bins as usize, x_min, x_max, edges })
}
