//! TGraph, TGraphErrors and TGraphAsymmErrors streamers.
//!
//! The derived classes stream the TGraph base first, then their error
//! arrays as pointer members (flag byte + `fNpoints` values each).

use super::GraphData;
use crate::error::Result;
use crate::rbuffer::RBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Errors {
    None,
    Symmetric,
    Asymmetric,
}

pub(super) fn read(payload: &[u8], errors: Errors) -> Result<GraphData> {
    let mut r = RBuffer::new(payload);
    if errors != Errors::None {
        let _derived = r.read_version()?;
    }

    let base = r.read_version()?;
    let (name, title) = r.read_tnamed()?;
    r.skip_object()?; // TAttLine
    r.skip_object()?; // TAttFill
    r.skip_object()?; // TAttMarker
    let n = r.read_i32()?.max(0) as usize;
    let x = r.read_counted_f64s(n)?;
    let y = r.read_counted_f64s(n)?;
    if let Some(end) = base.end {
        r.seek_forward(end)?;
    }

    let zeros = || vec![0.0; n];
    let (ex_low, ex_high, ey_low, ey_high) = match errors {
        Errors::None => (zeros(), zeros(), zeros(), zeros()),
        Errors::Symmetric => {
            let ex = r.read_counted_f64s(n)?;
            let ey = r.read_counted_f64s(n)?;
            (ex.clone(), ex, ey.clone(), ey)
        }
        Errors::Asymmetric => (
            r.read_counted_f64s(n)?,
            r.read_counted_f64s(n)?,
            r.read_counted_f64s(n)?,
            r.read_counted_f64s(n)?,
        ),
    };

    Ok(GraphData { name, title, x, y, ex_low, ex_high, ey_low, ey_high })
}
