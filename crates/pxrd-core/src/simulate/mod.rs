//! Forward simulation of a powder spectrum: superposes one peak-shape
//! profile per enumerated peak over an evaluation axis and keeps the dense
//! per-peak contribution matrix the Le Bail refiner apportions against.

use crate::domain::{XrdError, XrdResult, XraySpectrum, XraySpectrumData};
use crate::profile::PeakProfile;

/// Axis points evaluated per pass. Keeps the hot loop cache-bounded on fine
/// axes; the accumulation order per point is unchanged, so chunking does not
/// perturb the result.
const AXIS_CHUNK: usize = 1024;

/// Dense `axis_len x peak_len` matrix of per-peak intensity contributions,
/// row-major over axis points.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionMatrix {
    values: Vec<f64>,
    axis_len: usize,
    peak_len: usize,
}

impl ContributionMatrix {
    fn zeros(axis_len: usize, peak_len: usize) -> Self {
        Self {
            values: vec![0.0; axis_len * peak_len],
            axis_len,
            peak_len,
        }
    }

    pub fn axis_len(&self) -> usize {
        self.axis_len
    }

    pub fn peak_len(&self) -> usize {
        self.peak_len
    }

    pub fn value(&self, axis_index: usize, peak_index: usize) -> f64 {
        self.values[axis_index * self.peak_len + peak_index]
    }

    /// Contributions of all peaks at one axis point.
    pub fn row(&self, axis_index: usize) -> &[f64] {
        let start = axis_index * self.peak_len;
        &self.values[start..start + self.peak_len]
    }

    fn row_mut(&mut self, axis_index: usize) -> &mut [f64] {
        let start = axis_index * self.peak_len;
        &mut self.values[start..start + self.peak_len]
    }

    /// Total contribution of each peak over the whole axis.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.peak_len];
        for axis_index in 0..self.axis_len {
            for (sum, &value) in sums.iter_mut().zip(self.row(axis_index)) {
                *sum += value;
            }
        }
        sums
    }
}

/// Simulates a spectrum on `axis` from the peak set's centers and current
/// intensities: `contribution[i][j] = intensity[j] * profile(axis[i],
/// theta2[j])`, aggregate `baseline + sum_j contribution[i][j]`.
pub fn simulate_spectrum(
    peaks: &XraySpectrum,
    axis: &[f64],
    profile: &PeakProfile,
    baseline: f64,
) -> XrdResult<(XraySpectrumData, ContributionMatrix)> {
    if let Some(position) = axis.iter().position(|value| !value.is_finite()) {
        return Err(XrdError::InvalidAxis {
            reason: format!("non-finite value at index {position}"),
        });
    }

    let mut contributions = ContributionMatrix::zeros(axis.len(), peaks.peak_count());
    let mut aggregate = vec![baseline; axis.len()];

    for (chunk_index, chunk) in axis.chunks(AXIS_CHUNK).enumerate() {
        let offset = chunk_index * AXIS_CHUNK;
        for (local_index, &x) in chunk.iter().enumerate() {
            let axis_index = offset + local_index;
            let row = contributions.row_mut(axis_index);
            let mut total = 0.0;
            for (peak_index, (&center, &intensity)) in
                peaks.theta2.iter().zip(&peaks.intensity).enumerate()
            {
                let value = intensity * profile.evaluate(x, center);
                row[peak_index] = value;
                total += value;
            }
            aggregate[axis_index] += total;
        }
    }

    let spectrum = XraySpectrumData::new(axis.to_vec(), aggregate)?;
    Ok((spectrum, contributions))
}
