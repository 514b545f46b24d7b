pub mod errors;

pub use errors::{XrdError, XrdErrorKind, XrdResult};

use serde::{Deserialize, Serialize};

/// Miller indices of a crystallographic reflection plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hkl {
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl Hkl {
    pub const fn new(h: i32, k: i32, l: i32) -> Self {
        Self { h, k, l }
    }
}

impl std::fmt::Display for Hkl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Through pad so width and alignment flags apply to the whole triple.
        f.pad(&format!("({} {} {})", self.h, self.k, self.l))
    }
}

/// The theoretical peak set of a powder pattern.
///
/// All five sequence fields share the same length N. `theta2` is strictly
/// ascending with no duplicates at the rounding precision it was built with;
/// `hkl_groups[i]` holds every reflection that lands on `theta2[i]` after
/// rounding, `hkl_unique[i]` and `inv_d[i]` describe the first-encountered
/// member of that group. `intensity` is the only field meant to change after
/// enumeration: it starts at zero and is overwritten by the Le Bail refiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XraySpectrum {
    pub theta2: Vec<f64>,
    pub hkl_groups: Vec<Vec<Hkl>>,
    pub hkl_unique: Vec<Hkl>,
    pub inv_d: Vec<f64>,
    pub intensity: Vec<f64>,
    pub wavelength: f64,
}

impl XraySpectrum {
    pub fn empty(wavelength: f64) -> Self {
        Self {
            theta2: Vec::new(),
            hkl_groups: Vec::new(),
            hkl_unique: Vec::new(),
            inv_d: Vec::new(),
            intensity: Vec::new(),
            wavelength,
        }
    }

    /// Number of distinct diffraction angles.
    pub fn peak_count(&self) -> usize {
        self.theta2.len()
    }

    /// Total number of reflections across all degeneracy groups.
    pub fn reflection_count(&self) -> usize {
        self.hkl_groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.theta2.is_empty()
    }
}

/// A simulated or experimental spectrum: intensity sampled on a theta2 axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XraySpectrumData {
    theta2: Vec<f64>,
    intensity: Vec<f64>,
}

impl XraySpectrumData {
    /// Wraps an axis/intensity pair, validating only that the shapes match.
    /// The arrays are stored untouched so a round-trip is bit-identical.
    pub fn new(theta2: Vec<f64>, intensity: Vec<f64>) -> XrdResult<Self> {
        if theta2.len() != intensity.len() {
            return Err(XrdError::DatasetShapeMismatch {
                axis_len: theta2.len(),
                intensity_len: intensity.len(),
            });
        }
        Ok(Self { theta2, intensity })
    }

    pub fn theta2(&self) -> &[f64] {
        &self.theta2
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn len(&self) -> usize {
        self.theta2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta2.is_empty()
    }
}
