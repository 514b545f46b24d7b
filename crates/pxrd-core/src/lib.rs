//! Powder X-ray diffraction: peak enumeration from lattice geometry and
//! space-group symmetry, spectrum simulation with pluggable peak shapes, and
//! Le Bail refinement of peak intensities against experimental data.

pub mod calculator;
pub mod domain;
pub mod geometry;
pub mod lebail;
pub mod peaks;
pub mod profile;
pub mod simulate;
pub mod symmetry;

pub use calculator::XrdCalculator;
pub use domain::{Hkl, XrdError, XrdErrorKind, XrdResult, XraySpectrum, XraySpectrumData};
pub use geometry::{LatticeAbc, cell_to_abc, inv_d_squared_matrix, minimum_search_bounds};
pub use lebail::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_RWP_TOLERANCE, Refinement, RefinementStatus,
    refine_intensities, weighted_profile_residual,
};
pub use peaks::{
    DEFAULT_THETA2_DIGITS, DEFAULT_WAVELENGTH, PowderPeaksRequest, enumerate_powder_peaks,
};
pub use profile::{DEFAULT_GAUSSIAN_WIDTH, PeakFunctionSpec, PeakProfile};
pub use simulate::{ContributionMatrix, simulate_spectrum};
pub use symmetry::{
    Centering, CenteringRules, CrystalStructure, SelectionRule, SelectionRuleSource,
};
