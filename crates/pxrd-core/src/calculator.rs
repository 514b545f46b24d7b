//! Convenience front-end bundling the enumeration, simulation, and
//! refinement parameters a user typically keeps fixed across a session.

use crate::domain::{XrdResult, XraySpectrum, XraySpectrumData};
use crate::lebail::{Refinement, refine_intensities};
use crate::peaks::{
    DEFAULT_THETA2_DIGITS, DEFAULT_WAVELENGTH, PowderPeaksRequest, enumerate_powder_peaks,
};
use crate::profile::PeakProfile;
use crate::simulate::{ContributionMatrix, simulate_spectrum};
use crate::symmetry::SelectionRuleSource;

/// Powder XRD calculator: wavelength, angle rounding, baseline, and the
/// active peak profile.
#[derive(Debug, Clone)]
pub struct XrdCalculator {
    pub wavelength: f64,
    pub theta2_digits: u32,
    pub baseline: f64,
    profile: PeakProfile,
}

impl Default for XrdCalculator {
    fn default() -> Self {
        Self {
            wavelength: DEFAULT_WAVELENGTH,
            theta2_digits: DEFAULT_THETA2_DIGITS,
            baseline: 0.0,
            profile: PeakProfile::default(),
        }
    }
}

impl XrdCalculator {
    pub fn new(wavelength: f64) -> Self {
        Self {
            wavelength,
            ..Self::default()
        }
    }

    /// Replaces the peak profile used by `simulate` and `refine`.
    pub fn with_profile(mut self, profile: PeakProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &PeakProfile {
        &self.profile
    }

    pub fn powder_peaks(
        &self,
        request: &PowderPeaksRequest<'_>,
        rules: &dyn SelectionRuleSource,
    ) -> XrdResult<XraySpectrum> {
        enumerate_powder_peaks(request, rules, self.wavelength, self.theta2_digits)
    }

    pub fn simulate(
        &self,
        peaks: &XraySpectrum,
        axis: &[f64],
    ) -> XrdResult<(XraySpectrumData, ContributionMatrix)> {
        simulate_spectrum(peaks, axis, &self.profile, self.baseline)
    }

    pub fn refine(
        &self,
        peaks: &XraySpectrum,
        experimental: &XraySpectrumData,
        rwp_tolerance: f64,
        max_iterations: usize,
    ) -> XrdResult<Refinement> {
        refine_intensities(
            peaks,
            experimental,
            &self.profile,
            self.baseline,
            rwp_tolerance,
            max_iterations,
        )
    }
}
