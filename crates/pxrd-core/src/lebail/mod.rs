//! Le Bail intensity refinement.
//!
//! Iteratively apportions the observed intensity of an experimental powder
//! spectrum among the theoretical peaks: each observed point is split across
//! the peaks active there in proportion to their current calculated share,
//! and every peak intensity is rescaled by its aggregated factor. The loop
//! runs until the weighted residual Rwp stops improving or the iteration
//! budget is exhausted.

use crate::domain::{XrdError, XrdResult, XraySpectrum, XraySpectrumData};
use crate::profile::PeakProfile;
use crate::simulate::{ContributionMatrix, simulate_spectrum};

pub const DEFAULT_RWP_TOLERANCE: f64 = 1.0e-2;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Terminal state of the refinement loop. Exhausting the iteration budget is
/// a best-effort outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementStatus {
    Converged,
    Exhausted,
}

/// Result of [`refine_intensities`]: the refined clone of the peak set, the
/// final forward simulation, and the fit statistic it reached.
#[derive(Debug, Clone)]
pub struct Refinement {
    pub peaks: XraySpectrum,
    pub spectrum: XraySpectrumData,
    pub contributions: ContributionMatrix,
    pub rwp: f64,
    pub iterations: usize,
    pub status: RefinementStatus,
}

/// Refines the peak intensities of `peaks` against `experimental` with the
/// Le Bail method. The caller's peak set is never mutated; refinement runs
/// on an owned clone whose intensities start at `max(observed) / 4`.
pub fn refine_intensities(
    peaks: &XraySpectrum,
    experimental: &XraySpectrumData,
    profile: &PeakProfile,
    baseline: f64,
    rwp_tolerance: f64,
    max_iterations: usize,
) -> XrdResult<Refinement> {
    if experimental.is_empty() {
        return Err(XrdError::EmptyDataset);
    }

    let axis = experimental.theta2();
    let observed = experimental.intensity();
    let max_observed = observed.iter().cloned().fold(f64::MIN, f64::max);

    let mut peaks = peaks.clone();
    peaks.intensity = vec![max_observed / 4.0; peaks.peak_count()];

    let (mut spectrum, mut contributions) = simulate_spectrum(&peaks, axis, profile, baseline)?;
    let mut rwp = weighted_profile_residual(spectrum.intensity(), observed);
    let mut status = RefinementStatus::Exhausted;
    let mut iterations = 0;

    for iteration in 1..=max_iterations {
        iterations = iteration;

        let factors = rescale_factors(&contributions, spectrum.intensity(), observed);
        for (intensity, factor) in peaks.intensity.iter_mut().zip(&factors) {
            *intensity *= factor;
        }

        (spectrum, contributions) = simulate_spectrum(&peaks, axis, profile, baseline)?;
        let next_rwp = weighted_profile_residual(spectrum.intensity(), observed);
        // A zero previous residual means the fit cannot improve further.
        let relative_change = if rwp > 0.0 {
            (next_rwp - rwp).abs() / rwp
        } else {
            0.0
        };
        rwp = next_rwp;

        if relative_change < rwp_tolerance {
            status = RefinementStatus::Converged;
            break;
        }
    }

    Ok(Refinement {
        peaks,
        spectrum,
        contributions,
        rwp,
        iterations,
        status,
    })
}

/// `Rwp = sqrt(sum w (obs - calc)^2 / sum w obs^2)` with `w = 1/obs`.
/// Points with zero observed intensity have no defined weight and are
/// skipped from both sums.
pub fn weighted_profile_residual(calculated: &[f64], observed: &[f64]) -> f64 {
    let mut residual = 0.0;
    let mut normalization = 0.0;
    for (&calc, &obs) in calculated.iter().zip(observed) {
        if obs == 0.0 {
            continue;
        }
        let weight = 1.0 / obs;
        residual += weight * (obs - calc) * (obs - calc);
        normalization += weight * obs * obs;
    }
    if normalization == 0.0 {
        return 0.0;
    }
    (residual / normalization).sqrt()
}

/// The Le Bail partition step: each observed point is shared among the peaks
/// contributing there, in proportion `contribution / calculated`, and the
/// shares are aggregated per peak relative to that peak's total calculated
/// contribution. A peak contributing nowhere keeps factor zero; points with
/// zero calculated intensity contribute nothing to the numerator.
fn rescale_factors(
    contributions: &ContributionMatrix,
    calculated: &[f64],
    observed: &[f64],
) -> Vec<f64> {
    let peak_len = contributions.peak_len();
    let mut numerators = vec![0.0; peak_len];

    for (axis_index, (&calc, &obs)) in calculated.iter().zip(observed).enumerate() {
        if calc == 0.0 {
            continue;
        }
        let share = obs / calc;
        for (numerator, &contribution) in numerators.iter_mut().zip(contributions.row(axis_index))
        {
            *numerator += share * contribution;
        }
    }

    contributions
        .column_sums()
        .iter()
        .zip(numerators)
        .map(|(&total, numerator)| if total > 0.0 { numerator / total } else { 0.0 })
        .collect()
}
