//! Enumeration of the theoretical peaks of a powder XRD spectrum.
//!
//! Walks the dense integer box of Miller indices that covers the sphere
//! `inv_d < 2 / wavelength`, applies the space-group selection rule, derives
//! each reflection's diffraction angle, and merges reflections whose rounded
//! angles coincide into degeneracy groups.

use crate::domain::{Hkl, XrdError, XrdResult, XraySpectrum};
use crate::geometry::{
    LatticeAbc, cell_to_abc, inv_d_for_hkl, inv_d_squared_matrix, minimum_search_bounds,
};
use crate::symmetry::{CrystalStructure, SelectionRule, SelectionRuleSource};
use tracing::warn;

/// Cu K-alpha, the conventional laboratory wavelength, in Angstroms.
pub const DEFAULT_WAVELENGTH: f64 = 1.54056;

/// Rounding (decimal digits of theta2 in degrees) within which two
/// reflections count as the same peak.
pub const DEFAULT_THETA2_DIGITS: u32 = 6;

/// Input to [`enumerate_powder_peaks`]: exactly one of `latt_abc` and
/// `structure` must be supplied. With a direct lattice the selection rule
/// comes from the optional `(international number, setting)` pair; with a
/// structure it comes from the structure's hall number.
#[derive(Default)]
pub struct PowderPeaksRequest<'a> {
    pub latt_abc: Option<LatticeAbc>,
    pub structure: Option<&'a dyn CrystalStructure>,
    pub spacegroup: Option<(u16, u16)>,
}

impl<'a> PowderPeaksRequest<'a> {
    pub fn from_lattice(latt_abc: LatticeAbc) -> Self {
        Self {
            latt_abc: Some(latt_abc),
            ..Self::default()
        }
    }

    pub fn from_structure(structure: &'a dyn CrystalStructure) -> Self {
        Self {
            latt_abc: None,
            structure: Some(structure),
            spacegroup: None,
        }
    }

    pub fn with_spacegroup(mut self, number: u16, setting: u16) -> Self {
        self.spacegroup = Some((number, setting));
        self
    }
}

/// Enumerates the distinct diffraction angles of a powder pattern.
///
/// A failed selection-rule lookup is recoverable: enumeration proceeds with
/// every reflection accepted and the condition is logged as a warning, so
/// the resulting peak list may be over-complete but downstream simulation
/// and refinement stay usable.
pub fn enumerate_powder_peaks(
    request: &PowderPeaksRequest<'_>,
    rules: &dyn SelectionRuleSource,
    wavelength: f64,
    theta2_digits: u32,
) -> XrdResult<XraySpectrum> {
    if !(wavelength.is_finite() && wavelength > 0.0) {
        return Err(XrdError::InvalidWavelength { value: wavelength });
    }

    let (lattice, rule) = match (&request.latt_abc, request.structure) {
        (Some(_), Some(_)) | (None, None) => return Err(XrdError::AmbiguousLatticeSource),
        (Some(latt_abc), None) => {
            let rule = match request.spacegroup {
                None => SelectionRule::accept_all(),
                Some((number, setting)) => {
                    recover_missing_rule(rules.rule_from_international(number, setting))?
                }
            };
            (*latt_abc, rule)
        }
        (None, Some(structure)) => {
            let lattice = cell_to_abc(&structure.cell())?;
            let rule = recover_missing_rule(rules.rule_from_hall(structure.hall_number()))?;
            (lattice, rule)
        }
    };

    let inv_d_max = 2.0 / wavelength;
    let matrix = inv_d_squared_matrix(&lattice)?;
    let [h_max, k_max, l_max] = minimum_search_bounds(inv_d_max, &lattice);

    // Deterministic traversal order: h outermost, l innermost. The first
    // reflection encountered for a rounded angle is that peak's
    // representative, so this order is part of the reproducibility contract.
    let mut reflections: Vec<(f64, Hkl, f64)> = Vec::new();
    for h in -h_max..=h_max {
        for k in -k_max..=k_max {
            for l in -l_max..=l_max {
                let hkl = Hkl::new(h, k, l);
                let inv_d = inv_d_for_hkl(&matrix, hkl);
                // Excludes (0,0,0) and the 2theta = 0 / 2theta = pi
                // singularities of the downstream geometry factor.
                if inv_d <= 0.0 || inv_d >= inv_d_max {
                    continue;
                }
                if !rule.allows(hkl) {
                    continue;
                }

                let theta = (inv_d / inv_d_max).asin();
                let theta2 = round_to_digits(2.0 * theta.to_degrees(), theta2_digits);
                reflections.push((theta2, hkl, inv_d));
            }
        }
    }

    Ok(merge_degenerate_angles(reflections, wavelength))
}

fn recover_missing_rule(lookup: XrdResult<SelectionRule>) -> XrdResult<SelectionRule> {
    match lookup {
        Ok(rule) => Ok(rule),
        Err(error) if error.is_recoverable() => {
            warn!(%error, "selection rule unavailable, accepting all reflections");
            Ok(SelectionRule::accept_all())
        }
        Err(error) => Err(error),
    }
}

/// Angles stay below 360, so 12 decimal digits already exceed f64 precision;
/// larger requests are clamped rather than overflowing the exponent.
const MAX_THETA2_DIGITS: u32 = 12;

fn round_to_digits(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits.min(MAX_THETA2_DIGITS) as i32);
    (value * factor).round() / factor
}

/// Groups reflections sharing a rounded angle. Sorts (angle, enumeration
/// index) pairs stably so that within each distinct angle the smallest
/// original index comes first and provides the representative hkl and
/// inverse d-spacing.
fn merge_degenerate_angles(reflections: Vec<(f64, Hkl, f64)>, wavelength: f64) -> XraySpectrum {
    let mut order: Vec<usize> = (0..reflections.len()).collect();
    order.sort_by(|&lhs, &rhs| reflections[lhs].0.total_cmp(&reflections[rhs].0));

    let mut peaks = XraySpectrum::empty(wavelength);
    for &index in &order {
        let (theta2, hkl, inv_d) = reflections[index];
        match peaks.theta2.last() {
            Some(&last) if last == theta2 => {
                peaks
                    .hkl_groups
                    .last_mut()
                    .expect("group exists for the last angle")
                    .push(hkl);
            }
            _ => {
                peaks.theta2.push(theta2);
                peaks.hkl_groups.push(vec![hkl]);
                peaks.hkl_unique.push(hkl);
                peaks.inv_d.push(inv_d);
                peaks.intensity.push(0.0);
            }
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_THETA2_DIGITS, DEFAULT_WAVELENGTH, PowderPeaksRequest, enumerate_powder_peaks,
        round_to_digits,
    };
    use crate::domain::XrdError;
    use crate::geometry::{LatticeAbc, Matrix3};
    use crate::symmetry::{CenteringRules, CrystalStructure};
    use std::f64::consts::FRAC_PI_2;

    fn test_lattice() -> LatticeAbc {
        LatticeAbc::new([3.0, 5.0, 10.0], [FRAC_PI_2; 3]).expect("valid lattice")
    }

    fn enumerate(request: &PowderPeaksRequest<'_>) -> crate::domain::XraySpectrum {
        enumerate_powder_peaks(
            request,
            &CenteringRules,
            DEFAULT_WAVELENGTH,
            DEFAULT_THETA2_DIGITS,
        )
        .expect("enumeration")
    }

    #[test]
    fn rejects_neither_and_both_lattice_sources() {
        struct Cubic;
        impl CrystalStructure for Cubic {
            fn cell(&self) -> Matrix3 {
                [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]
            }
            fn hall_number(&self) -> u16 {
                1
            }
        }

        let neither = PowderPeaksRequest::default();
        assert_eq!(
            enumerate_powder_peaks(&neither, &CenteringRules, DEFAULT_WAVELENGTH, 6)
                .expect_err("no lattice source"),
            XrdError::AmbiguousLatticeSource
        );

        let cubic = Cubic;
        let mut both = PowderPeaksRequest::from_lattice(test_lattice());
        both.structure = Some(&cubic);
        assert_eq!(
            enumerate_powder_peaks(&both, &CenteringRules, DEFAULT_WAVELENGTH, 6)
                .expect_err("two lattice sources"),
            XrdError::AmbiguousLatticeSource
        );
    }

    #[test]
    fn rejects_non_positive_wavelength() {
        let request = PowderPeaksRequest::from_lattice(test_lattice());
        let error = enumerate_powder_peaks(&request, &CenteringRules, 0.0, 6)
            .expect_err("zero wavelength");
        assert_eq!(error, XrdError::InvalidWavelength { value: 0.0 });
    }

    #[test]
    fn angles_are_strictly_ascending_and_distinct() {
        let peaks = enumerate(&PowderPeaksRequest::from_lattice(test_lattice()));
        assert!(!peaks.is_empty());
        for window in peaks.theta2.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn selection_rules_only_remove_reflections() {
        let no_symmetry = enumerate(&PowderPeaksRequest::from_lattice(test_lattice()));
        let with_symmetry =
            enumerate(&PowderPeaksRequest::from_lattice(test_lattice()).with_spacegroup(230, 1));
        assert!(no_symmetry.peak_count() >= with_symmetry.peak_count());
        assert!(no_symmetry.reflection_count() >= with_symmetry.reflection_count());
        assert!(with_symmetry.peak_count() > 0);
    }

    #[test]
    fn degenerate_angles_merge_with_first_encountered_representative() {
        // Cubic cell: (h,k,l) permutations are exactly degenerate, so the
        // first peak groups all +-1 0 0 reflections.
        let cubic = LatticeAbc::new([4.0, 4.0, 4.0], [FRAC_PI_2; 3]).expect("cubic");
        let peaks = enumerate(&PowderPeaksRequest::from_lattice(cubic));

        assert_eq!(peaks.hkl_groups[0].len(), 6);
        // h runs outermost from -h_max, so (-1, 0, 0) is encountered first.
        assert_eq!(peaks.hkl_unique[0], crate::domain::Hkl::new(-1, 0, 0));
        assert!((peaks.inv_d[0] - 0.25).abs() < 1.0e-12);
    }

    #[test]
    fn intensities_start_at_zero() {
        let peaks = enumerate(&PowderPeaksRequest::from_lattice(test_lattice()));
        assert_eq!(peaks.intensity.len(), peaks.peak_count());
        assert!(peaks.intensity.iter().all(|&value| value == 0.0));
        assert_eq!(peaks.wavelength, DEFAULT_WAVELENGTH);
    }

    #[test]
    fn unknown_spacegroup_falls_back_to_accepting_all() {
        let no_symmetry = enumerate(&PowderPeaksRequest::from_lattice(test_lattice()));
        let unknown =
            enumerate(&PowderPeaksRequest::from_lattice(test_lattice()).with_spacegroup(231, 1));
        assert_eq!(no_symmetry, unknown);
    }

    #[test]
    fn structure_path_resolves_lattice_through_the_cell() {
        struct Cubic;
        impl CrystalStructure for Cubic {
            fn cell(&self) -> Matrix3 {
                [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]
            }
            fn hall_number(&self) -> u16 {
                // CenteringRules cannot resolve hall numbers; enumeration
                // falls back to accepting every reflection.
                523
            }
        }

        let cubic = Cubic;
        let from_structure = enumerate(&PowderPeaksRequest::from_structure(&cubic));
        let direct = LatticeAbc::new([4.0, 4.0, 4.0], [FRAC_PI_2; 3]).expect("cubic");
        let from_lattice = enumerate(&PowderPeaksRequest::from_lattice(direct));
        assert_eq!(from_structure, from_lattice);
    }

    #[test]
    fn rounding_controls_degeneracy_merging() {
        assert_eq!(round_to_digits(12.3456789, 3), 12.346);
        assert_eq!(round_to_digits(12.3456789, 0), 12.0);
        // Oversized precision requests clamp instead of wrapping negative.
        assert_eq!(
            round_to_digits(12.3456789, u32::MAX),
            round_to_digits(12.3456789, 12)
        );

        // Coarse rounding merges angles that fine rounding keeps apart.
        let fine = enumerate_powder_peaks(
            &PowderPeaksRequest::from_lattice(test_lattice()),
            &CenteringRules,
            DEFAULT_WAVELENGTH,
            6,
        )
        .expect("fine");
        let coarse = enumerate_powder_peaks(
            &PowderPeaksRequest::from_lattice(test_lattice()),
            &CenteringRules,
            DEFAULT_WAVELENGTH,
            0,
        )
        .expect("coarse");
        assert!(coarse.peak_count() <= fine.peak_count());
        assert_eq!(coarse.reflection_count(), fine.reflection_count());

        // An absurd digit count must not merge every angle into one peak.
        let extreme = enumerate_powder_peaks(
            &PowderPeaksRequest::from_lattice(test_lattice()),
            &CenteringRules,
            DEFAULT_WAVELENGTH,
            u32::MAX,
        )
        .expect("extreme");
        assert!(extreme.peak_count() >= fine.peak_count());
    }
}
