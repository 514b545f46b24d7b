//! Space-group selection rules for powder diffraction.
//!
//! A [`SelectionRule`] decides whether a reflection is allowed (non-extinct).
//! Rules are resolved through the [`SelectionRuleSource`] seam; the shipped
//! [`CenteringRules`] table derives the general-position reflection condition
//! of each of the 230 international space groups from its Bravais centering.
//! Zonal glide/screw extinctions and hall-number keys need a richer source
//! plugged in behind the same trait.

mod table;

pub use table::Centering;

use crate::domain::{Hkl, XrdError, XrdResult};
use crate::geometry::Matrix3;
use std::sync::Arc;

/// A predicate over Miller indices: `true` means the reflection is allowed.
#[derive(Clone)]
pub struct SelectionRule {
    predicate: Arc<dyn Fn(Hkl) -> bool + Send + Sync>,
}

impl SelectionRule {
    /// The fallback rule: every reflection is allowed.
    pub fn accept_all() -> Self {
        Self::from_predicate(|_| true)
    }

    pub fn from_predicate(predicate: impl Fn(Hkl) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// General-position reflection condition of a Bravais centering.
    pub fn from_centering(centering: Centering) -> Self {
        Self::from_predicate(move |hkl| centering.allows(hkl))
    }

    pub fn allows(&self, hkl: Hkl) -> bool {
        (self.predicate)(hkl)
    }
}

impl std::fmt::Debug for SelectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRule").finish_non_exhaustive()
    }
}

/// Resolves selection rules from space-group identifiers.
pub trait SelectionRuleSource {
    /// Rule for an international space-group number and setting choice.
    fn rule_from_international(&self, number: u16, setting: u16) -> XrdResult<SelectionRule>;

    /// Rule for a spglib-style hall number.
    fn rule_from_hall(&self, hall: u16) -> XrdResult<SelectionRule>;
}

/// The lattice-and-symmetry view of an atomic structure that peak
/// enumeration needs. Space-group identification itself (the spglib role)
/// stays with the implementer.
pub trait CrystalStructure {
    /// Cartesian cell matrix, lattice vectors as rows, in Angstroms.
    fn cell(&self) -> Matrix3;

    /// Hall number of the structure's space group.
    fn hall_number(&self) -> u16;
}

/// Selection rules from Bravais centering, covering the general-position
/// reflection conditions of all 230 space groups.
///
/// Setting 1 is the standard setting. Setting 2 is the alternate origin or
/// cell choice, which shares the centering, except for the seven
/// rhombohedral groups where it selects rhombohedral axes (primitive, no
/// condition). Anything else is reported as not found, which enumeration
/// treats as recoverable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteringRules;

impl CenteringRules {
    pub fn centering_of(number: u16) -> Option<Centering> {
        table::centering_for_group(number)
    }
}

impl SelectionRuleSource for CenteringRules {
    fn rule_from_international(&self, number: u16, setting: u16) -> XrdResult<SelectionRule> {
        let not_found = || XrdError::SelectionRuleNotFound { number, setting };
        let centering = table::centering_for_group(number).ok_or_else(not_found)?;
        match setting {
            1 => Ok(SelectionRule::from_centering(centering)),
            2 if centering == Centering::R => Ok(SelectionRule::accept_all()),
            2 => Ok(SelectionRule::from_centering(centering)),
            _ => Err(not_found()),
        }
    }

    fn rule_from_hall(&self, hall: u16) -> XrdResult<SelectionRule> {
        // Hall-number resolution needs the full spglib hall table; the
        // centering table is keyed by international number only.
        Err(XrdError::HallNotFound { hall })
    }
}

#[cfg(test)]
mod tests {
    use super::{Centering, CenteringRules, SelectionRule, SelectionRuleSource};
    use crate::domain::{Hkl, XrdError};

    #[test]
    fn accept_all_allows_everything() {
        let rule = SelectionRule::accept_all();
        assert!(rule.allows(Hkl::new(1, 0, 0)));
        assert!(rule.allows(Hkl::new(-3, 7, 5)));
    }

    #[test]
    fn body_centering_requires_even_index_sum() {
        let rule = SelectionRule::from_centering(Centering::I);
        assert!(rule.allows(Hkl::new(1, 1, 0)));
        assert!(rule.allows(Hkl::new(2, 0, 0)));
        assert!(!rule.allows(Hkl::new(1, 0, 0)));
        assert!(!rule.allows(Hkl::new(1, 1, 1)));
    }

    #[test]
    fn face_centering_requires_unmixed_parity() {
        let rule = SelectionRule::from_centering(Centering::F);
        assert!(rule.allows(Hkl::new(1, 1, 1)));
        assert!(rule.allows(Hkl::new(2, 0, 0)));
        assert!(!rule.allows(Hkl::new(1, 1, 0)));
        assert!(!rule.allows(Hkl::new(2, 1, 0)));
    }

    #[test]
    fn rhombohedral_rule_depends_on_setting() {
        let rules = CenteringRules;

        // R-3c (167) on hexagonal axes obeys -h+k+l = 3n.
        let hexagonal = rules
            .rule_from_international(167, 1)
            .expect("hexagonal setting");
        assert!(hexagonal.allows(Hkl::new(0, 0, 3)));
        assert!(hexagonal.allows(Hkl::new(1, 0, 1)));
        assert!(!hexagonal.allows(Hkl::new(0, 0, 1)));

        // The rhombohedral-axes cell is primitive.
        let rhombohedral = rules
            .rule_from_international(167, 2)
            .expect("rhombohedral setting");
        assert!(rhombohedral.allows(Hkl::new(0, 0, 1)));
    }

    #[test]
    fn unknown_keys_fail_with_symmetry_not_found() {
        let rules = CenteringRules;
        assert_eq!(
            rules.rule_from_international(0, 1).expect_err("bad number"),
            XrdError::SelectionRuleNotFound {
                number: 0,
                setting: 1
            }
        );
        assert_eq!(
            rules
                .rule_from_international(231, 1)
                .expect_err("bad number"),
            XrdError::SelectionRuleNotFound {
                number: 231,
                setting: 1
            }
        );
        assert_eq!(
            rules
                .rule_from_international(230, 3)
                .expect_err("bad setting"),
            XrdError::SelectionRuleNotFound {
                number: 230,
                setting: 3
            }
        );
        assert!(rules.rule_from_hall(1).expect_err("hall").is_recoverable());
    }
}
