//! Bravais centering of the 230 international space groups, taken from the
//! first letter of the standard Hermann-Mauguin symbol, and the derived
//! general-position reflection conditions.

use crate::domain::Hkl;

/// Bravais lattice centering. `R` refers to the hexagonal-axes (obverse)
/// description of the rhombohedral lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Centering {
    P,
    A,
    B,
    C,
    I,
    F,
    R,
}

impl Centering {
    /// General-position reflection condition for this centering.
    pub fn allows(self, hkl: Hkl) -> bool {
        let Hkl { h, k, l } = hkl;
        match self {
            Self::P => true,
            Self::A => (k + l) % 2 == 0,
            Self::B => (h + l) % 2 == 0,
            Self::C => (h + k) % 2 == 0,
            Self::I => (h + k + l) % 2 == 0,
            Self::F => {
                let parity = h.rem_euclid(2);
                k.rem_euclid(2) == parity && l.rem_euclid(2) == parity
            }
            Self::R => (-h + k + l).rem_euclid(3) == 0,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::P => 'P',
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::I => 'I',
            Self::F => 'F',
            Self::R => 'R',
        }
    }
}

pub(super) fn centering_for_group(number: u16) -> Option<Centering> {
    if number == 0 || number as usize > GROUP_CENTERING.len() {
        return None;
    }
    Some(GROUP_CENTERING[number as usize - 1])
}

use Centering::{A, C, F, I, P, R};

/// Centering per international number, index `number - 1`.
#[rustfmt::skip]
const GROUP_CENTERING: [Centering; 230] = [
    // 1-2 triclinic: P1, P-1
    P, P,
    // 3-15 monoclinic: P2, P21, C2, Pm, Pc, Cm, Cc, P2/m, P21/m, C2/m,
    // P2/c, P21/c, C2/c
    P, P, C, P, P, C, C, P, P, C, P, P, C,
    // 16-24 orthorhombic 222: P222, P2221, P21212, P212121, C2221, C222,
    // F222, I222, I212121
    P, P, P, P, C, C, F, I, I,
    // 25-46 orthorhombic mm2: Pmm2..Pnn2 (25-34), Cmm2, Cmc21, Ccc2 (35-37),
    // Amm2, Aem2, Ama2, Aea2 (38-41), Fmm2, Fdd2 (42-43), Imm2, Iba2,
    // Ima2 (44-46)
    P, P, P, P, P, P, P, P, P, P, C, C, C, A, A, A, A, F, F, I, I, I,
    // 47-62 orthorhombic mmm, primitive: Pmmm..Pnma
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P,
    // 63-74 orthorhombic mmm, centered: Cmcm, Cmce, Cmmm, Cccm, Cmme, Ccce,
    // Fmmm, Fddd, Immm, Ibam, Ibca, Imma
    C, C, C, C, C, C, F, F, I, I, I, I,
    // 75-88 tetragonal 4 and 4/m: P4, P41, P42, P43, I4, I41, P-4, I-4,
    // P4/m, P42/m, P4/n, P42/n, I4/m, I41/a
    P, P, P, P, I, I, P, I, P, P, P, P, I, I,
    // 89-98 tetragonal 422: P422..P43212, I422, I4122
    P, P, P, P, P, P, P, P, I, I,
    // 99-110 tetragonal 4mm: P4mm..P42bc, I4mm, I4cm, I41md, I41cd
    P, P, P, P, P, P, P, P, I, I, I, I,
    // 111-122 tetragonal -42m/-4m2: P-42m..P-4n2, I-4m2, I-4c2, I-42m, I-42d
    P, P, P, P, P, P, P, P, I, I, I, I,
    // 123-142 tetragonal 4/mmm: P4/mmm..P42/ncm, I4/mmm, I4/mcm, I41/amd,
    // I41/acd
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, I, I, I, I,
    // 143-167 trigonal: P3, P31, P32, R3, P-3, R-3, P312, P321, P3112,
    // P3121, P3212, P3221, R32, P3m1, P31m, P3c1, P31c, R3m, R3c, P-31m,
    // P-31c, P-3m1, P-3c1, R-3m, R-3c
    P, P, P, R, P, R, P, P, P, P, P, P, R, P, P, P, P, R, R, P, P, P, P, R, R,
    // 168-194 hexagonal: all primitive
    P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P, P,
    P, P,
    // 195-206 cubic 23 and m-3: P23, F23, I23, P213, I213, Pm-3, Pn-3,
    // Fm-3, Fd-3, Im-3, Pa-3, Ia-3
    P, F, I, P, I, P, P, F, F, I, P, I,
    // 207-214 cubic 432: P432, P4232, F432, F4132, I432, P4332, P4132, I4132
    P, P, F, F, I, P, P, I,
    // 215-220 cubic -43m: P-43m, F-43m, I-43m, P-43n, F-43c, I-43d
    P, F, I, P, F, I,
    // 221-230 cubic m-3m: Pm-3m, Pn-3n, Pm-3n, Pn-3m, Fm-3m, Fm-3c, Fd-3m,
    // Fd-3c, Im-3m, Ia-3d
    P, P, P, P, F, F, F, F, I, I,
];
