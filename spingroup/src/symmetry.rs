use crate::spec::SymmetrySpec;
use crate::{Error, Result};
use num_complex::Complex64;
use spinbits::{BenesNetwork, BitPattern, Bits512, SMALL_NUMBER_SPINS};
use std::f64::consts::TAU;

/// `exp(2πi·sector/periodicity)`, exact whenever the phase is a multiple of a quarter turn.
#[must_use]
pub fn compute_eigenvalue(sector: u64, periodicity: u64) -> Complex64 {
    debug_assert!(periodicity > 0);
    let sector = sector % periodicity;
    if (4 * u128::from(sector)) % u128::from(periodicity) == 0 {
        return match (4 * u128::from(sector)) / u128::from(periodicity) {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };
    }
    Complex64::from_polar(1.0, TAU * (sector as f64 / periodicity as f64))
}

/// A symmetry ready to act on bit patterns: its network, phase and eigenvalue never change after compilation.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledSymmetry<Bits: BitPattern> {
    network: BenesNetwork<Bits>,
    sector: u64,
    periodicity: u64,
    eigenvalue: Complex64,
}

pub type SmallSymmetry = CompiledSymmetry<u64>;
pub type BigSymmetry = CompiledSymmetry<Bits512>;

impl<Bits: BitPattern> CompiledSymmetry<Bits> {
    fn compile(spec: &SymmetrySpec) -> Result<Self> {
        Ok(Self {
            network: BenesNetwork::compile(spec.permutation())?,
            sector: spec.sector(),
            periodicity: spec.periodicity(),
            eigenvalue: compute_eigenvalue(spec.sector(), spec.periodicity()),
        })
    }

    #[inline]
    pub fn apply(&self, bits: &mut Bits) {
        self.network.apply(bits);
    }

    #[must_use]
    pub fn network(&self) -> &BenesNetwork<Bits> {
        &self.network
    }

    #[must_use]
    pub fn sector(&self) -> u64 {
        self.sector
    }

    #[must_use]
    pub fn periodicity(&self) -> u64 {
        self.periodicity
    }

    #[must_use]
    pub fn eigenvalue(&self) -> Complex64 {
        self.eigenvalue
    }

    #[must_use]
    pub fn number_spins(&self) -> usize {
        self.network.number_bits()
    }

    #[must_use]
    pub fn to_spec(&self) -> SymmetrySpec {
        SymmetrySpec::from_parts(self.network.permutation().to_vec(), self.sector, self.periodicity)
    }
}

/// Compiled symmetry whose bit width is fixed by the number of spins: up to 64 spins use `u64`.
#[derive(Clone, Debug, PartialEq)]
pub enum Symmetry {
    Small(SmallSymmetry),
    Big(BigSymmetry),
}

impl Symmetry {
    /// # Errors
    ///
    /// Same as [`SymmetrySpec::new`]
    pub fn new(permutation: Vec<u16>, sector: u64) -> Result<Self> {
        Self::try_from(&SymmetrySpec::new(permutation, sector)?)
    }

    #[must_use]
    pub fn sector(&self) -> u64 {
        match self {
            Symmetry::Small(symmetry) => symmetry.sector(),
            Symmetry::Big(symmetry) => symmetry.sector(),
        }
    }

    #[must_use]
    pub fn periodicity(&self) -> u64 {
        match self {
            Symmetry::Small(symmetry) => symmetry.periodicity(),
            Symmetry::Big(symmetry) => symmetry.periodicity(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> f64 {
        self.sector() as f64 / self.periodicity() as f64
    }

    #[must_use]
    pub fn eigenvalue(&self) -> Complex64 {
        match self {
            Symmetry::Small(symmetry) => symmetry.eigenvalue(),
            Symmetry::Big(symmetry) => symmetry.eigenvalue(),
        }
    }

    #[must_use]
    pub fn number_spins(&self) -> usize {
        match self {
            Symmetry::Small(symmetry) => symmetry.number_spins(),
            Symmetry::Big(symmetry) => symmetry.number_spins(),
        }
    }

    #[must_use]
    pub fn network_depth(&self) -> usize {
        match self {
            Symmetry::Small(symmetry) => symmetry.network().depth(),
            Symmetry::Big(symmetry) => symmetry.network().depth(),
        }
    }

    #[must_use]
    pub fn network_shifts(&self) -> &[u32] {
        match self {
            Symmetry::Small(symmetry) => symmetry.network().shifts(),
            Symmetry::Big(symmetry) => symmetry.network().shifts(),
        }
    }

    #[must_use]
    pub fn to_spec(&self) -> SymmetrySpec {
        match self {
            Symmetry::Small(symmetry) => symmetry.to_spec(),
            Symmetry::Big(symmetry) => symmetry.to_spec(),
        }
    }

    #[must_use]
    pub fn as_small(&self) -> Option<&SmallSymmetry> {
        match self {
            Symmetry::Small(symmetry) => Some(symmetry),
            Symmetry::Big(_) => None,
        }
    }

    #[must_use]
    pub fn as_big(&self) -> Option<&BigSymmetry> {
        match self {
            Symmetry::Small(_) => None,
            Symmetry::Big(symmetry) => Some(symmetry),
        }
    }
}

impl TryFrom<&SymmetrySpec> for Symmetry {
    type Error = Error;

    fn try_from(spec: &SymmetrySpec) -> Result<Self> {
        if spec.number_spins() > SMALL_NUMBER_SPINS {
            Ok(Symmetry::Big(CompiledSymmetry::compile(spec)?))
        } else {
            Ok(Symmetry::Small(CompiledSymmetry::compile(spec)?))
        }
    }
}

/// Bit widths a [`Symmetry`] can be viewed at.
pub trait SymmetryWidth: BitPattern {
    fn compiled(symmetry: &Symmetry) -> Option<&CompiledSymmetry<Self>>;
}

impl SymmetryWidth for u64 {
    fn compiled(symmetry: &Symmetry) -> Option<&CompiledSymmetry<Self>> {
        symmetry.as_small()
    }
}

impl SymmetryWidth for Bits512 {
    fn compiled(symmetry: &Symmetry) -> Option<&CompiledSymmetry<Self>> {
        symmetry.as_big()
    }
}
