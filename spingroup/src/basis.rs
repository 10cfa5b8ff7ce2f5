//! The read-only view of a symmetry-adapted basis that the representative finder consumes.

use crate::finder::RepresentativeFinder;
use crate::group::Group;
use crate::symmetry::{BigSymmetry, SmallSymmetry, Symmetry};
use crate::{Error, Result};
use num_complex::Complex64;
use spinbits::{BatchedBenesNetwork, BitPattern, Bits512, LANE_COUNT, Lanes, MAX_NUMBER_SPINS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UncheckedBasisHeader")
)]
pub struct BasisHeader {
    number_spins: usize,
    has_symmetries: bool,
    spin_inversion: i8,
}

impl BasisHeader {
    /// `spin_inversion` is `0` when global spin inversion is not a symmetry, otherwise its eigenvalue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumberSpins`] unless `number_spins` is between 1 and 512, and
    /// [`Error::InvalidSpinInversion`] unless `spin_inversion` is -1, 0, or 1
    pub fn new(number_spins: usize, spin_inversion: i8, has_symmetries: bool) -> Result<Self> {
        if number_spins == 0 || number_spins > MAX_NUMBER_SPINS {
            return Err(Error::InvalidNumberSpins(number_spins));
        }
        if !(-1..=1).contains(&spin_inversion) {
            return Err(Error::InvalidSpinInversion(spin_inversion));
        }
        Ok(Self {
            number_spins,
            has_symmetries,
            spin_inversion,
        })
    }

    #[must_use]
    pub fn number_spins(&self) -> usize {
        self.number_spins
    }

    #[must_use]
    pub fn has_symmetries(&self) -> bool {
        self.has_symmetries
    }

    #[must_use]
    pub fn spin_inversion(&self) -> i8 {
        self.spin_inversion
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedBasisHeader {
    number_spins: usize,
    has_symmetries: bool,
    spin_inversion: i8,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedBasisHeader> for BasisHeader {
    type Error = Error;

    fn try_from(unchecked: UncheckedBasisHeader) -> Result<Self> {
        BasisHeader::new(unchecked.number_spins, unchecked.spin_inversion, unchecked.has_symmetries)
    }
}

/// Result of canonicalizing one spin configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateInfo<Bits> {
    pub representative: Bits,
    pub character: Complex64,
    pub norm: f64,
}

impl<Bits> StateInfo<Bits> {
    /// What a basis without symmetries reports for `bits`.
    #[must_use]
    pub fn identity(bits: Bits) -> Self {
        Self {
            representative: bits,
            character: Complex64::new(1.0, 0.0),
            norm: 1.0,
        }
    }
}

/// Up to eight small symmetries laid out lane by lane.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchedSmallSymmetry {
    pub network: BatchedBenesNetwork,
    pub eigenvalues_real: Lanes<f64>,
    pub eigenvalues_imag: Lanes<f64>,
}

impl BatchedSmallSymmetry {
    /// # Panics
    ///
    /// Will panic if `symmetries` is empty, longer than [`LANE_COUNT`], or mixes numbers of spins
    #[must_use]
    pub fn new(symmetries: &[SmallSymmetry]) -> Self {
        let networks: Vec<_> = symmetries.iter().map(SmallSymmetry::network).collect();
        let mut eigenvalues_real = [0.0; LANE_COUNT];
        let mut eigenvalues_imag = [0.0; LANE_COUNT];
        for (lane, symmetry) in symmetries.iter().enumerate() {
            eigenvalues_real[lane] = symmetry.eigenvalue().re;
            eigenvalues_imag[lane] = symmetry.eigenvalue().im;
        }
        Self {
            network: BatchedBenesNetwork::new(&networks),
            eigenvalues_real,
            eigenvalues_imag,
        }
    }
}

/// Group of at most 64 spins split into full batches of eight plus a partially filled remainder.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SmallBasis {
    pub batched_symmetries: Vec<BatchedSmallSymmetry>,
    pub other_symmetries: Option<BatchedSmallSymmetry>,
    pub number_other_symmetries: usize,
}

impl SmallBasis {
    #[must_use]
    pub fn new(symmetries: &[SmallSymmetry]) -> Self {
        let chunks = symmetries.chunks_exact(LANE_COUNT);
        let remainder = chunks.remainder();
        Self {
            batched_symmetries: chunks.map(BatchedSmallSymmetry::new).collect(),
            other_symmetries: (!remainder.is_empty()).then(|| BatchedSmallSymmetry::new(remainder)),
            number_other_symmetries: remainder.len(),
        }
    }

    #[must_use]
    pub fn number_symmetries(&self) -> usize {
        LANE_COUNT * self.batched_symmetries.len() + self.number_other_symmetries
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct BigBasis {
    pub symmetries: Vec<BigSymmetry>,
}

impl BigBasis {
    #[must_use]
    pub fn new(symmetries: &[BigSymmetry]) -> Self {
        Self {
            symmetries: symmetries.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BasisBody {
    Small(SmallBasis),
    Big(BigBasis),
}

impl BasisBody {
    /// # Errors
    ///
    /// Returns [`Error::SystemError`] for the empty group
    pub fn new(group: &Group) -> Result<Self> {
        match group.symmetries().first() {
            None => Err(Error::SystemError("a basis body needs a non-empty group")),
            Some(Symmetry::Small(_)) => {
                let symmetries: Vec<SmallSymmetry> =
                    group.symmetries().iter().filter_map(Symmetry::as_small).cloned().collect();
                Ok(BasisBody::Small(SmallBasis::new(&symmetries)))
            }
            Some(Symmetry::Big(_)) => {
                let symmetries: Vec<BigSymmetry> =
                    group.symmetries().iter().filter_map(Symmetry::as_big).cloned().collect();
                Ok(BasisBody::Big(BigBasis::new(&symmetries)))
            }
        }
    }
}

/// Bit widths that select one kind of [`BasisBody`].
pub trait BasisWidth: BitPattern {
    type Body: RepresentativeFinder<Bits = Self>;
    fn body(body: &BasisBody) -> Option<&Self::Body>;
}

impl BasisWidth for u64 {
    type Body = SmallBasis;
    fn body(body: &BasisBody) -> Option<&Self::Body> {
        match body {
            BasisBody::Small(small) => Some(small),
            BasisBody::Big(_) => None,
        }
    }
}

impl BasisWidth for Bits512 {
    type Body = BigBasis;
    fn body(body: &BasisBody) -> Option<&Self::Body> {
        match body {
            BasisBody::Small(_) => None,
            BasisBody::Big(big) => Some(big),
        }
    }
}

/// Header and body of a basis built from one group.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis {
    header: BasisHeader,
    body: BasisBody,
}

impl Basis {
    /// An empty `group` means no spatial symmetries; if `spin_inversion` is requested anyway the trivial group
    /// carries it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumberSpins`] if `number_spins` is out of range or does not match the group, and
    /// [`Error::InvalidSpinInversion`] for a spin inversion other than -1, 0, or 1
    pub fn new(number_spins: usize, spin_inversion: i8, group: &Group) -> Result<Self> {
        let has_symmetries = !group.is_empty() || spin_inversion != 0;
        let header = BasisHeader::new(number_spins, spin_inversion, has_symmetries)?;
        if group.number_spins().is_some_and(|group_spins| group_spins != number_spins) {
            return Err(Error::InvalidNumberSpins(number_spins));
        }
        let body = if group.is_empty() {
            BasisBody::new(&Group::trivial(number_spins)?)?
        } else {
            BasisBody::new(group)?
        };
        Ok(Self { header, body })
    }

    #[must_use]
    pub fn header(&self) -> &BasisHeader {
        &self.header
    }

    #[must_use]
    pub fn body(&self) -> &BasisBody {
        &self.body
    }

    /// # Errors
    ///
    /// Returns [`Error::SystemError`] if `Bits` is not the width this basis works with
    pub fn get_state_info<Bits: BasisWidth>(&self, bits: &Bits) -> Result<StateInfo<Bits>> {
        let body = Bits::body(&self.body).ok_or(Error::SystemError("bit width does not match the basis"))?;
        Ok(body.get_state_info(&self.header, bits))
    }

    /// # Errors
    ///
    /// Returns [`Error::SystemError`] if `Bits` is not the width this basis works with
    pub fn is_representative<Bits: BasisWidth>(&self, bits: &Bits) -> Result<bool> {
        let body = Bits::body(&self.body).ok_or(Error::SystemError("bit width does not match the basis"))?;
        Ok(body.is_representative(&self.header, bits))
    }
}
