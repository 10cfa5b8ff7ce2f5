//! Symmetries as plain data: a permutation of spin positions together with the phase it picks up.

use crate::{Error, Result};
use num_integer::Integer;
use spinbits::permutation::{compose_permutations, identity_permutation};
use spinbits::{MAX_NUMBER_SPINS, periodicity, validate_permutation};

/// Permutation of `number_spins` positions with eigenvalue `exp(2πi·sector/periodicity)`.
///
/// Derived equality is structural. Use [`equal`] to compare symmetries the way group closure does.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "UncheckedSymmetrySpec")
)]
pub struct SymmetrySpec {
    permutation: Vec<u16>,
    sector: u64,
    periodicity: u64,
}

impl SymmetrySpec {
    /// # Errors
    ///
    /// Returns [`Error::InvalidPermutation`] if `permutation` is not a bijection on at most 512 elements and
    /// [`Error::InvalidSector`] if `sector` is not below the order of the permutation
    pub fn new(permutation: Vec<u16>, sector: u64) -> Result<Self> {
        validate_permutation(&permutation)?;
        let periodicity = periodicity(&permutation)?;
        if sector >= periodicity {
            return Err(Error::InvalidSector { sector, periodicity });
        }
        Ok(Self {
            permutation,
            sector,
            periodicity,
        })
    }

    /// Identity on `number_spins` positions with the trivial phase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumberSpins`] unless `number_spins` is between 1 and 512
    pub fn identity(number_spins: usize) -> Result<Self> {
        if number_spins == 0 || number_spins > MAX_NUMBER_SPINS {
            return Err(Error::InvalidNumberSpins(number_spins));
        }
        Ok(Self {
            permutation: identity_permutation(number_spins),
            sector: 0,
            periodicity: 1,
        })
    }

    /// Assembles a spec without checking the invariants, for data that was derived from a valid spec.
    pub(crate) fn from_parts(permutation: Vec<u16>, sector: u64, periodicity: u64) -> Self {
        debug_assert!(sector < periodicity);
        Self {
            permutation,
            sector,
            periodicity,
        }
    }

    #[must_use]
    pub fn permutation(&self) -> &[u16] {
        &self.permutation
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
    pub fn number_spins(&self) -> usize {
        self.permutation.len()
    }

    /// The phase as a fraction of a full turn.
    #[must_use]
    pub fn phase(&self) -> f64 {
        self.sector as f64 / self.periodicity as f64
    }
}

/// Serialized form of [`SymmetrySpec`], checked by [`SymmetrySpec::new`] before use.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedSymmetrySpec {
    permutation: Vec<u16>,
    sector: u64,
    periodicity: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedSymmetrySpec> for SymmetrySpec {
    type Error = Error;

    fn try_from(unchecked: UncheckedSymmetrySpec) -> Result<Self> {
        let spec = SymmetrySpec::new(unchecked.permutation, unchecked.sector)?;
        if spec.periodicity != unchecked.periodicity {
            return Err(Error::InvalidPeriodicity {
                periodicity: unchecked.periodicity,
                order: spec.periodicity,
            });
        }
        Ok(spec)
    }
}

/// Sum of two fractions of a full turn, in lowest terms with the numerator reduced modulo the denominator.
///
/// Denominators must be nonzero. Both terms are brought to the least common denominator, which is below
/// `2^128`, and added modulo it.
fn rational_add(left: (u64, u64), right: (u64, u64)) -> (u128, u128) {
    let (left_denominator, right_denominator) = (u128::from(left.1), u128::from(right.1));
    let denominator = left_denominator / u128::from(left.1.gcd(&right.1)) * right_denominator;
    // both terms are below the denominator
    let left_numerator = u128::from(left.0 % left.1) * (denominator / left_denominator);
    let right_numerator = u128::from(right.0 % right.1) * (denominator / right_denominator);
    let numerator = if left_numerator >= denominator - right_numerator {
        left_numerator - (denominator - right_numerator)
    } else {
        left_numerator + right_numerator
    };
    let divisor = numerator.gcd(&denominator);
    (numerator / divisor, denominator / divisor)
}

/// Whether `x` and `y` describe the same group element.
///
/// # Errors
///
/// Returns [`Error::IncompatibleSymmetries`] if the two act on different numbers of spins, or if they are the
/// same permutation with the same periodicity but claim different sectors
pub fn equal(x: &SymmetrySpec, y: &SymmetrySpec) -> Result<bool> {
    if x.number_spins() != y.number_spins() {
        return Err(Error::IncompatibleSymmetries);
    }
    if x.periodicity != y.periodicity || x.permutation != y.permutation {
        return Ok(false);
    }
    if x.sector != y.sector {
        return Err(Error::IncompatibleSymmetries);
    }
    Ok(true)
}

/// The group product `x∘y`: `y` is looked up first, phases add up.
///
/// The sector of the result is expressed in units of the order of the composed permutation.
///
/// # Errors
///
/// Returns [`Error::IncompatibleSymmetries`] if the operands act on different numbers of spins, or if the
/// combined phase does not fit the order of the composed permutation
pub fn compose(x: &SymmetrySpec, y: &SymmetrySpec) -> Result<SymmetrySpec> {
    if x.number_spins() != y.number_spins() {
        return Err(Error::IncompatibleSymmetries);
    }
    let permutation = compose_permutations(&x.permutation, &y.permutation);
    let periodicity = periodicity(&permutation)?;
    let (numerator, denominator) = rational_add((x.sector, x.periodicity), (y.sector, y.periodicity));
    let period = u128::from(periodicity);
    if denominator > period || period % denominator != 0 {
        return Err(Error::IncompatibleSymmetries);
    }
    // numerator < denominator <= periodicity, so the product stays below periodicity
    let sector = (numerator * (period / denominator)) as u64;
    Ok(SymmetrySpec::from_parts(permutation, sector, periodicity))
}
