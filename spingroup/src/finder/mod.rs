//! Orbit representatives, characters, and norms of spin configurations.
//!
//! The extended orbit of `b` is `{g(b)}` over the group, plus `{flip(g(b))}` when spin inversion is a
//! symmetry. The representative is its smallest element, the character is the eigenvalue of the element that
//! produced it, and the norm is `sqrt(S / |G|)` where the stabilizer sum `S` adds up the real parts of the
//! eigenvalues of all elements mapping `b` onto itself.

pub mod batch;
pub mod dispatch;
pub mod scalar;

pub use dispatch::{KERNEL_ENV_VAR, KernelLevel, Kernels, UnknownKernel, kernels};

use crate::NORM_THRESHOLD;
use crate::basis::{BasisHeader, BigBasis, SmallBasis, StateInfo};
use num_complex::Complex64;
use spinbits::{BitPattern, Bits512, LANE_COUNT, Lanes};

pub trait RepresentativeFinder {
    type Bits: BitPattern;

    fn get_state_info(&self, header: &BasisHeader, bits: &Self::Bits) -> StateInfo<Self::Bits>;

    /// Equivalent to checking `representative == bits && norm > 0` on [`Self::get_state_info`], but stops as
    /// soon as a smaller element of the orbit turns up.
    fn is_representative(&self, header: &BasisHeader, bits: &Self::Bits) -> bool;
}

impl RepresentativeFinder for SmallBasis {
    type Bits = u64;

    fn get_state_info(&self, header: &BasisHeader, bits: &u64) -> StateInfo<u64> {
        kernels().get_state_info(header, self, *bits)
    }

    fn is_representative(&self, header: &BasisHeader, bits: &u64) -> bool {
        kernels().is_representative(header, self, *bits)
    }
}

impl RepresentativeFinder for BigBasis {
    type Bits = Bits512;

    fn get_state_info(&self, header: &BasisHeader, bits: &Bits512) -> StateInfo<Bits512> {
        scalar::get_state_info(header, &self.symmetries, bits)
    }

    fn is_representative(&self, header: &BasisHeader, bits: &Bits512) -> bool {
        scalar::is_representative(header, &self.symmetries, bits)
    }
}

/// Running minimum of an orbit, the eigenvalue that produced it, and the stabilizer sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accumulator<Bits> {
    pub minimum: Bits,
    pub eigenvalue: Complex64,
    pub stabilizer: f64,
}

impl<Bits: BitPattern> Accumulator<Bits> {
    #[must_use]
    pub fn new(bits: Bits) -> Self {
        Self {
            minimum: bits,
            eigenvalue: Complex64::new(1.0, 0.0),
            stabilizer: 0.0,
        }
    }

    /// Accounts for `image`, the result of applying a symmetry with `eigenvalue` to `original`.
    #[inline(always)]
    #[must_use]
    pub fn update(self, original: &Bits, image: Bits, eigenvalue: Complex64) -> Self {
        if image < self.minimum {
            Self {
                minimum: image,
                eigenvalue,
                ..self
            }
        } else if image == *original {
            Self {
                stabilizer: self.stabilizer + eigenvalue.re,
                ..self
            }
        } else {
            self
        }
    }

    /// Merges two partial results: the smaller minimum wins, `other` on ties, and stabilizer sums add up.
    #[inline(always)]
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let stabilizer = self.stabilizer + other.stabilizer;
        if self.minimum < other.minimum {
            Self { stabilizer, ..self }
        } else {
            Self { stabilizer, ..other }
        }
    }
}

/// Folds lane `i + width` into lane `i` while halving `width`, ending with everything in lane 0.
///
/// Both paths reduce through this function, so they agree on ties and on the order of the stabilizer sum.
#[inline(always)]
#[must_use]
pub fn reduce_lanes<Bits: BitPattern>(mut lanes: Lanes<Accumulator<Bits>>) -> Accumulator<Bits> {
    let mut width = LANE_COUNT;
    while width > 1 {
        width /= 2;
        for lane in 0..width {
            lanes[lane] = lanes[lane].combine(lanes[lane + width]);
        }
    }
    lanes[0]
}

/// The stabilizer part of [`reduce_lanes`].
#[inline(always)]
#[must_use]
pub fn sum_lanes(mut stabilizer: Lanes<f64>) -> f64 {
    let mut width = LANE_COUNT;
    while width > 1 {
        width /= 2;
        for lane in 0..width {
            stabilizer[lane] += stabilizer[lane + width];
        }
    }
    stabilizer[0]
}

/// Removes rounding noise from a stabilizer sum.
///
/// # Panics
///
/// Will panic if the sum is negative beyond [`NORM_THRESHOLD`], which no consistent group can produce
#[inline]
#[must_use]
pub fn clean_stabilizer(stabilizer: f64) -> f64 {
    let stabilizer = if stabilizer.abs() <= NORM_THRESHOLD { 0.0 } else { stabilizer };
    assert!(stabilizer >= 0.0, "stabilizer sum {stabilizer} is negative");
    stabilizer
}

#[inline]
#[must_use]
pub fn norm_from_stabilizer(stabilizer: f64, number_symmetries: usize, spin_inversion: i8) -> f64 {
    let group_size = number_symmetries * if spin_inversion == 0 { 1 } else { 2 };
    (clean_stabilizer(stabilizer) / group_size as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_prefers_smaller_minimum() {
        let left = Accumulator {
            minimum: 3u64,
            eigenvalue: Complex64::new(0.0, 1.0),
            stabilizer: 1.0,
        };
        let right = Accumulator {
            minimum: 5u64,
            eigenvalue: Complex64::new(-1.0, 0.0),
            stabilizer: 0.5,
        };
        let combined = left.combine(right);
        assert_eq!(combined.minimum, 3);
        assert_eq!(combined.eigenvalue, Complex64::new(0.0, 1.0));
        assert_eq!(combined.stabilizer, 1.5);
        assert_eq!(right.combine(left).minimum, 3);
    }

    #[test]
    fn reduction_prefers_upper_lanes_on_ties() {
        let mut lanes = [Accumulator::new(8u64); LANE_COUNT];
        lanes[2].minimum = 1;
        lanes[6].minimum = 1;
        lanes[6].eigenvalue = Complex64::new(-1.0, 0.0);
        lanes[5].stabilizer = 2.0;
        let reduced = reduce_lanes(lanes);
        assert_eq!(reduced.minimum, 1);
        assert_eq!(reduced.eigenvalue, Complex64::new(-1.0, 0.0));
        assert_eq!(reduced.stabilizer, 2.0);
        assert_eq!(sum_lanes([0.5; LANE_COUNT]), 4.0);
    }

    #[test]
    fn small_stabilizer_sums_are_zero() {
        assert_eq!(clean_stabilizer(5e-6), 0.0);
        assert_eq!(clean_stabilizer(-5e-6), 0.0);
        assert_eq!(clean_stabilizer(2.0), 2.0);
        assert_eq!(norm_from_stabilizer(1.0, 4, 0), 0.5);
        assert_eq!(norm_from_stabilizer(2.0, 4, -1), 0.5);
    }

    #[test]
    #[should_panic(expected = "is negative")]
    fn negative_stabilizer_sum_is_fatal() {
        let _ = clean_stabilizer(-0.5);
    }
}
