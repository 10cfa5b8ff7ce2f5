//! Eight symmetries at a time for up to 64 spins.
//!
//! Everything here is `#[inline(always)]` and works on fixed-size lane arrays, so the code is compiled again
//! inside each kernel of [`super::dispatch`] with that kernel's target features and vectorized accordingly.
//! The operations and their order do not depend on the instruction set, which keeps all kernels bit-identical.

use super::{Accumulator, clean_stabilizer, norm_from_stabilizer, reduce_lanes, sum_lanes};
use crate::basis::{BasisHeader, BatchedSmallSymmetry, SmallBasis, StateInfo};
use num_complex::Complex64;
use spinbits::{LANE_COUNT, Lanes, flip_mask};

/// Per-lane running minimum, eigenvalue at the minimum, and stabilizer sum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneAccumulator {
    original: u64,
    minimum: Lanes<u64>,
    real: Lanes<f64>,
    imag: Lanes<f64>,
    stabilizer: Lanes<f64>,
}

impl LaneAccumulator {
    #[inline(always)]
    #[must_use]
    pub fn new(bits: u64) -> Self {
        Self {
            original: bits,
            minimum: [bits; LANE_COUNT],
            real: [1.0; LANE_COUNT],
            imag: [0.0; LANE_COUNT],
            stabilizer: [0.0; LANE_COUNT],
        }
    }

    /// Lanes whose image is smaller than their minimum take over image and eigenvalue; lanes whose image is the
    /// original configuration add the real part of their eigenvalue to the stabilizer. Lanes outside `include`
    /// are left alone.
    #[inline(always)]
    #[must_use]
    pub fn update(mut self, images: &Lanes<u64>, real: &Lanes<f64>, imag: &Lanes<f64>, include: &Lanes<bool>) -> Self {
        for lane in 0..LANE_COUNT {
            let smaller = include[lane] & (images[lane] < self.minimum[lane]);
            let fixed = include[lane] & (images[lane] == self.original);
            self.minimum[lane] = if smaller { images[lane] } else { self.minimum[lane] };
            self.real[lane] = if smaller { real[lane] } else { self.real[lane] };
            self.imag[lane] = if smaller { imag[lane] } else { self.imag[lane] };
            self.stabilizer[lane] += if fixed { real[lane] } else { 0.0 };
        }
        self
    }

    /// Like [`Self::update`] without tracking the minimum, `None` as soon as some lane is smaller than the
    /// original configuration.
    #[inline(always)]
    #[must_use]
    pub fn update_norm_only(mut self, images: &Lanes<u64>, real: &Lanes<f64>, include: &Lanes<bool>) -> Option<Self> {
        let mut any_smaller = false;
        for lane in 0..LANE_COUNT {
            any_smaller |= include[lane] & (images[lane] < self.minimum[lane]);
        }
        if any_smaller {
            return None;
        }
        for lane in 0..LANE_COUNT {
            let fixed = include[lane] & (images[lane] == self.original);
            self.stabilizer[lane] += if fixed { real[lane] } else { 0.0 };
        }
        Some(self)
    }

    #[inline(always)]
    #[must_use]
    pub fn reduce(&self) -> Accumulator<u64> {
        reduce_lanes(std::array::from_fn(|lane| Accumulator {
            minimum: self.minimum[lane],
            eigenvalue: Complex64::new(self.real[lane], self.imag[lane]),
            stabilizer: self.stabilizer[lane],
        }))
    }

    /// The stabilizer sum of [`Self::reduce`], without selecting a minimum.
    #[inline(always)]
    #[must_use]
    pub fn reduce_norm_only(&self) -> f64 {
        sum_lanes(self.stabilizer)
    }
}

#[inline(always)]
fn first_lanes(count: usize) -> Lanes<bool> {
    std::array::from_fn(|lane| lane < count)
}

/// Every batch of `basis` together with the number of lanes it actually uses.
#[inline(always)]
fn batches(basis: &SmallBasis) -> impl Iterator<Item = (&BatchedSmallSymmetry, usize)> {
    let full = basis.batched_symmetries.iter().map(|batch| (batch, LANE_COUNT));
    let other = basis
        .other_symmetries
        .iter()
        .map(|batch| (batch, basis.number_other_symmetries));
    full.chain(other)
}

#[inline(always)]
fn scale(values: &mut Lanes<f64>, coefficient: f64) {
    for value in values.iter_mut() {
        *value *= coefficient;
    }
}

#[inline(always)]
fn flip(images: &mut Lanes<u64>, mask: u64) {
    for image in images.iter_mut() {
        *image ^= mask;
    }
}

#[inline(always)]
#[must_use]
pub fn get_state_info(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> StateInfo<u64> {
    if !header.has_symmetries() {
        return StateInfo::identity(bits);
    }
    let flip_mask = flip_mask::<u64>(header.number_spins());
    let coefficient = f64::from(header.spin_inversion());

    let mut accumulator = LaneAccumulator::new(bits);
    for (batch, count) in batches(basis) {
        let include = first_lanes(count);
        let mut images = [bits; LANE_COUNT];
        batch.network.apply(&mut images);
        let mut real = batch.eigenvalues_real;
        let mut imag = batch.eigenvalues_imag;
        accumulator = accumulator.update(&images, &real, &imag, &include);
        if header.spin_inversion() != 0 {
            flip(&mut images, flip_mask);
            if header.spin_inversion() != 1 {
                scale(&mut real, coefficient);
                scale(&mut imag, coefficient);
            }
            accumulator = accumulator.update(&images, &real, &imag, &include);
        }
    }

    let reduced = accumulator.reduce();
    StateInfo {
        representative: reduced.minimum,
        character: reduced.eigenvalue,
        norm: norm_from_stabilizer(reduced.stabilizer, basis.number_symmetries(), header.spin_inversion()),
    }
}

#[inline(always)]
#[must_use]
pub fn is_representative(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> bool {
    if !header.has_symmetries() {
        return true;
    }
    let flip_mask = flip_mask::<u64>(header.number_spins());
    let coefficient = f64::from(header.spin_inversion());

    let mut accumulator = LaneAccumulator::new(bits);
    for (batch, count) in batches(basis) {
        let include = first_lanes(count);
        let mut images = [bits; LANE_COUNT];
        batch.network.apply(&mut images);
        let mut real = batch.eigenvalues_real;
        let Some(updated) = accumulator.update_norm_only(&images, &real, &include) else {
            return false;
        };
        accumulator = updated;
        if header.spin_inversion() != 0 {
            flip(&mut images, flip_mask);
            scale(&mut real, coefficient);
            let Some(updated) = accumulator.update_norm_only(&images, &real, &include) else {
                return false;
            };
            accumulator = updated;
        }
    }
    clean_stabilizer(accumulator.reduce_norm_only()) > 0.0
}
