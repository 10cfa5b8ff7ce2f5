//! Beneš networks of delta swaps.
//!
//! A permutation of `n` spins is padded with fixed points up to the width `w = max(2, n.next_power_of_two())`
//! and routed through `2·log2(w) - 1` stages. Stage `s` exchanges bits `i` and `i + shifts[s]` for every
//! bit `i` set in `masks[s]`. Shifts run `w/2, w/4, …, 1, …, w/4, w/2`, so two networks compiled for the
//! same number of spins always share depth and shifts, which is what lets eight of them run side by side
//! in a [`crate::BatchedBenesNetwork`].

use crate::permutation::{PermutationError, validate_permutation};
use crate::BitPattern;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BenesNetwork<Bits: BitPattern> {
    masks: Vec<Bits>,
    shifts: Vec<u32>,
    permutation: Vec<u16>,
}

impl<Bits: BitPattern> BenesNetwork<Bits> {
    /// Routes `permutation` so that [`Self::apply`] sets bit `j` to the old bit `permutation[j]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `permutation` is not a bijection or has more than `Bits::BITS` elements
    pub fn compile(permutation: &[u16]) -> Result<Self, PermutationError> {
        validate_permutation(permutation)?;
        if permutation.len() > Bits::BITS {
            return Err(PermutationError::TooLong {
                length: permutation.len(),
                capacity: Bits::BITS,
            });
        }
        let width = network_width(permutation.len());
        let shifts = network_shifts(width);
        let mut masks = vec![Bits::zeros(); shifts.len()];
        let mut sources: Vec<usize> = permutation.iter().map(|&index| usize::from(index)).collect();
        sources.extend(permutation.len()..width);
        route(&sources, 0, 0, &mut masks);
        Ok(Self {
            masks,
            shifts,
            permutation: permutation.to_vec(),
        })
    }

    #[inline]
    pub fn apply(&self, bits: &mut Bits) {
        for (mask, &shift) in self.masks.iter().zip(self.shifts.iter()) {
            bits.delta_swap(mask, shift as usize);
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.masks.len()
    }

    #[must_use]
    pub fn masks(&self) -> &[Bits] {
        &self.masks
    }

    #[must_use]
    pub fn shifts(&self) -> &[u32] {
        &self.shifts
    }

    #[must_use]
    pub fn permutation(&self) -> &[u16] {
        &self.permutation
    }

    #[must_use]
    pub fn number_bits(&self) -> usize {
        self.permutation.len()
    }
}

#[must_use]
pub fn network_width(number_bits: usize) -> usize {
    number_bits.max(2).next_power_of_two()
}

/// Shifts of the network of the given power-of-two `width`.
#[must_use]
pub fn network_shifts(width: usize) -> Vec<u32> {
    debug_assert!(width.is_power_of_two() && width >= 2);
    let levels = width.trailing_zeros();
    let forward = (0..levels).map(|level| (width >> (level + 1)) as u32);
    let backward = (0..levels - 1).rev().map(|level| (width >> (level + 1)) as u32);
    forward.chain(backward).collect()
}

/// Sets the masks for the block `offset..offset + sources.len()` at recursion `level`.
///
/// `sources[j]` is the position, relative to `offset`, of the bit that has to end up at `offset + j`.
/// Inputs `i` and `i ^ half` share the outer switch, as do outputs `j` and `j ^ half`; each pair is
/// split between the lower and the upper sub-network by following the cycles of the looping algorithm.
fn route<Bits: BitPattern>(sources: &[usize], offset: usize, level: usize, masks: &mut [Bits]) {
    let size = sources.len();
    if size == 2 {
        if sources[0] == 1 {
            masks[level].assign_index(offset, true);
        }
        return;
    }
    let half = size / 2;
    let mut destinations = vec![0usize; size];
    for (output, &input) in sources.iter().enumerate() {
        destinations[input] = output;
    }

    // upper[i] tells whether input i passes through the upper sub-network
    let mut upper: Vec<Option<bool>> = vec![None; size];
    while let Some(start) = upper.iter().position(Option::is_none) {
        let mut input = start;
        while upper[input].is_none() {
            let partner = input ^ half;
            upper[input] = Some(false);
            upper[partner] = Some(true);
            input = sources[destinations[partner] ^ half];
        }
    }
    let goes_up = |input: usize| upper[input] == Some(true);

    let last = masks.len() - 1 - level;
    for (index, &source) in sources.iter().enumerate().take(half) {
        if goes_up(index) {
            masks[level].assign_index(offset + index, true);
        }
        if goes_up(source) {
            masks[last].assign_index(offset + index, true);
        }
    }

    let mut lower_sources = vec![0usize; half];
    let mut upper_sources = vec![0usize; half];
    for (output, &input) in sources.iter().enumerate() {
        if goes_up(input) {
            upper_sources[output % half] = input % half;
        } else {
            lower_sources[output % half] = input % half;
        }
    }
    route(&lower_sources, offset, level + 1, masks);
    route(&upper_sources, offset + half, level + 1, masks);
}
