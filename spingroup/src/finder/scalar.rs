//! One symmetry at a time, for any bit width. Used for more than 64 spins.
//!
//! Element `i` of the group feeds partial result `i % 8`, and the partial results are merged with the same
//! tree as the batch path, so for a group of `u64` symmetries both paths produce identical bits.

use super::{Accumulator, clean_stabilizer, norm_from_stabilizer, reduce_lanes, sum_lanes};
use crate::basis::{BasisHeader, StateInfo};
use crate::symmetry::CompiledSymmetry;
use spinbits::{BitPattern, LANE_COUNT, flip_mask};

#[must_use]
pub fn get_state_info<Bits: BitPattern>(
    header: &BasisHeader,
    symmetries: &[CompiledSymmetry<Bits>],
    bits: &Bits,
) -> StateInfo<Bits> {
    if !header.has_symmetries() {
        return StateInfo::identity(*bits);
    }
    let flip = flip_mask::<Bits>(header.number_spins());
    let coefficient = f64::from(header.spin_inversion());

    let mut lanes = [Accumulator::new(*bits); LANE_COUNT];
    for (index, symmetry) in symmetries.iter().enumerate() {
        let lane = &mut lanes[index % LANE_COUNT];
        let mut image = *bits;
        symmetry.apply(&mut image);
        *lane = lane.update(bits, image, symmetry.eigenvalue());
        if header.spin_inversion() != 0 {
            image.bitxor_assign(&flip);
            *lane = lane.update(bits, image, coefficient * symmetry.eigenvalue());
        }
    }
    let reduced = reduce_lanes(lanes);
    StateInfo {
        representative: reduced.minimum,
        character: reduced.eigenvalue,
        norm: norm_from_stabilizer(reduced.stabilizer, symmetries.len(), header.spin_inversion()),
    }
}

#[must_use]
pub fn is_representative<Bits: BitPattern>(
    header: &BasisHeader,
    symmetries: &[CompiledSymmetry<Bits>],
    bits: &Bits,
) -> bool {
    if !header.has_symmetries() {
        return true;
    }
    let flip = flip_mask::<Bits>(header.number_spins());
    let coefficient = f64::from(header.spin_inversion());

    let mut stabilizer = [0.0; LANE_COUNT];
    for (index, symmetry) in symmetries.iter().enumerate() {
        let lane = index % LANE_COUNT;
        let mut image = *bits;
        symmetry.apply(&mut image);
        if image < *bits {
            return false;
        }
        if image == *bits {
            stabilizer[lane] += symmetry.eigenvalue().re;
        }
        if header.spin_inversion() != 0 {
            image.bitxor_assign(&flip);
            if image < *bits {
                return false;
            }
            if image == *bits {
                stabilizer[lane] += coefficient * symmetry.eigenvalue().re;
            }
        }
    }
    clean_stabilizer(sum_lanes(stabilizer)) > 0.0
}
