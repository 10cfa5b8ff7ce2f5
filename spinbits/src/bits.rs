use std::fmt::Debug;
use std::hash::Hash;

/// Fixed-width spin configuration where bit `i` is the state of spin `i`.
///
/// Ordering is the unsigned numeric order over the full width, which is what
/// orbit representatives are minimized over.
/// See also [`crate::Bits512`].
pub trait BitPattern: Copy + Eq + Ord + Hash + Debug + Default {
    /// Number of bits the pattern can hold.
    const BITS: usize;

    #[must_use]
    fn zeros() -> Self {
        Self::default()
    }

    /// Pattern with exactly the lowest `count` bits set.
    ///
    /// # Panics
    ///
    /// Will panic if `count` exceeds [`Self::BITS`]
    #[must_use]
    fn lowest_ones(count: usize) -> Self;

    fn index(&self, index: usize) -> bool;
    fn assign_index(&mut self, index: usize, to: bool);
    fn weight(&self) -> usize;

    #[must_use]
    fn bitand(&self, other: &Self) -> Self;
    fn bitxor_assign(&mut self, other: &Self);
    #[must_use]
    fn shift_left(&self, shift: usize) -> Self;
    #[must_use]
    fn shift_right(&self, shift: usize) -> Self;

    /// Exchanges bits `i` and `i + shift` for every `i` set in `mask`.
    ///
    /// `mask` must not have bit `i + shift` set whenever bit `i` is set.
    #[inline]
    fn delta_swap(&mut self, mask: &Self, shift: usize) {
        let mut swapped = self.shift_right(shift);
        swapped.bitxor_assign(self);
        let swapped = swapped.bitand(mask);
        self.bitxor_assign(&swapped);
        self.bitxor_assign(&swapped.shift_left(shift));
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.weight() == 0
    }

    fn assign_random(&mut self, bit_count: usize, random_number_generator: &mut impl rand::Rng) {
        for index in 0..bit_count {
            self.assign_index(index, random_number_generator.r#gen());
        }
    }
}

/// Mask flipping exactly the first `number_spins` spins, used for global spin inversion.
///
/// ```text
/// 0000....0011....1111
///           ~~~~~~~~~~
///          number_spins
/// ```
#[must_use]
pub fn flip_mask<Bits: BitPattern>(number_spins: usize) -> Bits {
    Bits::lowest_ones(number_spins)
}

impl BitPattern for u64 {
    const BITS: usize = u64::BITS as usize;

    #[inline]
    fn lowest_ones(count: usize) -> Self {
        assert!(count <= <Self as BitPattern>::BITS, "cannot set {count} bits of a u64");
        // Shifting a u64 by 64 is an overflow
        if count == 0 { 0 } else { u64::MAX >> (<Self as BitPattern>::BITS - count) }
    }

    #[inline]
    fn index(&self, index: usize) -> bool {
        (*self >> index) & 1 == 1
    }

    #[inline]
    fn assign_index(&mut self, index: usize, to: bool) {
        if to {
            *self |= 1 << index;
        } else {
            *self &= !(1 << index);
        }
    }

    #[inline]
    fn weight(&self) -> usize {
        self.count_ones() as usize
    }

    #[inline]
    fn bitand(&self, other: &Self) -> Self {
        *self & *other
    }

    #[inline]
    fn bitxor_assign(&mut self, other: &Self) {
        *self ^= *other;
    }

    #[inline]
    fn shift_left(&self, shift: usize) -> Self {
        self.checked_shl(shift as u32).unwrap_or(0)
    }

    #[inline]
    fn shift_right(&self, shift: usize) -> Self {
        self.checked_shr(shift as u32).unwrap_or(0)
    }

    #[inline]
    fn delta_swap(&mut self, mask: &Self, shift: usize) {
        let swapped = ((*self >> shift) ^ *self) & *mask;
        *self ^= swapped ^ (swapped << shift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowest_ones_u64() {
        assert_eq!(u64::lowest_ones(0), 0);
        assert_eq!(u64::lowest_ones(1), 1);
        assert_eq!(u64::lowest_ones(4), 0b1111);
        assert_eq!(u64::lowest_ones(64), u64::MAX);
    }

    #[test]
    fn full_width_flip_mask_u64() {
        assert_eq!(<u64 as BitPattern>::BITS, 64);
        assert_eq!(flip_mask::<u64>(64), u64::MAX);
        assert_eq!(flip_mask::<u64>(63), u64::MAX >> 1);
    }

    #[test]
    #[should_panic(expected = "cannot set 65 bits of a u64")]
    fn lowest_ones_u64_rejects_too_many_bits() {
        let _ = u64::lowest_ones(65);
    }

    #[test]
    fn delta_swap_u64_matches_default() {
        let mask = 0x5555_5555_5555_5555u64;
        let mut fast = 0xdead_beef_0123_4567u64;
        let mut generic = fast;
        fast.delta_swap(&mask, 1);
        let mut swapped = generic.shift_right(1);
        swapped.bitxor_assign(&generic);
        let swapped = swapped.bitand(&mask);
        generic.bitxor_assign(&swapped);
        generic.bitxor_assign(&swapped.shift_left(1));
        assert_eq!(fast, generic);
    }

    #[test]
    fn delta_swap_exchanges_pairs() {
        let mut bits = 0b0001u64;
        bits.delta_swap(&0b0011, 2);
        assert_eq!(bits, 0b0100);
    }
}
