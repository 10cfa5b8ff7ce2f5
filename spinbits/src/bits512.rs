use crate::BitPattern;
use derive_more::{From, Into};
use rand::distributions::{Distribution, Standard};
use std::cmp::Ordering;

pub const BITS512_WORD_COUNT: usize = 8usize;
pub type Word = u64;

/// 512-bit spin configuration, stored as little-endian words: `words[0]` holds spins `0..64`.
///
/// Aligned like a cache line so that LLVM can keep it in vector registers when applying networks.
#[repr(C, align(64))]
#[derive(Eq, Clone, Copy, Debug, Hash, PartialEq, Default, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bits512 {
    pub words: [Word; BITS512_WORD_COUNT],
}

impl Bits512 {
    /// [`Bits512`] with all bits set to one.
    #[must_use]
    pub fn ones() -> Self {
        [Word::MAX; BITS512_WORD_COUNT].into()
    }

    #[must_use]
    pub fn from_word(word: Word) -> Self {
        let mut words = [0; BITS512_WORD_COUNT];
        words[0] = word;
        Self { words }
    }
}

impl Ord for Bits512 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.words.iter().rev().cmp(other.words.iter().rev())
    }
}

impl PartialOrd for Bits512 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Distribution<Bits512> for Standard {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Bits512 {
        Bits512 { words: rng.r#gen() }
    }
}

const WORD_BITS: usize = Word::BITS as usize;

impl BitPattern for Bits512 {
    const BITS: usize = BITS512_WORD_COUNT * WORD_BITS;

    fn lowest_ones(mut count: usize) -> Self {
        assert!(count <= Self::BITS, "cannot set {count} bits of a Bits512");
        let mut result = Self::default();
        for word in &mut result.words {
            let taken = count.min(WORD_BITS);
            *word = Word::lowest_ones(taken);
            count -= taken;
        }
        result
    }

    #[inline]
    fn index(&self, index: usize) -> bool {
        self.words[index / WORD_BITS].index(index % WORD_BITS)
    }

    #[inline]
    fn assign_index(&mut self, index: usize, to: bool) {
        self.words[index / WORD_BITS].assign_index(index % WORD_BITS, to);
    }

    #[inline]
    fn weight(&self) -> usize {
        self.words.iter().map(BitPattern::weight).sum()
    }

    #[inline]
    fn bitand(&self, other: &Self) -> Self {
        let mut words = self.words;
        for (word, other_word) in words.iter_mut().zip(other.words.iter()) {
            *word &= other_word;
        }
        Self { words }
    }

    #[inline]
    fn bitxor_assign(&mut self, other: &Self) {
        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word ^= other_word;
        }
    }

    fn shift_left(&self, shift: usize) -> Self {
        let word_shift = shift / WORD_BITS;
        let bit_shift = shift % WORD_BITS;
        let mut words = [0; BITS512_WORD_COUNT];
        for (source, target) in words.iter_mut().skip(word_shift).enumerate() {
            *target = self.words[source] << bit_shift;
            if bit_shift != 0 && source > 0 {
                *target |= self.words[source - 1] >> (WORD_BITS - bit_shift);
            }
        }
        Self { words }
    }

    fn shift_right(&self, shift: usize) -> Self {
        let word_shift = shift / WORD_BITS;
        let bit_shift = shift % WORD_BITS;
        let mut words = [0; BITS512_WORD_COUNT];
        for (offset, target) in words.iter_mut().take(BITS512_WORD_COUNT.saturating_sub(word_shift)).enumerate() {
            let source = offset + word_shift;
            *target = self.words[source] >> bit_shift;
            if bit_shift != 0 && source + 1 < BITS512_WORD_COUNT {
                *target |= self.words[source + 1] << (WORD_BITS - bit_shift);
            }
        }
        Self { words }
    }
}
