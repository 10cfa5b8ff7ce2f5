use crate::{BitPattern, MAX_NUMBER_SPINS};
use num_integer::Integer;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermutationError {
    #[error("permutation is empty")]
    Empty,
    #[error("permutation of length {length} does not fit into {capacity} bits")]
    TooLong { length: usize, capacity: usize },
    #[error("not a permutation: index {index} is out of range or repeated")]
    NotAPermutation { index: usize },
    #[error("order of the permutation does not fit into 64 bits")]
    PeriodicityOverflow,
}

/// Checks that `permutation` is a bijection on `0..permutation.len()` with at most 512 elements.
///
/// # Errors
///
/// Returns the first violated condition
pub fn validate_permutation(permutation: &[u16]) -> Result<(), PermutationError> {
    if permutation.is_empty() {
        return Err(PermutationError::Empty);
    }
    if permutation.len() > MAX_NUMBER_SPINS {
        return Err(PermutationError::TooLong {
            length: permutation.len(),
            capacity: MAX_NUMBER_SPINS,
        });
    }
    let mut seen = vec![false; permutation.len()];
    for &image in permutation {
        let index = usize::from(image);
        match seen.get_mut(index) {
            Some(flag) if !*flag => *flag = true,
            _ => return Err(PermutationError::NotAPermutation { index }),
        }
    }
    Ok(())
}

/// Order of `permutation`: the smallest `k > 0` with `permutation^k` equal to the identity.
///
/// `permutation` must be valid, see [`validate_permutation`].
///
/// # Errors
///
/// Returns [`PermutationError::PeriodicityOverflow`] if the order exceeds `u64::MAX`
pub fn periodicity(permutation: &[u16]) -> Result<u64, PermutationError> {
    let mut visited = vec![false; permutation.len()];
    let mut order = 1u64;
    for start in 0..permutation.len() {
        if visited[start] {
            continue;
        }
        let mut cycle_length = 0u64;
        let mut current = start;
        while !visited[current] {
            visited[current] = true;
            current = usize::from(permutation[current]);
            cycle_length += 1;
        }
        let gcd = order.gcd(&cycle_length);
        order = (order / gcd)
            .checked_mul(cycle_length)
            .ok_or(PermutationError::PeriodicityOverflow)?;
    }
    Ok(order)
}

#[must_use]
pub fn identity_permutation(size: usize) -> Vec<u16> {
    (0..size).map(|index| index as u16).collect()
}

#[must_use]
pub fn is_identity(permutation: &[u16]) -> bool {
    permutation
        .iter()
        .enumerate()
        .all(|(index, &image)| usize::from(image) == index)
}

/// `result[i] = left[right[i]]`, i.e. `right` is looked up first.
///
/// # Panics
///
/// Will panic if the lengths differ
#[must_use]
pub fn compose_permutations(left: &[u16], right: &[u16]) -> Vec<u16> {
    assert_eq!(left.len(), right.len());
    right.iter().map(|&index| left[usize::from(index)]).collect()
}

/// Applies `permutation` to `bits` one bit at a time: bit `j` of the result is bit `permutation[j]` of `bits`.
///
/// This is the reference semantics of [`crate::BenesNetwork::apply`].
#[must_use]
pub fn permute_bits<Bits: BitPattern>(permutation: &[u16], bits: &Bits) -> Bits {
    let mut result = *bits;
    for (target, &source) in permutation.iter().enumerate() {
        result.assign_index(target, bits.index(usize::from(source)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_repeated_images() {
        assert_eq!(
            validate_permutation(&[0, 1, 1]),
            Err(PermutationError::NotAPermutation { index: 1 })
        );
        assert_eq!(
            validate_permutation(&[0, 3, 1]),
            Err(PermutationError::NotAPermutation { index: 3 })
        );
        assert_eq!(validate_permutation(&[]), Err(PermutationError::Empty));
        assert!(validate_permutation(&[2, 0, 1]).is_ok());
    }

    #[test]
    fn periodicity_is_lcm_of_cycle_lengths() {
        assert_eq!(periodicity(&[0, 1, 2, 3]), Ok(1));
        assert_eq!(periodicity(&[1, 2, 3, 0]), Ok(4));
        assert_eq!(periodicity(&[1, 0, 3, 4, 2]), Ok(6));
    }

    #[test]
    fn composition_looks_up_right_first() {
        let shift = [1, 2, 3, 0];
        assert_eq!(compose_permutations(&shift, &shift), vec![2, 3, 0, 1]);
        let reflection = [3, 2, 1, 0];
        assert_eq!(compose_permutations(&shift, &reflection), vec![0, 3, 2, 1]);
    }

    #[test]
    fn permute_bits_moves_bit_to_preimage() {
        assert_eq!(permute_bits(&[1, 2, 3, 0], &0b0001u64), 0b1000);
        assert_eq!(permute_bits(&[1, 2, 3, 0], &0b1000u64), 0b0100);
    }
}
