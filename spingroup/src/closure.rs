use crate::Result;
use crate::spec::{SymmetrySpec, compose, equal};
use itertools::iproduct;
use tracing::debug;

fn contains(group: &[SymmetrySpec], element: &SymmetrySpec) -> Result<bool> {
    for member in group {
        if equal(member, element)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Smallest set of symmetries that contains `generators` and is closed under [`compose`].
///
/// No generators give an empty group, not the trivial one. Elements appear in the order they were discovered:
/// deduplicated generators first, then the products found in each round.
///
/// # Errors
///
/// Returns [`crate::Error::IncompatibleSymmetries`] if two generators, or a generator and some product, claim
/// different sectors for the same permutation, or if some product has a phase the permutation cannot carry
pub fn make_group(generators: &[SymmetrySpec]) -> Result<Vec<SymmetrySpec>> {
    let mut group: Vec<SymmetrySpec> = Vec::with_capacity(generators.len());
    for generator in generators {
        if !contains(&group, generator)? {
            group.push(generator.clone());
        }
    }

    let mut round = 0usize;
    loop {
        let mut extra = Vec::new();
        for (left, right) in iproduct!(group.iter(), group.iter()) {
            let product = compose(left, right)?;
            if !contains(&group, &product)? && !contains(&extra, &product)? {
                extra.push(product);
            }
        }
        round += 1;
        debug!(round, size = group.len(), new_elements = extra.len(), "group closure round");
        if extra.is_empty() {
            break;
        }
        group.append(&mut extra);
    }
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_generators_give_empty_group() {
        assert_eq!(make_group(&[]), Ok(vec![]));
    }

    #[test]
    fn contradicting_generators_fail() {
        let translation = SymmetrySpec::new(vec![1, 2, 3, 0], 0).unwrap();
        let twisted = SymmetrySpec::new(vec![1, 2, 3, 0], 1).unwrap();
        assert_eq!(make_group(&[translation, twisted]), Err(Error::IncompatibleSymmetries));
    }

    #[test]
    fn duplicated_generators_are_merged() {
        let translation = SymmetrySpec::new(vec![1, 2, 0], 1).unwrap();
        let group = make_group(&[translation.clone(), translation]).unwrap();
        assert_eq!(group.len(), 3);
    }
}
