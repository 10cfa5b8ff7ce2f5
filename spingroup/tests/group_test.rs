use num_complex::Complex64;
use proptest::prelude::*;
use spinbits::permutation::identity_permutation;
use spinbits::{Bits512, periodicity};
use spingroup::spec::{compose, equal};
use spingroup::{Error, Group, Symmetry, SymmetrySpec, make_group};

fn translation(number_spins: usize) -> Vec<u16> {
    (0..number_spins).map(|site| ((site + 1) % number_spins) as u16).collect()
}

fn reflection(number_spins: usize) -> Vec<u16> {
    (0..number_spins)
        .map(|site| ((number_spins - site) % number_spins) as u16)
        .collect()
}

fn permutation_of(sizes: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = Vec<u16>> {
    sizes.prop_flat_map(|size| Just(identity_permutation(size)).prop_shuffle())
}

/// A permutation together with a sector it can carry.
fn symmetry_spec(sizes: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = SymmetrySpec> {
    permutation_of(sizes)
        .prop_flat_map(|permutation| {
            let order = periodicity(&permutation).unwrap();
            (Just(permutation), 0..order)
        })
        .prop_map(|(permutation, sector)| SymmetrySpec::new(permutation, sector).unwrap())
}

/// Up to three generators on the same few spins, all with the trivial phase so they never contradict.
fn untwisted_generators() -> impl Strategy<Value = Vec<SymmetrySpec>> {
    (1usize..=4).prop_flat_map(|size| {
        proptest::collection::vec(Just(identity_permutation(size)).prop_shuffle(), 1..=3).prop_map(|permutations| {
            permutations
                .into_iter()
                .map(|permutation| SymmetrySpec::new(permutation, 0).unwrap())
                .collect()
        })
    })
}

fn contains(group: &[SymmetrySpec], element: &SymmetrySpec) -> bool {
    group.iter().any(|member| equal(member, element).unwrap())
}

proptest! {
    #[test]
    fn spec_equals_itself(spec in symmetry_spec(1..=16)) {
        prop_assert_eq!(equal(&spec, &spec), Ok(true));
    }

    #[test]
    fn specs_on_different_sizes_are_incompatible(left in symmetry_spec(1..=8), right in symmetry_spec(9..=16)) {
        prop_assert_eq!(equal(&left, &right), Err(Error::IncompatibleSymmetries));
        prop_assert_eq!(compose(&left, &right), Err(Error::IncompatibleSymmetries));
    }

    #[test]
    fn composition_keeps_sector_below_periodicity(left in symmetry_spec(6..=6), right in symmetry_spec(6..=6)) {
        if let Ok(product) = compose(&left, &right) {
            prop_assert!(product.sector() < product.periodicity());
            prop_assert_eq!(product.periodicity(), periodicity(product.permutation()).unwrap());
            let phase = (left.phase() + right.phase()).fract();
            prop_assert!((product.phase() - phase).abs() < 1e-12 || (product.phase() - phase).abs() > 1.0 - 1e-12);
        }
    }

    #[test]
    fn cyclic_group_has_order_of_generator(generator in symmetry_spec(1..=10)) {
        let group = make_group(std::slice::from_ref(&generator)).unwrap();
        prop_assert_eq!(group.len() as u64, generator.periodicity());
        prop_assert!(contains(&group, &SymmetrySpec::identity(generator.number_spins()).unwrap()));
    }

    #[test]
    fn group_is_closed_under_composition(generators in untwisted_generators()) {
        let group = make_group(&generators).unwrap();
        for generator in &generators {
            prop_assert!(contains(&group, generator));
        }
        for left in &group {
            for right in &group {
                prop_assert!(contains(&group, &compose(left, right).unwrap()));
            }
        }
    }

    #[test]
    fn closure_ignores_generator_order(generators in untwisted_generators()) {
        let forward = make_group(&generators).unwrap();
        let reversed: Vec<SymmetrySpec> = generators.iter().rev().cloned().collect();
        let backward = make_group(&reversed).unwrap();
        prop_assert_eq!(forward.len(), backward.len());
        for element in &forward {
            prop_assert!(contains(&backward, element));
        }
    }
}

#[test]
fn composition_phases_must_fit() {
    let swap = SymmetrySpec::new(vec![1, 0], 1).unwrap();
    let identity = compose(&swap, &swap).unwrap();
    assert_eq!(identity.permutation(), &[0, 1]);
    assert_eq!(identity.sector(), 0);
    assert_eq!(identity.periodicity(), 1);

    let cycle = SymmetrySpec::new(vec![1, 2, 0, 3, 4], 0).unwrap();
    let half_turn = SymmetrySpec::new(vec![0, 1, 2, 4, 3], 1).unwrap();
    let product = compose(&cycle, &half_turn).unwrap();
    assert_eq!(product.permutation(), &[1, 2, 0, 4, 3]);
    assert_eq!(product.periodicity(), 6);
    assert_eq!(product.sector(), 3);

    // two overlapping swaps make a three-cycle, which cannot carry a half turn
    let left = SymmetrySpec::new(vec![1, 0, 2], 1).unwrap();
    let right = SymmetrySpec::new(vec![0, 2, 1], 0).unwrap();
    assert_eq!(compose(&left, &right), Err(Error::IncompatibleSymmetries));
}

#[test]
fn empty_and_identity_generators() {
    assert_eq!(make_group(&[]).unwrap(), vec![]);
    let identity = SymmetrySpec::identity(5).unwrap();
    assert_eq!(make_group(std::slice::from_ref(&identity)).unwrap(), vec![identity]);
}

#[test]
fn momentum_and_reflection_must_agree() {
    let number_spins = 6;
    let moving = SymmetrySpec::new(translation(number_spins), 1).unwrap();
    let mirror = SymmetrySpec::new(reflection(number_spins), 0).unwrap();
    assert_eq!(make_group(&[moving, mirror.clone()]), Err(Error::IncompatibleSymmetries));

    let staggered = SymmetrySpec::new(translation(number_spins), 3).unwrap();
    assert_eq!(make_group(&[staggered, mirror]).unwrap().len(), 2 * number_spins);
}

#[test]
fn trivial_group_bounds() {
    assert_eq!(Group::trivial(0), Err(Error::InvalidNumberSpins(0)));
    assert_eq!(Group::trivial(513), Err(Error::InvalidNumberSpins(513)));
    let group = Group::trivial(4).unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.number_spins(), Some(4));
    assert_eq!(group.symmetries()[0].eigenvalue(), Complex64::new(1.0, 0.0));
    assert!(Group::trivial(512).unwrap().symmetries()[0].as_big().is_some());
}

#[test]
fn out_of_range_identities_are_errors() {
    for number_spins in [0, 513, 600] {
        let identity = SymmetrySpec::identity(number_spins);
        assert_eq!(identity, Err(Error::InvalidNumberSpins(number_spins)));
    }
    let generators = [SymmetrySpec::identity(512).unwrap(), SymmetrySpec::new(reflection(512), 1).unwrap()];
    let group = Group::from_specs(&generators).unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group.number_spins(), Some(512));
}

#[test]
fn from_specs_rejects_mixed_sizes() {
    let generators = [SymmetrySpec::identity(4).unwrap(), SymmetrySpec::new(translation(5), 0).unwrap()];
    assert_eq!(Group::from_specs(&generators), Err(Error::IncompatibleSymmetries));
}

#[test]
fn empty_group_has_no_networks() {
    let group = Group::new(&[]).unwrap();
    assert!(group.is_empty());
    assert_eq!(group.number_spins(), None);
    assert_eq!(group.network_depth(), None);

    let mut masks = [7u64; 4];
    let mut shifts = [7u32; 4];
    let mut eigenvalues = [Complex64::new(7.0, 7.0); 4];
    assert!(matches!(
        group.dump_symmetry_info(&mut masks, &mut shifts, &mut eigenvalues),
        Err(Error::SystemError(_))
    ));
    assert_eq!(masks, [7; 4]);
    assert_eq!(shifts, [7; 4]);
}

#[test]
fn group_elements_share_network_depth() {
    let generators = [
        Symmetry::new(translation(10), 5).unwrap(),
        Symmetry::new(reflection(10), 0).unwrap(),
    ];
    let group = Group::new(&generators).unwrap();
    assert_eq!(group.len(), 20);
    assert_eq!(group.number_spins(), Some(10));
    // width 16
    assert_eq!(group.network_depth(), Some(7));
    for symmetry in group.symmetries() {
        assert_eq!(symmetry.network_shifts(), group.symmetries()[0].network_shifts());
    }
}

#[test]
fn dump_symmetry_info_is_row_major() {
    let group = Group::new(&[Symmetry::new(translation(4), 1).unwrap()]).unwrap();
    let count = group.len();
    let depth = group.network_depth().unwrap();
    assert_eq!((count, depth), (4, 3));

    let mut masks = vec![0u64; depth * count];
    let mut shifts = vec![0u32; depth];
    let mut eigenvalues = vec![Complex64::new(0.0, 0.0); count];
    group.dump_symmetry_info(&mut masks, &mut shifts, &mut eigenvalues).unwrap();

    assert_eq!(shifts, group.symmetries()[0].network_shifts());
    for (column, symmetry) in group.symmetries().iter().enumerate() {
        assert_eq!(eigenvalues[column], symmetry.eigenvalue());
        let network = symmetry.as_small().unwrap().network();
        for (row, mask) in network.masks().iter().enumerate() {
            assert_eq!(masks[row * count + column], *mask);
        }
    }
}

#[test]
fn dump_symmetry_info_leaves_outputs_alone_on_error() {
    let group = Group::new(&[Symmetry::new(translation(4), 0).unwrap()]).unwrap();

    let mut masks = vec![9u64; 11];
    let mut shifts = vec![9u32; 3];
    let mut eigenvalues = vec![Complex64::new(9.0, 0.0); 4];
    assert!(group.dump_symmetry_info(&mut masks, &mut shifts, &mut eigenvalues).is_err());
    assert!(masks.iter().all(|mask| *mask == 9));
    assert!(shifts.iter().all(|shift| *shift == 9));

    let mut wide_masks = vec![Bits512::default(); 12];
    assert!(group.dump_symmetry_info(&mut wide_masks, &mut shifts, &mut eigenvalues).is_err());
    assert!(shifts.iter().all(|shift| *shift == 9));
    assert!(eigenvalues.iter().all(|value| *value == Complex64::new(9.0, 0.0)));
}

#[test]
fn large_groups_use_wide_networks() {
    let group = Group::new(&[Symmetry::new(translation(70), 0).unwrap()]).unwrap();
    assert_eq!(group.len(), 70);
    // width 128
    assert_eq!(group.network_depth(), Some(13));
    let count = group.len();
    let mut masks = vec![Bits512::default(); 13 * count];
    let mut shifts = vec![0u32; 13];
    let mut eigenvalues = vec![Complex64::new(0.0, 0.0); count];
    group.dump_symmetry_info(&mut masks, &mut shifts, &mut eigenvalues).unwrap();
    assert_eq!(shifts[0], 64);
    assert_eq!(shifts[6], 1);
}

#[test]
fn symmetry_validation() {
    assert!(matches!(Symmetry::new(vec![0, 0], 0), Err(Error::InvalidPermutation(_))));
    assert!(matches!(Symmetry::new(vec![], 0), Err(Error::InvalidPermutation(_))));
    assert_eq!(
        Symmetry::new(translation(3), 3),
        Err(Error::InvalidSector {
            sector: 3,
            periodicity: 3
        })
    );
    let symmetry = Symmetry::new(translation(4), 1).unwrap();
    assert_eq!(symmetry.eigenvalue(), Complex64::new(0.0, 1.0));
    assert_eq!(symmetry.phase(), 0.25);
    assert_eq!(symmetry.to_spec(), SymmetrySpec::new(translation(4), 1).unwrap());
}
