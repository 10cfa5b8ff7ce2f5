use crate::closure::make_group;
use crate::spec::SymmetrySpec;
use crate::symmetry::{Symmetry, SymmetryWidth};
use crate::{Error, Result};
use num_complex::Complex64;
use tracing::debug;

/// A closed symmetry group in compiled form. Immutable once built and safe to share between threads.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Group {
    symmetries: Vec<Symmetry>,
}

impl Group {
    /// Closes `generators` under composition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSymmetries`] if the generators contradict each other
    pub fn new(generators: &[Symmetry]) -> Result<Self> {
        let specs: Vec<SymmetrySpec> = generators.iter().map(Symmetry::to_spec).collect();
        Self::from_specs(&specs)
    }

    /// # Errors
    ///
    /// Same as [`Group::new`], and [`Error::InvalidPermutation`] if an element cannot be compiled
    pub fn from_specs(generators: &[SymmetrySpec]) -> Result<Self> {
        let specs = make_group(generators)?;
        let symmetries = specs.iter().map(Symmetry::try_from).collect::<Result<Vec<_>>>()?;
        debug!(generators = generators.len(), size = symmetries.len(), "built symmetry group");
        Ok(Self { symmetries })
    }

    /// Group consisting of just the identity on `number_spins` spins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumberSpins`] unless `number_spins` is between 1 and 512
    pub fn trivial(number_spins: usize) -> Result<Self> {
        let identity = SymmetrySpec::identity(number_spins)?;
        Ok(Self {
            symmetries: vec![Symmetry::try_from(&identity)?],
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symmetries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symmetries.is_empty()
    }

    #[must_use]
    pub fn symmetries(&self) -> &[Symmetry] {
        &self.symmetries
    }

    /// `None` for the empty group.
    #[must_use]
    pub fn number_spins(&self) -> Option<usize> {
        self.symmetries.first().map(Symmetry::number_spins)
    }

    /// Depth shared by the networks of all elements, `None` for the empty group.
    ///
    /// # Panics
    ///
    /// Will panic if two elements have networks of different depth
    #[must_use]
    pub fn network_depth(&self) -> Option<usize> {
        let depth = self.symmetries.first()?.network_depth();
        assert!(
            self.symmetries.iter().all(|symmetry| symmetry.network_depth() == depth),
            "not all networks have the same depth"
        );
        Some(depth)
    }

    /// Writes the network parameters and eigenvalues of every element.
    ///
    /// `masks` is row-major with one row per network stage and one column per group element, so the mask of
    /// element `i` at stage `s` lands at `masks[s * self.len() + i]`. All elements share their shifts, which
    /// are written once. Nothing is written if an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SystemError`] if the group is empty, if `Bits` is not the width of the group's
    /// networks, or if one of the buffers is too short
    pub fn dump_symmetry_info<Bits: SymmetryWidth>(
        &self,
        masks: &mut [Bits],
        shifts: &mut [u32],
        eigenvalues: &mut [Complex64],
    ) -> Result<()> {
        let Some(depth) = self.network_depth() else {
            debug!("group is empty, leaving masks, shifts, and eigenvalues unchanged");
            return Err(Error::SystemError("cannot dump symmetry info of an empty group"));
        };
        let count = self.len();
        if masks.len() < depth * count || shifts.len() < depth || eigenvalues.len() < count {
            return Err(Error::SystemError("output buffers are too short"));
        }
        let compiled = self
            .symmetries
            .iter()
            .map(Bits::compiled)
            .collect::<Option<Vec<_>>>()
            .ok_or(Error::SystemError("mask type does not match the group's bit width"))?;

        shifts[..depth].copy_from_slice(compiled[0].network().shifts());
        for (column, symmetry) in compiled.iter().enumerate() {
            eigenvalues[column] = symmetry.eigenvalue();
            for (row, mask) in symmetry.network().masks().iter().enumerate() {
                masks[row * count + column] = *mask;
            }
        }
        Ok(())
    }
}
