pub mod basis;
pub mod closure;
pub mod error;
pub mod finder;
pub mod group;
pub mod spec;
pub mod symmetry;

pub use basis::{Basis, BasisBody, BasisHeader, BasisWidth, BatchedSmallSymmetry, BigBasis, SmallBasis, StateInfo};
pub use closure::make_group;
pub use error::{Error, Result};
pub use finder::RepresentativeFinder;
pub use group::Group;
pub use spec::SymmetrySpec;
pub use symmetry::{BigSymmetry, CompiledSymmetry, SmallSymmetry, Symmetry, SymmetryWidth};

/// Stabilizer sums at most this far from zero are treated as exactly zero.
pub const NORM_THRESHOLD: f64 = 1.0e-5;
