use spinbits::PermutationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("symmetries are incompatible")]
    IncompatibleSymmetries,
    #[error("invalid number of spins: {0}")]
    InvalidNumberSpins(usize),
    #[error("invalid permutation: {0}")]
    InvalidPermutation(#[from] PermutationError),
    #[error("invalid sector {sector} for periodicity {periodicity}")]
    InvalidSector { sector: u64, periodicity: u64 },
    #[error("periodicity {periodicity} does not match the order {order} of the permutation")]
    InvalidPeriodicity { periodicity: u64, order: u64 },
    #[error("invalid spin inversion {0}, expected -1, 0, or 1")]
    InvalidSpinInversion(i8),
    #[error("system error: {0}")]
    SystemError(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
