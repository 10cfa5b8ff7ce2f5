pub mod batched;
pub mod bits;
pub mod bits512;
pub mod network;
pub mod permutation;

pub use batched::{BatchedBenesNetwork, LANE_COUNT, Lanes};
pub use bits::{BitPattern, flip_mask};
pub use bits512::Bits512;
pub use network::BenesNetwork;
pub use permutation::{PermutationError, periodicity, permute_bits, validate_permutation};

/// Largest number of spins a bit pattern can describe.
pub const MAX_NUMBER_SPINS: usize = Bits512::BITS;

/// Largest number of spins that still fits into a single `u64`.
pub const SMALL_NUMBER_SPINS: usize = u64::BITS as usize;
