use crate::BenesNetwork;

pub const LANE_COUNT: usize = 8usize;

/// One value per lane. Eight `u64` lanes make up a single 512-bit vector.
pub type Lanes<T> = [T; LANE_COUNT];

/// Up to eight 64-bit [`BenesNetwork`]s of equal depth evaluated side by side.
///
/// `masks[stage][lane]` is the mask lane `lane` uses at `stage`. Unused lanes carry zero masks and therefore
/// act as the identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchedBenesNetwork {
    masks: Vec<Lanes<u64>>,
    shifts: Vec<u32>,
}

impl BatchedBenesNetwork {
    /// # Panics
    ///
    /// Will panic if `networks` is empty, has more than [`LANE_COUNT`] entries, or if the networks do not
    /// share their shifts
    #[must_use]
    pub fn new(networks: &[&BenesNetwork<u64>]) -> Self {
        assert!(
            !networks.is_empty() && networks.len() <= LANE_COUNT,
            "a batch holds between 1 and {LANE_COUNT} networks, got {}",
            networks.len()
        );
        let shifts = networks[0].shifts().to_vec();
        assert!(
            networks.iter().all(|network| network.shifts() == shifts.as_slice()),
            "networks in one batch must share their shifts"
        );
        let mut masks = vec![[0u64; LANE_COUNT]; shifts.len()];
        for (lane, network) in networks.iter().enumerate() {
            for (stage, &mask) in network.masks().iter().enumerate() {
                masks[stage][lane] = mask;
            }
        }
        Self { masks, shifts }
    }

    /// Applies lane `i`'s network to `lanes[i]` for every lane.
    ///
    /// Written lane by lane over fixed-size arrays so that LLVM turns every stage into a handful of vector
    /// instructions for whatever instruction set the caller was compiled for.
    #[inline(always)]
    pub fn apply(&self, lanes: &mut Lanes<u64>) {
        for (mask, &shift) in self.masks.iter().zip(self.shifts.iter()) {
            for (value, &lane_mask) in lanes.iter_mut().zip(mask.iter()) {
                let swapped = ((*value >> shift) ^ *value) & lane_mask;
                *value ^= swapped ^ (swapped << shift);
            }
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.masks.len()
    }

    #[must_use]
    pub fn masks(&self) -> &[Lanes<u64>] {
        &self.masks
    }

    #[must_use]
    pub fn shifts(&self) -> &[u32] {
        &self.shifts
    }
}
