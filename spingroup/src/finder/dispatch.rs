//! Runtime selection of the batched kernel.
//!
//! The batch code in [`super::batch`] is compiled once per [`KernelLevel`] with that level's target features.
//! The best level the CPU supports is picked on first use and can be overridden through [`KERNEL_ENV_VAR`].

use super::batch;
use crate::basis::{BasisHeader, SmallBasis, StateInfo};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Environment variable naming the kernel to use instead of the detected one, e.g. `portable`.
pub const KERNEL_ENV_VAR: &str = "SPINGROUP_KERNEL";

/// Instruction set a batched kernel is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelLevel {
    /// No target features beyond the compilation baseline.
    Portable,
    #[cfg(target_arch = "x86_64")]
    Avx,
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

impl KernelLevel {
    const ALL: &'static [KernelLevel] = &[
        KernelLevel::Portable,
        #[cfg(target_arch = "x86_64")]
        KernelLevel::Avx,
        #[cfg(target_arch = "x86_64")]
        KernelLevel::Avx2,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            KernelLevel::Portable => "portable",
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx => "avx",
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx2 => "avx2",
        }
    }

    #[must_use]
    pub fn is_supported(self) -> bool {
        match self {
            KernelLevel::Portable => true,
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx => is_x86_feature_detected!("avx"),
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx2 => is_x86_feature_detected!("avx2"),
        }
    }

    /// Levels the current CPU can run, from least to most capable.
    #[must_use]
    pub fn available() -> Vec<KernelLevel> {
        Self::ALL.iter().copied().filter(|level| level.is_supported()).collect()
    }

    /// The most capable supported level.
    #[must_use]
    pub fn detect() -> KernelLevel {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| level.is_supported())
            .unwrap_or(KernelLevel::Portable)
    }
}

impl fmt::Display for KernelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kernel '{0}'")]
pub struct UnknownKernel(pub String);

impl FromStr for KernelLevel {
    type Err = UnknownKernel;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownKernel(name.to_owned()))
    }
}

/// # Safety
///
/// The CPU must support the target features the function was compiled with.
type StateInfoFn = unsafe fn(&BasisHeader, &SmallBasis, u64) -> StateInfo<u64>;

/// # Safety
///
/// Same as [`StateInfoFn`].
type IsRepresentativeFn = unsafe fn(&BasisHeader, &SmallBasis, u64) -> bool;

/// Function pointers of one kernel level, resolved once.
#[derive(Clone, Copy)]
pub struct Kernels {
    level: KernelLevel,
    state_info: StateInfoFn,
    is_representative: IsRepresentativeFn,
}

impl fmt::Debug for Kernels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernels").field("level", &self.level).finish()
    }
}

impl Kernels {
    /// `None` if the current CPU cannot run `level`.
    #[must_use]
    pub fn for_level(level: KernelLevel) -> Option<Self> {
        if !level.is_supported() {
            return None;
        }
        let (state_info, is_representative): (StateInfoFn, IsRepresentativeFn) = match level {
            KernelLevel::Portable => (state_info_portable, is_representative_portable),
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx => (state_info_avx, is_representative_avx),
            #[cfg(target_arch = "x86_64")]
            KernelLevel::Avx2 => (state_info_avx2, is_representative_avx2),
        };
        Some(Self {
            level,
            state_info,
            is_representative,
        })
    }

    #[must_use]
    pub fn portable() -> Self {
        Self {
            level: KernelLevel::Portable,
            state_info: state_info_portable,
            is_representative: is_representative_portable,
        }
    }

    #[must_use]
    pub fn level(&self) -> KernelLevel {
        self.level
    }

    #[must_use]
    pub fn get_state_info(&self, header: &BasisHeader, basis: &SmallBasis, bits: u64) -> StateInfo<u64> {
        // SAFETY: `for_level` only resolves functions whose target features the CPU supports.
        unsafe { (self.state_info)(header, basis, bits) }
    }

    #[must_use]
    pub fn is_representative(&self, header: &BasisHeader, basis: &SmallBasis, bits: u64) -> bool {
        // SAFETY: see `get_state_info`.
        unsafe { (self.is_representative)(header, basis, bits) }
    }
}

fn state_info_portable(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> StateInfo<u64> {
    batch::get_state_info(header, basis, bits)
}

fn is_representative_portable(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> bool {
    batch::is_representative(header, basis, bits)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn state_info_avx(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> StateInfo<u64> {
    batch::get_state_info(header, basis, bits)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx")]
unsafe fn is_representative_avx(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> bool {
    batch::is_representative(header, basis, bits)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn state_info_avx2(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> StateInfo<u64> {
    batch::get_state_info(header, basis, bits)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn is_representative_avx2(header: &BasisHeader, basis: &SmallBasis, bits: u64) -> bool {
    batch::is_representative(header, basis, bits)
}

static KERNELS: OnceLock<Kernels> = OnceLock::new();

/// The kernels used by [`crate::SmallBasis`], resolved on first call.
pub fn kernels() -> &'static Kernels {
    KERNELS.get_or_init(resolve_kernels)
}

fn resolve_kernels() -> Kernels {
    let detected = KernelLevel::detect();
    let level = match std::env::var(KERNEL_ENV_VAR) {
        Ok(requested) => match requested.parse::<KernelLevel>() {
            Ok(level) if level.is_supported() => level,
            Ok(level) => {
                warn!(requested = %level, fallback = %detected, "requested kernel is not supported by this CPU");
                detected
            }
            Err(error) => {
                warn!(%error, fallback = %detected, "ignoring {}", KERNEL_ENV_VAR);
                detected
            }
        },
        Err(_) => detected,
    };
    info!(kernel = %level, "selected representative finder kernel");
    Kernels::for_level(level).unwrap_or_else(Kernels::portable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for level in KernelLevel::ALL {
            assert_eq!(level.name().parse::<KernelLevel>(), Ok(*level));
        }
        assert_eq!(" Portable ".parse::<KernelLevel>(), Ok(KernelLevel::Portable));
        assert!("sse9".parse::<KernelLevel>().is_err());
    }

    #[test]
    fn portable_is_always_available() {
        assert!(KernelLevel::available().contains(&KernelLevel::Portable));
        assert!(KernelLevel::available().contains(&KernelLevel::detect()));
        assert_eq!(Kernels::for_level(KernelLevel::Portable).map(|k| k.level()), Some(KernelLevel::Portable));
    }

    #[test]
    fn selected_kernel_is_supported() {
        assert!(kernels().level().is_supported());
    }
}
