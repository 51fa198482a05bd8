//! Read-only build and capability metadata.

use crate::blend::algorithms::Algorithm;
use crate::codec::png::{CompressionHint, FilterHint};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMPILER: &str = "rustc";
/// Minimum supported compiler version declared by the package.
pub const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");
pub const FEATURES: [&str; 1] = ["cpu"];
pub const PLATFORM_CPU_BITS: u32 = usize::BITS;

/// `name()` of every `$ty::ALL` entry, in order.
macro_rules! names_of {
    ($ty:ty) => {{
        let mut names = [""; <$ty>::ALL.len()];
        let mut i = 0;
        while i < names.len() {
            names[i] = <$ty>::ALL[i].name();
            i += 1;
        }
        names
    }};
}

pub const ALGORITHMS: [&str; Algorithm::ALL.len()] = names_of!(Algorithm);
pub const FILTER_TYPES: [&str; FilterHint::ALL.len()] = names_of!(FilterHint);
pub const COMPRESSION_TYPES: [&str; CompressionHint::ALL.len()] = names_of!(CompressionHint);

pub const DEFAULT_THREAD_POOL_SIZE: usize = 1;
pub const MAX_THREAD_POOL_SIZE: usize = 256;

/// All metadata constants in one serializable value.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub compiler: &'static str,
    pub rust_version: &'static str,
    pub features: Vec<&'static str>,
    pub platform_cpu_bits: u32,
    pub algorithms: Vec<&'static str>,
    pub filter_types: Vec<&'static str>,
    pub compression_types: Vec<&'static str>,
    pub default_thread_pool_size: usize,
    pub max_thread_pool_size: usize,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        name: NAME,
        version: VERSION,
        compiler: COMPILER,
        rust_version: RUST_VERSION,
        features: FEATURES.to_vec(),
        platform_cpu_bits: PLATFORM_CPU_BITS,
        algorithms: ALGORITHMS.to_vec(),
        filter_types: FILTER_TYPES.to_vec(),
        compression_types: COMPRESSION_TYPES.to_vec(),
        default_thread_pool_size: DEFAULT_THREAD_POOL_SIZE,
        max_thread_pool_size: MAX_THREAD_POOL_SIZE,
    }
}

#[cfg(test)]
#[path = "../tests/unit/meta.rs"]
mod tests;
