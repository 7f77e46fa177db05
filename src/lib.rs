pub mod anesthetic;
pub mod animation;
pub mod config;
pub mod distribution;
pub mod dose;
pub mod export;
pub mod init_config;
pub mod ionization;
pub mod profiler;
pub mod stage;
pub mod utils;

pub use distribution::compartment_distribution;
pub use dose::compute_max_dose;
pub use ionization::base_percent;
pub use stage::mechanism_stage;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
