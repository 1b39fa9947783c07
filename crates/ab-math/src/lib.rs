//! Experiment statistics math utilities.

pub mod math;

pub use math::beta::*;
pub use math::gamma::{chi_square_sf, gamma_p, gamma_q};
pub use math::normal::*;
pub use math::special::*;
pub use math::variate;
