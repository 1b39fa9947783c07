//! Core math modules.

pub mod beta;
pub mod gamma;
pub mod normal;
pub mod special;
pub mod variate;
