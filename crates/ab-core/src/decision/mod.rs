//! Decisions taken from observed counts: when to stop, where to send
//! traffic, and how much traffic to plan for.

pub mod bandit;
pub mod sample_size;
pub mod sequential;
