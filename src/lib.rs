//! Leakwatch core: water-leak reporting API and the offline report queue.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
