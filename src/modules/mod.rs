//! Modules layer - Infrastructure components that are not HTTP features
//!
//! Contains the client-side offline report queue used by apps embedding this crate.

pub mod offline_queue;
