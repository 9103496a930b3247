//! Collision-free naming and archive assembly.

pub(crate) mod naming;
pub(crate) mod packager;
