//! Mathematical primitives for SCPN Discharge Kinetics.

pub mod random;
pub mod sampling;
pub mod vector;
