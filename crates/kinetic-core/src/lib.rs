//! Stochastic particle kinetics for plasma discharge cells.
//!
//! Reaction network integration: reaction, propensity, ssa, tau, hybrid, stepper, network
//! Air chemistry closures: air3, physics
//! Population control: point_mass, partition, tree, superparticle
//! Per-cell and multi-cell drivers: cell

pub mod air3;
pub mod cell;
pub mod energy;
pub mod hybrid;
pub mod network;
pub mod partition;
pub mod photo_reaction;
pub mod physics;
pub mod point_mass;
pub mod propensity;
pub mod reaction;
pub mod ssa;
pub mod stepper;
pub mod superparticle;
pub mod tau;
pub mod tree;
