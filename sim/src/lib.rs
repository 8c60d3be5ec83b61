//! COINLAB Simulation
//!
//! Deploys the token, the calculator and the sale from a [`DeploymentConfig`]
//! and applies calls to them one at a time through a [`Chain`].
//!
//! [`DeploymentConfig`]: coinlab_core::DeploymentConfig
//! [`Chain`]: coinlab_core::Chain

pub mod error;
pub mod logging;
pub mod simulation;
pub mod world;

pub use error::{Result, SimError};
pub use simulation::{Contracts, Simulation};
pub use world::World;
