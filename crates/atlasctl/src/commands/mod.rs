//! Command implementations

pub mod cluster;
pub mod orgs;
pub mod project;
mod spinner;
