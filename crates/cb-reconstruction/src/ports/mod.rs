//! Ports (hexagonal architecture boundaries) for the reconstruction engine.

pub mod inbound;
pub mod outbound;
