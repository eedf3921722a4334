//! Sampling strategies for the RANSAC core.
//!
//! Samplers implement [`Sampler`](crate::core::Sampler) and draw distinct
//! candidate indices for the minimal samples.

pub mod uniform;

pub use uniform::UniformRandomSampler;
