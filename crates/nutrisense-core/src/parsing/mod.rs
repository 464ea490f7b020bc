//! Label normalization for service responses.

pub mod normalize;
