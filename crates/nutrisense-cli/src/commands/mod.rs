pub mod crops;
pub mod diagnose;
pub mod knowledge;
