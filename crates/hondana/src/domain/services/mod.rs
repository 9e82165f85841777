pub mod catalogue;
pub mod normalizer;
