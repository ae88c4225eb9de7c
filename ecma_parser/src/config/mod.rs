//! Compile-time limits and per-invocation feature configuration

pub mod constants;
pub mod features;

pub use features::{EcmaFeatures, EcmaVersion, Feature, FeatureSet, ParserOptions};
