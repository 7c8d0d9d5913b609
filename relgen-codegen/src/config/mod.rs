//! Configuration for relgen-codegen

pub mod defaults;
mod settings;

pub use settings::*;
