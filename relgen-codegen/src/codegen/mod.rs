//! Code generation module

mod code_generator;
mod model_generator;
mod naming;
mod output;
mod service_generator;
mod template;

pub use code_generator::*;
pub use model_generator::*;
pub use naming::*;
pub use output::*;
pub use service_generator::*;
pub use template::*;
