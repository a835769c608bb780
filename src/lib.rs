pub mod api;
pub mod codegen;
pub mod config;
pub mod error;
pub mod model;
pub mod runtime;
pub mod score;
pub mod support;
pub mod template;

// Re-exports: the facade and the types callers name most often
pub use api::*;
pub use codegen::{port, Converter, Ported, Target};
pub use config::{HarnessOptions, PorterConfig};
pub use error::{PorterError, Result};
pub use model::{ModelDescriptor, ModelKind};
pub use runtime::{Harness, Prediction};
pub use support::{Language, Method, Mode};
