mod data;
mod error;
mod gradient;
mod model;
mod stats;

pub use data::{Example, ExampleBlock};
pub use error::MlError;
pub use gradient::{GradientSet, LayerGrad, LayerShape};
pub use model::Model;
pub use stats::Progress;
