pub mod activations;
mod init;
pub mod layers;
pub mod loss;
mod sequential;

pub use init::ParamInit;
pub use sequential::Sequential;
