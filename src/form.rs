mod controller;
mod validation;
mod values;

pub use controller::*;
pub use validation::*;
pub use values::*;
