mod country;
mod date_of_birth;
mod email_address;

pub use country::*;
pub use date_of_birth::*;
pub use email_address::*;
