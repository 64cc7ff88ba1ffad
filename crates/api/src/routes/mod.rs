pub mod locations;
pub mod weather;

pub use locations::*;
pub use weather::*;
