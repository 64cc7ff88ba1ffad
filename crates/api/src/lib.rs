pub mod db;
pub mod error;
pub mod provider;
pub mod routes;
pub mod services;
mod startup;
mod utils;

pub use db::*;
pub use error::Error;
pub use provider::*;
pub use routes::*;
pub use services::*;
pub use startup::*;
pub use utils::*;
