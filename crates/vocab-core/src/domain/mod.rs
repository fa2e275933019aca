pub mod error;
pub mod models;
pub mod sense_id;

pub use error::*;
pub use models::*;
