pub mod commands;
pub mod errors;
pub mod events;
pub mod item;
pub mod loan;
pub mod value_objects;

pub use errors::*;
pub use events::*;
pub use value_objects::*;
