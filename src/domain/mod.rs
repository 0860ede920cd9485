pub mod item;
pub mod outcome;

pub use item::{Item, NewItem, RemoteRecord};
pub use outcome::Outcome;
