pub mod item;
pub mod store;
