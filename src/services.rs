pub mod items;
pub mod report;
