pub mod entries;
pub mod panels;
