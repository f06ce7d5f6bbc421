pub mod batch;
pub mod defs;

pub use batch::{OutputBatch, STYLE};
pub use defs::{Delivery, FeedEntry, ResultFragment};
