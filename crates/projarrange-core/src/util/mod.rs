pub mod group;

pub use group::{distinct_by_key, group_by_key};
