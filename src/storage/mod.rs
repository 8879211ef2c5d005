pub mod cache;

pub use cache::{PreparedData, SessionCache};
