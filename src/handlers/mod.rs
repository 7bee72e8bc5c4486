pub mod ask;
pub mod catalog;
pub mod health;
pub mod sessions;

pub use ask::*;
pub use catalog::*;
pub use health::*;
pub use sessions::*;
