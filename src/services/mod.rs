pub mod completion;
pub mod history;
