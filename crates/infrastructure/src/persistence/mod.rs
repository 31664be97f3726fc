//! JSON file persistence.

mod file_store;
mod paths;

pub use file_store::FileConfigStore;
pub use paths::DataRoot;
