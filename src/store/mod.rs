mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryPropertyStore;
pub use sqlite::SqlitePropertyStore;
pub use traits::{PropertyStore, StoreFuture};

#[cfg(test)]
mod tests;
