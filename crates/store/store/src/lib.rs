pub mod error;
pub mod rule;
pub mod store;
pub mod testing;

pub use error::StoreError;
pub use rule::{RuleId, StoredRule};
pub use store::RuleStore;
