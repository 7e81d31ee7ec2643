//! 基础设施层：持有外部资源（HTTP 客户端、凭证），只暴露存储能力

pub mod memory;
pub mod sheets;
pub mod store;
pub mod token;

pub use memory::InMemoryStore;
pub use sheets::SheetsStore;
pub use store::{RangeReader, ResponseStore, StoreError, ValueRange};
pub use token::ServiceAccountAuth;
