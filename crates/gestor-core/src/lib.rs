//! gestor-core
//!
//! Business logic and services for the Baião financial manager.
//! Depends on gestor-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod aggregation_service;
pub mod error;
pub mod format;
pub mod insight_service;
pub mod report_service;
pub mod storage;
pub mod store;
pub mod time;
pub mod transaction_service;

pub use aggregation_service::*;
pub use error::CoreError;
pub use insight_service::*;
pub use report_service::*;
pub use storage::{BlobStore, MemoryBlobStore};
pub use store::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;
