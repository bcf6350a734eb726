//! Store runtime: the `GraphStore` seam and its backends.
//!
//! Reads go straight to the backend. Writes are expressed as a
//! [`MutationPlan`] and applied atomically by [`GraphStore::execute`].

pub mod commands;
pub mod executor;
pub mod memory;
pub mod scripts;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use commands::{Guard, MutationCommand, MutationPlan};
pub use executor::{RedisStore, cleanup_pattern, execute_plan};
pub use memory::MemoryStore;

use crate::errors::GraphError;

/// Document, set and sorted-index operations the engines need from a store.
///
/// Handles are cheap to clone and share one underlying connection or state.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Clone {
    async fn get_document(&self, key: &str) -> Result<Option<String>, GraphError>;

    /// Fetches several documents at once; the result is aligned with `keys`.
    async fn get_documents(&self, keys: &[String]) -> Result<Vec<Option<String>>, GraphError>;

    /// Set members in ascending order.
    async fn members(&self, relation_key: &str) -> Result<Vec<String>, GraphError>;

    async fn is_member(&self, relation_key: &str, member: &str) -> Result<bool, GraphError>;

    async fn cardinality(&self, relation_key: &str) -> Result<u64, GraphError>;

    /// Index members by descending score, equal scores by descending member.
    async fn index_newest_first(&self, index_key: &str) -> Result<Vec<String>, GraphError>;

    async fn index_len(&self, index_key: &str) -> Result<u64, GraphError>;

    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, GraphError>;
}

pub(crate) fn decode_document<T>(raw: &str) -> Result<T, GraphError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(raw).map_err(|err| GraphError::Other {
        message: format!("failed to deserialize document: {err}").into(),
    })
}

pub(crate) fn encode_error(err: serde_json::Error) -> GraphError {
    GraphError::Other {
        message: format!("failed to serialize document: {err}").into(),
    }
}
