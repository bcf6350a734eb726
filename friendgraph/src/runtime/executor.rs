use std::borrow::Cow;

use redis::{AsyncCommands, aio::ConnectionLike, aio::ConnectionManager};
use serde_json::Value;

use crate::{
    errors::GraphError,
    runtime::{GraphStore, commands::MutationPlan, scripts::GRAPH_PLAN_SCRIPT},
};

/// Runs a plan through the Lua script. Redis executes a script without
/// interleaving other commands, so guards and commands apply as one unit.
pub async fn execute_plan<C>(conn: &mut C, plan: &MutationPlan) -> Result<Vec<Value>, GraphError>
where
    C: ConnectionLike + Send,
{
    let payload = serde_json::to_string(plan).map_err(|err| GraphError::Other {
        message: Cow::Owned(format!("failed to serialize plan: {err}")),
    })?;

    let mut invocation = GRAPH_PLAN_SCRIPT.prepare_invoke();
    invocation.arg(payload);
    let raw: String = invocation.invoke_async(conn).await.map_err(GraphError::from)?;

    let value: Value = serde_json::from_str(&raw).map_err(|err| GraphError::Other {
        message: Cow::Owned(format!("failed to parse lua response: {err}")),
    })?;

    if value.get("error").is_some() {
        return Err(map_store_error(&value));
    }

    // cjson encodes an empty table as `{}`, so a missing array means no results.
    Ok(value
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default())
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// Maps a guard failure payload (`{"error": code, ...}`) to a [`GraphError`].
/// Shared by every backend so they report failures identically.
pub(crate) fn map_store_error(value: &Value) -> GraphError {
    let Some(code) = value.get("error").and_then(Value::as_str) else {
        return GraphError::Other {
            message: Cow::Borrowed("lua_error"),
        };
    };

    match code {
        "entity_not_found" | "relation_missing" => GraphError::NotFound {
            entity: Cow::Owned(string_field(value, "entity").unwrap_or_else(|| "entity".to_string())),
            entity_id: string_field(value, "entity_id"),
        },
        "unique_constraint_violation" => GraphError::UniqueConstraintViolation {
            field: string_field(value, "field").unwrap_or_default(),
            value: string_field(value, "value").unwrap_or_default(),
            existing_entity_id: string_field(value, "existing_entity_id").unwrap_or_default(),
        },
        "unauthorized" => GraphError::Unauthorized {
            actor_id: string_field(value, "actor_id").unwrap_or_default(),
            entity_id: string_field(value, "entity_id").unwrap_or_default(),
        },
        "relation_conflict" => GraphError::Conflict {
            reason: string_field(value, "reason").unwrap_or_default(),
        },
        other => GraphError::Other {
            message: Cow::Owned(other.to_string()),
        },
    }
}

/// Redis-backed store. Documents are plain string values holding JSON,
/// relations are sets and reverse indices are sorted sets scored by time.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Create a store from a Redis connection URL.
    pub async fn connect(url: &str) -> Result<Self, GraphError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }

    /// Get a clone of the connection manager for advanced operations.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

impl GraphStore for RedisStore {
    async fn get_document(&self, key: &str) -> Result<Option<String>, GraphError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn get_documents(&self, keys: &[String]) -> Result<Vec<Option<String>>, GraphError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        Ok(redis::cmd("MGET").arg(keys).query_async(&mut conn).await?)
    }

    async fn members(&self, relation_key: &str) -> Result<Vec<String>, GraphError> {
        let mut conn = self.conn.clone();
        let mut members: Vec<String> = conn.smembers(relation_key).await?;
        members.sort();
        Ok(members)
    }

    async fn is_member(&self, relation_key: &str, member: &str) -> Result<bool, GraphError> {
        let mut conn = self.conn.clone();
        Ok(conn.sismember(relation_key, member).await?)
    }

    async fn cardinality(&self, relation_key: &str) -> Result<u64, GraphError> {
        let mut conn = self.conn.clone();
        Ok(conn.scard(relation_key).await?)
    }

    async fn index_newest_first(&self, index_key: &str) -> Result<Vec<String>, GraphError> {
        let mut conn = self.conn.clone();
        Ok(conn.zrevrange(index_key, 0, -1).await?)
    }

    async fn index_len(&self, index_key: &str) -> Result<u64, GraphError> {
        let mut conn = self.conn.clone();
        Ok(conn.zcard(index_key).await?)
    }

    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, GraphError> {
        log::debug!(
            "executing plan on redis: {} guards, {} commands",
            plan.guards.len(),
            plan.commands.len()
        );
        let mut conn = self.conn.clone();
        execute_plan(&mut conn, &plan).await
    }
}

/// Delete all keys matching a pattern (for test cleanup).
///
/// This performs a SCAN + DEL operation to safely delete keys without blocking Redis.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, GraphError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
