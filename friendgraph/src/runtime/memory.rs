use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::{Value, json};

use crate::{
    errors::GraphError,
    runtime::{
        GraphStore,
        commands::{Guard, MutationCommand, MutationPlan, TreeDelete},
        executor::map_store_error,
    },
};

/// In-process store with the same semantics as the Redis backend.
///
/// A plan runs under one lock: guards are all checked before the first
/// command applies, so a rejected plan changes nothing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<String, String>,
    sets: HashMap<String, BTreeSet<String>>,
    indices: HashMap<String, HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GraphError> {
        self.state
            .lock()
            .map_err(|_| GraphError::other("memory store lock poisoned"))
    }

    /// Number of keys currently held (documents, sets and indices).
    pub fn key_count(&self) -> Result<usize, GraphError> {
        let state = self.lock()?;
        Ok(state.documents.len() + state.sets.len() + state.indices.len())
    }
}

impl MemoryState {
    fn is_member(&self, key: &str, member: &str) -> bool {
        self.sets.get(key).is_some_and(|set| set.contains(member))
    }

    fn check_guard(&self, guard: &Guard) -> Result<(), Value> {
        match guard {
            Guard::EntityExists(g) => {
                if !self.documents.contains_key(&g.key) {
                    return Err(json!({"error": "entity_not_found", "entity": g.entity, "entity_id": g.entity_id}));
                }
            }
            Guard::UniqueAvailable(g) => {
                if let Some(existing) = self.documents.get(&g.key) {
                    return Err(json!({
                        "error": "unique_constraint_violation",
                        "field": g.field,
                        "value": g.value,
                        "existing_entity_id": existing,
                    }));
                }
            }
            Guard::RequireMember(g) => {
                if !self.is_member(&g.relation_key, &g.member) {
                    return Err(json!({"error": "relation_missing", "entity": g.failure, "entity_id": g.entity_id}));
                }
            }
            Guard::RejectMember(g) => {
                if self.is_member(&g.relation_key, &g.member) {
                    return Err(json!({"error": "relation_conflict", "reason": g.failure}));
                }
            }
            Guard::OwnedBy(g) => {
                let Some(raw) = self.documents.get(&g.key) else {
                    return Err(json!({"error": "entity_not_found", "entity": g.entity, "entity_id": g.entity_id}));
                };
                let owner = serde_json::from_str::<Value>(raw)
                    .ok()
                    .and_then(|doc| doc.get(&g.field).and_then(Value::as_str).map(str::to_string));
                if owner.as_deref() != Some(g.owner_id.as_str()) {
                    return Err(json!({"error": "unauthorized", "actor_id": g.owner_id, "entity_id": g.entity_id}));
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, command: &MutationCommand) -> Value {
        match command {
            MutationCommand::PutEntity(write) => {
                self.documents.insert(write.key.clone(), write.payload_json.clone());
                json!({"entity_id": write.entity_id})
            }
            MutationCommand::ClaimUnique(claim) => {
                self.documents.insert(claim.key.clone(), claim.entity_id.clone());
                json!({"entity_id": claim.entity_id})
            }
            MutationCommand::MutateRelations(mutation) => {
                let set = self.sets.entry(mutation.relation_key.clone()).or_default();
                let added = mutation.add.iter().filter(|m| set.insert((*m).clone())).count();
                let removed = mutation.remove.iter().filter(|m| set.remove(*m)).count();
                if set.is_empty() {
                    self.sets.remove(&mutation.relation_key);
                }
                json!({"added": added, "removed": removed})
            }
            MutationCommand::ToggleMember(toggle) => {
                let set = self.sets.entry(toggle.relation_key.clone()).or_default();
                let member = if set.remove(&toggle.member) {
                    false
                } else {
                    set.insert(toggle.member.clone());
                    true
                };
                let count = set.len();
                if set.is_empty() {
                    self.sets.remove(&toggle.relation_key);
                }
                json!({"member": member, "count": count})
            }
            MutationCommand::IndexInsert(entry) => {
                self.indices
                    .entry(entry.index_key.clone())
                    .or_default()
                    .insert(entry.member.clone(), entry.score);
                json!({"member": entry.member})
            }
            MutationCommand::DeleteTree(tree) => {
                let deleted = self.delete_tree(tree);
                json!({"deleted": deleted})
            }
        }
    }

    fn remove_from_index(&mut self, key: &str, member: &str) {
        if let Some(index) = self.indices.get_mut(key) {
            index.remove(member);
            if index.is_empty() {
                self.indices.remove(key);
            }
        }
    }

    fn children(&self, key: &str) -> Vec<String> {
        let mut children: Vec<(i64, String)> = self
            .indices
            .get(key)
            .map(|index| index.iter().map(|(member, score)| (*score, member.clone())).collect())
            .unwrap_or_default();
        children.sort();
        children.into_iter().map(|(_, member)| member).collect()
    }

    fn delete_tree(&mut self, tree: &TreeDelete) -> Vec<String> {
        let mut queue = vec![tree.root_id.clone()];
        let mut seen: HashSet<String> = HashSet::from([tree.root_id.clone()]);
        let mut cursor = 0;
        while cursor < queue.len() {
            let key = format!("{}{}", tree.children_prefix, queue[cursor]);
            for child in self.children(&key) {
                if seen.insert(child.clone()) {
                    queue.push(child);
                }
            }
            cursor += 1;
        }

        // descendants always sit after their ancestors in the queue
        let mut deleted = Vec::with_capacity(queue.len());
        for id in queue.iter().rev() {
            let entity_key = format!("{}{}", tree.entity_prefix, id);
            if let Some(raw) = self.documents.remove(&entity_key) {
                if let Ok(doc) = serde_json::from_str::<Value>(&raw) {
                    if let Some(parent) = doc.get("parent").and_then(Value::as_str) {
                        self.remove_from_index(&format!("{}{}", tree.children_prefix, parent), id);
                    } else if let Some(author) = doc.get("author").and_then(Value::as_str) {
                        self.remove_from_index(&format!("{}{}", tree.top_level_prefix, author), id);
                    }
                }
                deleted.push(id.clone());
            }
            self.indices.remove(&format!("{}{}", tree.children_prefix, id));
            self.sets.remove(&format!("{}{}", tree.likes_prefix, id));
        }
        deleted
    }
}

impl GraphStore for MemoryStore {
    async fn get_document(&self, key: &str) -> Result<Option<String>, GraphError> {
        Ok(self.lock()?.documents.get(key).cloned())
    }

    async fn get_documents(&self, keys: &[String]) -> Result<Vec<Option<String>>, GraphError> {
        let state = self.lock()?;
        Ok(keys.iter().map(|key| state.documents.get(key).cloned()).collect())
    }

    async fn members(&self, relation_key: &str) -> Result<Vec<String>, GraphError> {
        Ok(self
            .lock()?
            .sets
            .get(relation_key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn is_member(&self, relation_key: &str, member: &str) -> Result<bool, GraphError> {
        Ok(self.lock()?.is_member(relation_key, member))
    }

    async fn cardinality(&self, relation_key: &str) -> Result<u64, GraphError> {
        Ok(self.lock()?.sets.get(relation_key).map_or(0, |set| set.len() as u64))
    }

    async fn index_newest_first(&self, index_key: &str) -> Result<Vec<String>, GraphError> {
        let mut members = self.lock()?.children(index_key);
        members.reverse();
        Ok(members)
    }

    async fn index_len(&self, index_key: &str) -> Result<u64, GraphError> {
        Ok(self.lock()?.indices.get(index_key).map_or(0, |index| index.len() as u64))
    }

    async fn execute(&self, plan: MutationPlan) -> Result<Vec<Value>, GraphError> {
        log::debug!(
            "executing plan in memory: {} guards, {} commands",
            plan.guards.len(),
            plan.commands.len()
        );
        let mut state = self.lock()?;
        for guard in &plan.guards {
            state.check_guard(guard).map_err(|failure| map_store_error(&failure))?;
        }
        Ok(plan.commands.iter().map(|command| state.apply(command)).collect())
    }
}
