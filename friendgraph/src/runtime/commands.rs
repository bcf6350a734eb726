use serde::Serialize;

use crate::{
    errors::{GraphError, GraphResult},
    id::is_well_formed,
};

/// Precondition checked before any command of a plan runs.
///
/// Every guard of a plan is evaluated first; a failing guard aborts the whole
/// plan with no command applied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// The document at `key` must exist.
    EntityExists(EntityGuard),
    /// The unique index at `key` must be unclaimed.
    UniqueAvailable(UniqueGuard),
    /// `member` must be in the set at `relation_key`.
    RequireMember(MemberGuard),
    /// `member` must not be in the set at `relation_key`.
    RejectMember(MemberGuard),
    /// The document at `key` must exist and carry `owner_id` in `field`.
    OwnedBy(OwnershipGuard),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityGuard {
    pub key: String,
    pub entity: String,
    pub entity_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniqueGuard {
    pub key: String,
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberGuard {
    pub relation_key: String,
    pub member: String,
    /// Reported entity (or conflict reason) when the guard fails.
    pub failure: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnershipGuard {
    pub key: String,
    pub entity: String,
    pub entity_id: String,
    pub field: String,
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationCommand {
    /// Writes a JSON document, replacing any previous value.
    PutEntity(EntityWrite),
    /// Points a unique index key at the owning entity id.
    ClaimUnique(UniqueClaim),
    /// Adds and removes set members.
    MutateRelations(RelationMutation),
    /// Flips membership of one member; responds with `{member, count}`.
    ToggleMember(MemberToggle),
    /// Inserts into a sorted index.
    IndexInsert(IndexEntry),
    /// Deletes a post and its reply subtree; responds with `{deleted: [...]}`.
    DeleteTree(TreeDelete),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityWrite {
    pub key: String,
    pub entity_id: String,
    pub payload_json: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UniqueClaim {
    pub key: String,
    pub entity_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationMutation {
    pub relation_key: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl RelationMutation {
    pub fn add(relation_key: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            relation_key: relation_key.into(),
            add: vec![member.into()],
            remove: Vec::new(),
        }
    }

    pub fn remove(relation_key: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            relation_key: relation_key.into(),
            add: Vec::new(),
            remove: vec![member.into()],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberToggle {
    pub relation_key: String,
    pub member: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub index_key: String,
    pub member: String,
    /// Milliseconds since the epoch.
    pub score: i64,
}

/// Key prefixes for the cascade; per-post keys are `prefix + post_id`.
#[derive(Debug, Clone, Serialize)]
pub struct TreeDelete {
    pub root_id: String,
    pub entity_prefix: String,
    pub children_prefix: String,
    pub top_level_prefix: String,
    pub likes_prefix: String,
}

#[derive(Debug, Serialize, Default)]
pub struct MutationPlan {
    pub guards: Vec<Guard>,
    pub commands: Vec<MutationCommand>,
}

impl MutationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&mut self, guard: Guard) -> &mut Self {
        self.guards.push(guard);
        self
    }

    pub fn push(&mut self, command: MutationCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Guards that the `entity` document exists.
    ///
    /// An id that could not have been generated is reported as missing right
    /// away: its key might name some other record, such as a unique claim.
    pub fn require_entity(&mut self, key: String, entity: &'static str, entity_id: &str) -> GraphResult<&mut Self> {
        ensure_well_formed(entity, entity_id)?;
        Ok(self.guard(Guard::EntityExists(EntityGuard {
            key,
            entity: entity.to_string(),
            entity_id: entity_id.to_string(),
        })))
    }

    /// Guards that the document exists and names `owner_id` in `field`.
    pub fn require_owned(
        &mut self,
        key: String,
        entity: &'static str,
        entity_id: &str,
        field: &str,
        owner_id: &str,
    ) -> GraphResult<&mut Self> {
        ensure_well_formed(entity, entity_id)?;
        ensure_well_formed("user", owner_id)?;
        Ok(self.guard(Guard::OwnedBy(OwnershipGuard {
            key,
            entity: entity.to_string(),
            entity_id: entity_id.to_string(),
            field: field.to_string(),
            owner_id: owner_id.to_string(),
        })))
    }

    pub fn relate(&mut self, mutation: RelationMutation) -> &mut Self {
        self.push(MutationCommand::MutateRelations(mutation))
    }
}

fn ensure_well_formed(entity: &'static str, entity_id: &str) -> GraphResult<()> {
    if is_well_formed(entity_id) {
        Ok(())
    } else {
        Err(GraphError::not_found(entity, entity_id))
    }
}

pub fn build_entity_write<T>(key: String, entity_id: &str, entity: &T) -> Result<EntityWrite, serde_json::Error>
where
    T: Serialize,
{
    Ok(EntityWrite {
        key,
        entity_id: entity_id.to_string(),
        payload_json: serde_json::to_string(entity)?,
    })
}
