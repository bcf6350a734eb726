//! Social graph engine: the friend-request state machine.
//!
//! Per pair the states are none, pending (one direction) and friends. Every
//! transition is one guarded plan, so both sides of an edge change together or
//! not at all.

use crate::{
    errors::{GraphError, GraphResult, ValidationError},
    identity::IdentityStore,
    keys::KeySpace,
    models::{FriendStatus, User},
    runtime::{
        GraphStore, Guard, MutationPlan,
        commands::{MemberGuard, RelationMutation},
    },
};

const FRIEND_REQUEST: &str = "friend_request";

#[derive(Clone)]
pub struct SocialGraph<S> {
    store: S,
    keys: KeySpace,
    identity: IdentityStore<S>,
}

impl<S> SocialGraph<S>
where
    S: GraphStore,
{
    pub fn new(store: S, keys: KeySpace, identity: IdentityStore<S>) -> Self {
        Self { store, keys, identity }
    }

    pub async fn friend_status(&self, viewer_id: &str, subject_id: &str) -> GraphResult<FriendStatus> {
        if self.store.is_member(&self.keys.friends(viewer_id), subject_id).await? {
            return Ok(FriendStatus::Friend);
        }
        let sent = self
            .store
            .is_member(&self.keys.sent_requests(viewer_id), subject_id)
            .await?;
        let received = self
            .store
            .is_member(&self.keys.recv_requests(viewer_id), subject_id)
            .await?;
        Ok(if sent || received {
            FriendStatus::Pending
        } else {
            FriendStatus::None
        })
    }

    /// Records a pending request from `requester_id` to `target_id`.
    ///
    /// Returns the pair's status afterwards. Sending again, sending while the
    /// target already asked, or sending to a friend changes nothing.
    pub async fn send_friend_request(&self, requester_id: &str, target_id: &str) -> GraphResult<FriendStatus> {
        if requester_id == target_id {
            return Err(ValidationError::single(
                "target",
                "validation.self_request",
                "You can't send a friend request to yourself.",
            )
            .into());
        }

        let mut plan = MutationPlan::new();
        self.require_users(&mut plan, requester_id, target_id)?;
        plan.guard(reject(self.keys.friends(requester_id), target_id, "already_friends"))
            .guard(reject(self.keys.sent_requests(requester_id), target_id, "already_pending"))
            .guard(reject(self.keys.recv_requests(requester_id), target_id, "already_pending"))
            .relate(RelationMutation::add(self.keys.sent_requests(requester_id), target_id))
            .relate(RelationMutation::add(self.keys.recv_requests(target_id), requester_id));

        match self.store.execute(plan).await {
            Ok(_) => {
                log::info!("friend request {requester_id} -> {target_id}");
                Ok(FriendStatus::Pending)
            }
            Err(GraphError::Conflict { reason }) => {
                log::debug!("friend request {requester_id} -> {target_id} ignored: {reason}");
                self.friend_status(requester_id, target_id).await
            }
            Err(err) => Err(err),
        }
    }

    /// Called by the target of a pending request. Both users end up in each
    /// other's friends set and the pending edge is gone in both directions.
    pub async fn accept_friend_request(&self, target_id: &str, requester_id: &str) -> GraphResult<()> {
        let mut plan = self.resolve_request_plan(target_id, requester_id)?;
        plan.relate(RelationMutation::add(self.keys.friends(target_id), requester_id))
            .relate(RelationMutation::add(self.keys.friends(requester_id), target_id));
        self.store.execute(plan).await?;
        log::info!("friend request {requester_id} -> {target_id} accepted");
        Ok(())
    }

    pub async fn decline_friend_request(&self, target_id: &str, requester_id: &str) -> GraphResult<()> {
        let plan = self.resolve_request_plan(target_id, requester_id)?;
        self.store.execute(plan).await?;
        log::info!("friend request {requester_id} -> {target_id} declined");
        Ok(())
    }

    pub async fn friends(&self, user_id: &str) -> GraphResult<Vec<User>> {
        self.related_users(&self.keys.friends(user_id)).await
    }

    /// Users who asked `user_id` to be friends.
    pub async fn incoming_requests(&self, user_id: &str) -> GraphResult<Vec<User>> {
        self.related_users(&self.keys.recv_requests(user_id)).await
    }

    /// Users `user_id` is waiting on.
    pub async fn outgoing_requests(&self, user_id: &str) -> GraphResult<Vec<User>> {
        self.related_users(&self.keys.sent_requests(user_id)).await
    }

    async fn related_users(&self, relation_key: &str) -> GraphResult<Vec<User>> {
        let ids = self.store.members(relation_key).await?;
        self.identity.find_many(&ids).await
    }

    fn require_users(&self, plan: &mut MutationPlan, first: &str, second: &str) -> GraphResult<()> {
        plan.require_entity(self.keys.user(first), "user", first)?
            .require_entity(self.keys.user(second), "user", second)?;
        Ok(())
    }

    /// Guards and removals shared by accept and decline.
    fn resolve_request_plan(&self, target_id: &str, requester_id: &str) -> GraphResult<MutationPlan> {
        let mut plan = MutationPlan::new();
        self.require_users(&mut plan, target_id, requester_id)?;
        plan.guard(Guard::RequireMember(MemberGuard {
            relation_key: self.keys.recv_requests(target_id),
            member: requester_id.to_string(),
            failure: FRIEND_REQUEST.to_string(),
            entity_id: Some(format!("{requester_id}->{target_id}")),
        }))
        .relate(RelationMutation::remove(self.keys.recv_requests(target_id), requester_id))
        .relate(RelationMutation::remove(self.keys.sent_requests(requester_id), target_id))
        // a crossed request in the other direction goes away too
        .relate(RelationMutation::remove(self.keys.sent_requests(target_id), requester_id))
        .relate(RelationMutation::remove(self.keys.recv_requests(requester_id), target_id));
        Ok(plan)
    }
}

fn reject(relation_key: String, member: &str, reason: &str) -> Guard {
    Guard::RejectMember(MemberGuard {
        relation_key,
        member: member.to_string(),
        failure: reason.to_string(),
        entity_id: None,
    })
}
