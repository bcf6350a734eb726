//! Profile pages: status text, pictures and the owner's top-level posts.

use crate::{
    content::ContentGraph,
    errors::{GraphError, GraphResult},
    id::is_well_formed,
    identity::IdentityStore,
    keys::KeySpace,
    media::ImageStore,
    models::{Post, Profile, User},
    runtime::{
        GraphStore, MutationCommand, MutationPlan,
        commands::build_entity_write,
        decode_document, encode_error,
    },
};

/// Everything a profile page shows.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: Profile,
    pub user: User,
    pub posts: Vec<Post>,
}

#[derive(Clone)]
pub struct Profiles<S, M> {
    store: S,
    keys: KeySpace,
    identity: IdentityStore<S>,
    content: ContentGraph<S>,
    images: M,
}

impl<S, M> Profiles<S, M>
where
    S: GraphStore,
    M: ImageStore,
{
    pub fn new(store: S, keys: KeySpace, identity: IdentityStore<S>, content: ContentGraph<S>, images: M) -> Self {
        Self {
            store,
            keys,
            identity,
            content,
            images,
        }
    }

    pub async fn find_profile(&self, owner_id: &str) -> GraphResult<Option<Profile>> {
        if !is_well_formed(owner_id) {
            return Ok(None);
        }
        let Some(profile_id) = self
            .store
            .get_document(&self.keys.profile_owner_index(owner_id))
            .await?
        else {
            return Ok(None);
        };
        match self.store.get_document(&self.keys.profile(&profile_id)).await? {
            Some(raw) => Ok(Some(decode_document(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn profile(&self, owner_id: &str) -> GraphResult<ProfileView> {
        let user = self.identity.get_user(owner_id).await?;
        let profile = self
            .find_profile(owner_id)
            .await?
            .ok_or_else(|| GraphError::not_found("profile", owner_id))?;
        let posts = self.content.list_top_level_posts(owner_id).await?;
        Ok(ProfileView { profile, user, posts })
    }

    /// Only the owner may change their status.
    pub async fn update_status(&self, actor_id: &str, owner_id: &str, status: &str) -> GraphResult<Profile> {
        if actor_id != owner_id {
            return Err(GraphError::Unauthorized {
                actor_id: actor_id.to_string(),
                entity_id: owner_id.to_string(),
            });
        }
        let mut profile = self
            .find_profile(owner_id)
            .await?
            .ok_or_else(|| GraphError::not_found("profile", owner_id))?;
        profile.status = status.trim().to_string();

        let key = self.keys.profile(&profile.id);
        let mut plan = MutationPlan::new();
        plan.require_owned(key.clone(), "profile", &profile.id, "owner", actor_id)?
            .push(MutationCommand::PutEntity(
                build_entity_write(key, &profile.id, &profile).map_err(encode_error)?,
            ));
        self.store.execute(plan).await?;
        log::info!("user {actor_id} updated status");
        Ok(profile)
    }

    /// Uploads a new picture for `actor_id` and records its URL on the user.
    pub async fn set_picture(&self, actor_id: &str, bytes: &[u8], extension: &str) -> GraphResult<User> {
        self.identity.get_user(actor_id).await?;
        let url = self.images.upload_image(bytes, actor_id, extension).await?;
        self.identity.set_picture(actor_id, Some(url)).await
    }

    pub async fn clear_picture(&self, actor_id: &str) -> GraphResult<User> {
        self.identity.get_user(actor_id).await?;
        self.images.delete_image(actor_id).await?;
        self.identity.set_picture(actor_id, None).await
    }
}
