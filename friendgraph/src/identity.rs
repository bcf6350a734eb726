//! Identity store: user records, registration and credential checks.

use std::sync::Arc;

use crate::{
    config::RuleSettings,
    errors::{GraphError, GraphResult, ValidationError, ValidationIssue},
    hashing::PasswordHasher,
    id::{generate_entity_id, is_well_formed},
    keys::{KeySpace, normalize_email},
    models::{Profile, User},
    runtime::{
        GraphStore, Guard, MutationCommand, MutationPlan,
        commands::{UniqueClaim, UniqueGuard, build_entity_write},
        decode_document, encode_error,
    },
    time::TimeProvider,
    validators::{check_email, check_min_length, check_password},
};

/// Form input for a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone)]
pub struct IdentityStore<S> {
    store: S,
    keys: KeySpace,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn TimeProvider>,
    rules: RuleSettings,
}

impl<S> IdentityStore<S>
where
    S: GraphStore,
{
    pub fn new(
        store: S,
        keys: KeySpace,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn TimeProvider>,
        rules: RuleSettings,
    ) -> Self {
        Self {
            store,
            keys,
            hasher,
            clock,
            rules,
        }
    }

    /// Loads a user together with its three relationship sets.
    pub async fn find_by_id(&self, user_id: &str) -> GraphResult<Option<User>> {
        if !is_well_formed(user_id) {
            return Ok(None);
        }
        let Some(raw) = self.store.get_document(&self.keys.user(user_id)).await? else {
            return Ok(None);
        };
        let mut user: User = decode_document(&raw)?;
        user.friends = self.store.members(&self.keys.friends(user_id)).await?.into_iter().collect();
        user.sent_friend_requests = self
            .store
            .members(&self.keys.sent_requests(user_id))
            .await?
            .into_iter()
            .collect();
        user.recv_friend_requests = self
            .store
            .members(&self.keys.recv_requests(user_id))
            .await?
            .into_iter()
            .collect();
        Ok(Some(user))
    }

    pub async fn get_user(&self, user_id: &str) -> GraphResult<User> {
        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| GraphError::not_found("user", user_id))
    }

    pub async fn find_by_email(&self, email: &str) -> GraphResult<Option<User>> {
        match self.store.get_document(&self.keys.email_index(email)).await? {
            Some(user_id) => self.find_by_id(&user_id).await,
            None => Ok(None),
        }
    }

    /// Loads user documents without their relationship sets, skipping ids that
    /// no longer resolve. Order follows `user_ids`.
    pub async fn find_many(&self, user_ids: &[String]) -> GraphResult<Vec<User>> {
        let keys: Vec<String> = user_ids
            .iter()
            .filter(|id| is_well_formed(id))
            .map(|id| self.keys.user(id))
            .collect();
        let docs = self.store.get_documents(&keys).await?;
        docs.into_iter()
            .flatten()
            .map(|raw| decode_document::<User>(&raw))
            .collect()
    }

    /// Writes the user, its profile and the email claim in one plan.
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> GraphResult<User> {
        let email = normalize_email(email);
        let user = User {
            id: generate_entity_id(),
            name: name.trim().to_string(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            join_date: self.clock.now(),
            picture: None,
            friends: Default::default(),
            sent_friend_requests: Default::default(),
            recv_friend_requests: Default::default(),
        };
        let profile = Profile {
            id: generate_entity_id(),
            owner: user.id.clone(),
            status: String::new(),
        };

        let email_key = self.keys.email_index(&email);
        let mut plan = MutationPlan::new();
        plan.guard(Guard::UniqueAvailable(UniqueGuard {
            key: email_key.clone(),
            field: "email".to_string(),
            value: email.clone(),
        }))
        .push(MutationCommand::ClaimUnique(UniqueClaim {
            key: email_key,
            entity_id: user.id.clone(),
        }))
        .push(MutationCommand::PutEntity(
            build_entity_write(self.keys.user(&user.id), &user.id, &user).map_err(encode_error)?,
        ))
        .push(MutationCommand::PutEntity(
            build_entity_write(self.keys.profile(&profile.id), &profile.id, &profile).map_err(encode_error)?,
        ))
        .push(MutationCommand::ClaimUnique(UniqueClaim {
            key: self.keys.profile_owner_index(&user.id),
            entity_id: profile.id.clone(),
        }));

        match self.store.execute(plan).await {
            Ok(_) => {
                log::info!("registered user {} with profile {}", user.id, profile.id);
                Ok(user)
            }
            Err(GraphError::UniqueConstraintViolation { field, .. }) if field == "email" => {
                Err(GraphError::DuplicateEmail { email })
            }
            Err(err) => Err(err),
        }
    }

    /// Validates a registration form, collecting every problem before failing,
    /// then hashes the password and creates the account.
    pub async fn register(&self, registration: &Registration) -> GraphResult<User> {
        let mut issues: Vec<ValidationIssue> = Vec::new();
        check_min_length("name", "Name", &registration.name, self.rules.min_name_length, &mut issues);
        check_email("email", &registration.email, &mut issues);
        check_password(
            &registration.password,
            &registration.confirm_password,
            self.rules.min_password_length,
            &mut issues,
        );
        if self.find_by_email(&registration.email).await?.is_some() {
            issues.push(ValidationIssue::new(
                "email",
                "validation.unique",
                "A user with that email address already exists.",
            ));
        }
        ValidationError::new(issues).into_result()?;

        let password_hash = self.hasher.hash(registration.password.trim())?;
        self.create(&registration.name, &registration.email, &password_hash)
            .await
    }

    pub async fn verify_credentials(&self, email: &str, password: &str) -> GraphResult<User> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| GraphError::not_found("user", normalize_email(email)))?;
        if self.hasher.verify(password.trim(), &user.password_hash)? {
            Ok(user)
        } else {
            log::debug!("credential mismatch for {}", user.id);
            Err(GraphError::InvalidCredentials)
        }
    }

    /// Stores the picture URL (or clears it) on the user document.
    pub(crate) async fn set_picture(&self, user_id: &str, picture: Option<String>) -> GraphResult<User> {
        let mut user = self.get_user(user_id).await?;
        user.picture = picture;
        let mut plan = MutationPlan::new();
        plan.require_entity(self.keys.user(user_id), "user", user_id)?
            .push(MutationCommand::PutEntity(
                build_entity_write(self.keys.user(user_id), user_id, &user).map_err(encode_error)?,
            ));
        self.store.execute(plan).await?;
        Ok(user)
    }
}
