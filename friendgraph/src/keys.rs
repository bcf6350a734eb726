/// Common key-construction helpers used across friendgraph.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, self.service, collection, entity_id)
    }

    pub fn relation(&self, alias: &str, left_id: &str) -> String {
        format!("{}:{}:rel:{}:{}", self.prefix, self.service, alias, left_id)
    }

    /// Key for reverse relation lookup - the sorted index of children of a given
    /// collection that point at a specific parent entity.
    /// Format: prefix:service:child_collection:rev_rel:alias:parent_id
    pub fn reverse_relation(&self, child_collection: &str, alias: &str, parent_id: &str) -> String {
        format!(
            "{}:{}:{}:rev_rel:{}:{}",
            self.prefix, self.service, child_collection, alias, parent_id
        )
    }

    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!(
            "{}:{}:{}:unique:{}:{}",
            self.prefix, self.service, collection, field, value
        )
    }
}

pub const USERS: &str = "users";
pub const PROFILES: &str = "profiles";
pub const POSTS: &str = "posts";

pub const FRIENDS: &str = "friends";
pub const SENT_REQUESTS: &str = "sent_requests";
pub const RECV_REQUESTS: &str = "recv_requests";
pub const LIKED_BY: &str = "liked_by";

pub const PARENT: &str = "parent";
pub const AUTHOR_TOP: &str = "author_top";

/// Owned prefix/service pair the engines build their keys from.
#[derive(Debug, Clone)]
pub struct KeySpace {
    prefix: String,
    service: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            service: service.into(),
        }
    }

    pub fn context(&self) -> KeyContext<'_> {
        KeyContext::new(&self.prefix, &self.service)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn user(&self, user_id: &str) -> String {
        self.context().entity(USERS, user_id)
    }

    pub fn profile(&self, profile_id: &str) -> String {
        self.context().entity(PROFILES, profile_id)
    }

    pub fn post(&self, post_id: &str) -> String {
        self.context().entity(POSTS, post_id)
    }

    /// Emails are matched case-insensitively, so the index key uses the
    /// normalised form.
    pub fn email_index(&self, email: &str) -> String {
        self.context().unique(USERS, "email", &normalize_email(email))
    }

    pub fn profile_owner_index(&self, owner_id: &str) -> String {
        self.context().unique(PROFILES, "owner", owner_id)
    }

    pub fn friends(&self, user_id: &str) -> String {
        self.context().relation(FRIENDS, user_id)
    }

    pub fn sent_requests(&self, user_id: &str) -> String {
        self.context().relation(SENT_REQUESTS, user_id)
    }

    pub fn recv_requests(&self, user_id: &str) -> String {
        self.context().relation(RECV_REQUESTS, user_id)
    }

    pub fn liked_by(&self, post_id: &str) -> String {
        self.context().relation(LIKED_BY, post_id)
    }

    pub fn replies(&self, post_id: &str) -> String {
        self.context().reverse_relation(POSTS, PARENT, post_id)
    }

    pub fn top_level_posts(&self, author_id: &str) -> String {
        self.context().reverse_relation(POSTS, AUTHOR_TOP, author_id)
    }

    /// Prefixes handed to the cascade-delete command, which derives per-post keys
    /// by appending the post id.
    pub fn post_prefix(&self) -> String {
        self.post("")
    }

    pub fn replies_prefix(&self) -> String {
        self.replies("")
    }

    pub fn top_level_prefix(&self) -> String {
        self.top_level_posts("")
    }

    pub fn liked_by_prefix(&self) -> String {
        self.liked_by("")
    }

    /// Pattern matching every key in this namespace (test cleanup).
    pub fn namespace_pattern(&self) -> String {
        format!("{}:{}:*", self.prefix, self.service)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
