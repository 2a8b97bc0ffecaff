use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::{
    config::AuthConfig,
    error::{AppError, Result},
};

/// Named capabilities checked before mutating actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    AnnouncementCreate,
    AnnouncementUpdate,
    AnnouncementDelete,
    TaxonomyManage,
    FeedbackCreate,
}

impl Permission {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnnouncementCreate => "announcement.create",
            Self::AnnouncementUpdate => "announcement.update",
            Self::AnnouncementDelete => "announcement.delete",
            Self::TaxonomyManage => "taxonomy.manage",
            Self::FeedbackCreate => "feedback.create",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "announcement.create" => Some(Self::AnnouncementCreate),
            "announcement.update" => Some(Self::AnnouncementUpdate),
            "announcement.delete" => Some(Self::AnnouncementDelete),
            "taxonomy.manage" => Some(Self::TaxonomyManage),
            "feedback.create" => Some(Self::FeedbackCreate),
            _ => None,
        }
    }

    fn all() -> [Self; 5] {
        [
            Self::AnnouncementCreate,
            Self::AnnouncementUpdate,
            Self::AnnouncementDelete,
            Self::TaxonomyManage,
            Self::FeedbackCreate,
        ]
    }
}

/// The caller identity resolved from a bearer token by the middleware.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    token: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>, token: impl Into<String>) -> Self {
        Self { subject: subject.into(), token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// The hosting platform's policy service, consumed behind a trait so the
/// handlers only ever see allow/deny.
#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn authorize(&self, identity: &Identity, permission: Permission) -> Result<Decision>;
}

/// Token-table implementation driven by configuration.
pub struct StaticPermissionService {
    grants: HashMap<String, HashSet<Permission>>,
}

impl StaticPermissionService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut grants = HashMap::new();
        for entry in &config.tokens {
            let mut permissions = HashSet::new();
            for name in &entry.permissions {
                if name == "*" {
                    permissions.extend(Permission::all());
                } else if let Some(permission) = Permission::parse(name) {
                    permissions.insert(permission);
                } else {
                    tracing::warn!(
                        "Ignoring unknown permission {:?} granted to {}",
                        name,
                        entry.subject
                    );
                }
            }
            grants.insert(entry.token.clone(), permissions);
        }
        Self { grants }
    }

    /// Resolve a bearer token to the subject configured for it.
    pub fn subject_for(config: &AuthConfig, token: &str) -> Option<String> {
        config
            .tokens
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| entry.subject.clone())
    }
}

#[async_trait]
impl PermissionService for StaticPermissionService {
    async fn authorize(&self, identity: &Identity, permission: Permission) -> Result<Decision> {
        let allowed = self
            .grants
            .get(identity.token())
            .map(|permissions| permissions.contains(&permission))
            .unwrap_or(false);
        Ok(if allowed { Decision::Allow } else { Decision::Deny })
    }
}

/// Enforce a permission for a handler: missing identity is 401, an explicit
/// deny is 403.
pub async fn require(
    service: &dyn PermissionService,
    identity: Option<&Identity>,
    permission: Permission,
) -> Result<()> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    match service.authorize(identity, permission).await? {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!("{} denied {}", identity.subject, permission.name());
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenGrant;

    fn config() -> AuthConfig {
        AuthConfig {
            tokens: vec![
                TokenGrant {
                    subject: "editor".to_string(),
                    token: "editor-token".to_string(),
                    permissions: vec!["announcement.create".to_string()],
                },
                TokenGrant {
                    subject: "admin".to_string(),
                    token: "admin-token".to_string(),
                    permissions: vec!["*".to_string()],
                },
            ],
        }
    }

    #[tokio::test]
    async fn wildcard_grants_everything() {
        let service = StaticPermissionService::new(&config());
        let admin = Identity::new("admin", "admin-token");
        for permission in Permission::all() {
            assert_eq!(service.authorize(&admin, permission).await.unwrap(), Decision::Allow);
        }
    }

    #[tokio::test]
    async fn ungranted_permission_is_denied() {
        let service = StaticPermissionService::new(&config());
        let editor = Identity::new("editor", "editor-token");
        assert_eq!(
            service.authorize(&editor, Permission::AnnouncementCreate).await.unwrap(),
            Decision::Allow
        );
        assert_eq!(
            service.authorize(&editor, Permission::AnnouncementDelete).await.unwrap(),
            Decision::Deny
        );
    }
}
