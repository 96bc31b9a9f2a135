//! Account operations: `register`, `login`, `me`, `updateUser`,
//! `deleteUser`.

use chrono::Utc;

use stockbook_auth::{Actor, Role, User, ensure_platform};
use stockbook_core::{DomainError, DomainResult, UserId};
use stockbook_infra::{AuditAction, ChangeSet, UnitOfWork};

use crate::dto::{LoginInput, RegisterInput, UpdateUserInput};
use crate::views::{self, AuthPayload, UserView};
use crate::Services;

impl<S: UnitOfWork> Services<S> {
    /// `register` mutation.
    ///
    /// Open when unauthenticated (bootstrap); an authenticated caller must
    /// be platform to create further accounts. A `business_id` is ignored
    /// for platform accounts, which are never attached to a business.
    pub fn register(
        &self,
        caller: Option<&Actor>,
        input: RegisterInput,
    ) -> DomainResult<AuthPayload> {
        if let Some(actor) = caller {
            if !actor.is_platform() {
                return Err(DomainError::Unauthorized);
            }
        }
        if input.username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if input.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }

        let role = input.role.unwrap_or(Role::User);
        let business_id = if role == Role::Platform {
            None
        } else {
            input.business_id
        };

        let user = User {
            id: UserId::new(),
            username: input.username,
            password_hash: self.passwords.hash(&input.password)?,
            role,
            business_id,
            created_at: Utc::now(),
        };

        let view = self.store.transact(|docs| {
            if let Some(id) = business_id {
                docs.business(&id)?;
            }
            docs.upsert_user(user.clone())?;
            docs.record_activity(
                user.id,
                "User",
                AuditAction::Create,
                format!("User \"{}\" created", user.username),
            );
            views::user_view(docs, &user)
        })?;

        Ok(AuthPayload {
            token: self.issue_token(&user)?,
            user: view,
        })
    }

    /// `login` mutation. Unknown usernames and wrong passwords are
    /// indistinguishable to the caller.
    pub fn login(&self, input: LoginInput) -> DomainResult<AuthPayload> {
        let user = self.store.read(|docs| {
            docs.user_by_username(&input.username)
                .cloned()
                .ok_or(DomainError::InvalidCredentials)
        })?;

        if !self.passwords.verify(&input.password, &user.password_hash) {
            return Err(DomainError::InvalidCredentials);
        }

        let view = self.store.transact(|docs| {
            docs.record_activity(
                user.id,
                "User",
                AuditAction::Login,
                format!("User \"{}\" logged in", user.username),
            );
            views::user_view(docs, &user)
        })?;

        Ok(AuthPayload {
            token: self.issue_token(&user)?,
            user: view,
        })
    }

    /// `me` query.
    pub fn me(&self, actor: &Actor) -> DomainResult<UserView> {
        self.store.read(|docs| {
            let user = docs.user(&actor.user_id)?;
            views::user_view(docs, user)
        })
    }

    /// `updateUser` mutation (platform only, partial).
    pub fn update_user(
        &self,
        actor: &Actor,
        id: UserId,
        input: UpdateUserInput,
    ) -> DomainResult<UserView> {
        ensure_platform(actor)?;

        let new_hash = match &input.password {
            Some(password) => Some(self.passwords.hash(password)?),
            None => None,
        };

        self.store.transact(|docs| {
            let old = docs.user(&id)?.clone();
            let mut user = old.clone();

            if let Some(username) = &input.username {
                if username.trim().is_empty() {
                    return Err(DomainError::validation("username cannot be empty"));
                }
                user.username = username.clone();
            }
            if let Some(hash) = &new_hash {
                user.password_hash = hash.clone();
            }
            if let Some(role) = input.role {
                user.role = role;
            }
            if let Some(business_id) = input.business_id {
                // Platform accounts stay unattached.
                if user.role != Role::Platform {
                    docs.business(&business_id)?;
                    user.business_id = Some(business_id);
                }
            }

            let mut changes = ChangeSet::new();
            changes.push("username", &old.username, &user.username);
            changes.push("role", old.role, user.role);
            changes.push(
                "business",
                old.business_id.map(|b| b.to_string()).unwrap_or_default(),
                user.business_id.map(|b| b.to_string()).unwrap_or_default(),
            );

            docs.upsert_user(user.clone())?;

            let description = match changes.describe() {
                Some(d) => format!("User \"{}\" updated. {}", old.username, d),
                None => format!("User \"{}\" updated", old.username),
            };
            docs.record_activity(actor.user_id, "User", AuditAction::Update, description);

            views::user_view(docs, &user)
        })
    }

    /// `deleteUser` mutation (platform only).
    pub fn delete_user(&self, actor: &Actor, id: UserId) -> DomainResult<()> {
        ensure_platform(actor)?;

        self.store.transact(|docs| {
            let removed = docs.remove_user(&id)?;
            docs.record_activity(
                actor.user_id,
                "User",
                AuditAction::Delete,
                format!("User \"{}\" deleted", removed.username),
            );
            Ok(())
        })
    }
}
