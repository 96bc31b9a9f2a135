//! Business (tenant) administration. Platform-only except the single-entity
//! getter, which a business actor may call on its own business.

use chrono::Utc;

use stockbook_auth::{Actor, ensure_access, ensure_platform};
use stockbook_core::{BusinessId, DomainError, DomainResult, Page, PageArgs};
use stockbook_infra::{AuditAction, ChangeSet, UnitOfWork};
use stockbook_tenants::Business;

use crate::dto::{CreateBusinessInput, UpdateBusinessInput};
use crate::Services;

impl<S: UnitOfWork> Services<S> {
    /// `createBusiness` mutation. The BID comes from the monotonic counter
    /// sequence — the only consumer of the sequence generator.
    pub fn create_business(
        &self,
        actor: &Actor,
        input: CreateBusinessInput,
    ) -> DomainResult<Business> {
        ensure_platform(actor)?;
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("business name cannot be empty"));
        }

        self.store.transact(|docs| {
            let bid = docs.next_sequence("business");
            let business = Business {
                id: BusinessId::new(),
                bid,
                name: input.name.clone(),
                address: input.address.clone(),
                phone: input.phone.clone(),
                kind: input.kind,
                created_at: Utc::now(),
            };
            docs.upsert_business(business.clone());
            docs.record_activity(
                actor.user_id,
                "Business",
                AuditAction::Create,
                format!("Business \"{}\" (BID: {bid}) created", business.name),
            );
            Ok(business)
        })
    }

    /// `updateBusiness` mutation (platform only, partial).
    pub fn update_business(
        &self,
        actor: &Actor,
        id: BusinessId,
        input: UpdateBusinessInput,
    ) -> DomainResult<Business> {
        ensure_platform(actor)?;

        self.store.transact(|docs| {
            let old = docs.business(&id)?.clone();
            let mut business = old.clone();

            if let Some(name) = &input.name {
                if name.trim().is_empty() {
                    return Err(DomainError::validation("business name cannot be empty"));
                }
                business.name = name.clone();
            }
            if let Some(address) = &input.address {
                business.address = Some(address.clone());
            }
            if let Some(phone) = &input.phone {
                business.phone = Some(phone.clone());
            }
            if let Some(kind) = input.kind {
                business.kind = kind;
            }

            let mut changes = ChangeSet::new();
            changes.push("name", &old.name, &business.name);
            changes.push(
                "address",
                old.address.clone().unwrap_or_default(),
                business.address.clone().unwrap_or_default(),
            );
            changes.push(
                "phone",
                old.phone.clone().unwrap_or_default(),
                business.phone.clone().unwrap_or_default(),
            );
            changes.push("type", old.kind, business.kind);

            docs.upsert_business(business.clone());

            let description = match changes.describe() {
                Some(d) => format!("Business \"{}\" (BID: {}) updated. {}", old.name, old.bid, d),
                None => format!("Business \"{}\" (BID: {}) updated", old.name, old.bid),
            };
            docs.record_activity(actor.user_id, "Business", AuditAction::Update, description);

            Ok(business)
        })
    }

    /// `deleteBusiness` mutation (platform only).
    pub fn delete_business(&self, actor: &Actor, id: BusinessId) -> DomainResult<()> {
        ensure_platform(actor)?;

        self.store.transact(|docs| {
            let removed = docs.remove_business(&id)?;
            docs.record_activity(
                actor.user_id,
                "Business",
                AuditAction::Delete,
                format!("Business \"{}\" (BID: {}) deleted", removed.name, removed.bid),
            );
            Ok(())
        })
    }

    /// `businesses` query (platform only).
    pub fn businesses(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<Business>> {
        ensure_platform(actor)?;
        self.store.read(|docs| Page::slice(docs.businesses(), page))
    }

    /// `business(id)` query.
    pub fn business(&self, actor: &Actor, id: BusinessId) -> DomainResult<Business> {
        self.store.read(|docs| {
            let business = docs.business(&id)?.clone();
            ensure_access(actor, business.id)?;
            Ok(business)
        })
    }

    /// `searchBusinesses` query (platform only, case-insensitive on name).
    pub fn search_businesses(
        &self,
        actor: &Actor,
        term: &str,
        page: PageArgs,
    ) -> DomainResult<Page<Business>> {
        ensure_platform(actor)?;
        let needle = term.to_lowercase();
        self.store.read(|docs| {
            let matches: Vec<Business> = docs
                .businesses()
                .into_iter()
                .filter(|b| b.name.to_lowercase().contains(&needle))
                .collect();
            Page::slice(matches, page)
        })
    }
}
