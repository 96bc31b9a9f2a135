//! Customer operations.

use chrono::Utc;

use stockbook_auth::{Actor, business_scope, ensure_access};
use stockbook_core::{CustomerId, DomainError, DomainResult, Page, PageArgs};
use stockbook_customers::Customer;
use stockbook_infra::{AuditAction, ChangeSet, UnitOfWork};

use crate::context::list_scope;
use crate::dto::{CreateCustomerInput, UpdateCustomerInput};
use crate::views::{self, CustomerView};
use crate::Services;

impl<S: UnitOfWork> Services<S> {
    /// `createCustomer` mutation.
    pub fn create_customer(
        &self,
        actor: &Actor,
        input: CreateCustomerInput,
    ) -> DomainResult<CustomerView> {
        let business_id = business_scope(actor)?;
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if input.email.trim().is_empty() {
            return Err(DomainError::validation("customer email cannot be empty"));
        }

        let customer = Customer {
            id: CustomerId::new(),
            business_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            created_at: Utc::now(),
        };

        self.store.transact(|docs| {
            docs.business(&business_id)?;
            docs.upsert_customer(customer.clone())?;
            docs.record_activity(
                actor.user_id,
                "Customer",
                AuditAction::Create,
                format!(
                    "Customer \"{}\" (Email: {}) created",
                    customer.name, customer.email
                ),
            );
            views::customer_view(docs, &customer)
        })
    }

    /// `updateCustomer` mutation (partial).
    pub fn update_customer(
        &self,
        actor: &Actor,
        id: CustomerId,
        input: UpdateCustomerInput,
    ) -> DomainResult<CustomerView> {
        self.store.transact(|docs| {
            let old = docs.customer(&id)?.clone();
            ensure_access(actor, old.business_id)?;

            let mut customer = old.clone();
            if let Some(name) = &input.name {
                if name.trim().is_empty() {
                    return Err(DomainError::validation("customer name cannot be empty"));
                }
                customer.name = name.clone();
            }
            if let Some(email) = &input.email {
                if email.trim().is_empty() {
                    return Err(DomainError::validation("customer email cannot be empty"));
                }
                customer.email = email.clone();
            }
            if let Some(phone) = &input.phone {
                customer.phone = Some(phone.clone());
            }
            if let Some(address) = &input.address {
                customer.address = Some(address.clone());
            }

            let mut changes = ChangeSet::new();
            changes.push("name", &old.name, &customer.name);
            changes.push("email", &old.email, &customer.email);
            changes.push(
                "phone",
                old.phone.clone().unwrap_or_default(),
                customer.phone.clone().unwrap_or_default(),
            );
            changes.push(
                "address",
                old.address.clone().unwrap_or_default(),
                customer.address.clone().unwrap_or_default(),
            );

            docs.upsert_customer(customer.clone())?;

            let description = match changes.describe() {
                Some(d) => format!(
                    "Customer \"{}\" (Email: {}) updated. {}",
                    old.name, old.email, d
                ),
                None => format!("Customer \"{}\" (Email: {}) updated", old.name, old.email),
            };
            docs.record_activity(actor.user_id, "Customer", AuditAction::Update, description);

            views::customer_view(docs, &customer)
        })
    }

    /// `deleteCustomer` mutation.
    ///
    /// Restrict-delete: a customer still referenced by invoices cannot be
    /// removed.
    pub fn delete_customer(&self, actor: &Actor, id: CustomerId) -> DomainResult<()> {
        self.store.transact(|docs| {
            let customer = docs.customer(&id)?.clone();
            ensure_access(actor, customer.business_id)?;

            let referencing = docs.invoices_referencing_customer(&id);
            if referencing > 0 {
                return Err(DomainError::conflict(format!(
                    "customer \"{}\" is referenced by {referencing} invoice(s)",
                    customer.name
                )));
            }

            docs.remove_customer(&id)?;
            docs.record_activity(
                actor.user_id,
                "Customer",
                AuditAction::Delete,
                format!(
                    "Customer \"{}\" (Email: {}) deleted",
                    customer.name, customer.email
                ),
            );
            Ok(())
        })
    }

    /// `customers` query.
    pub fn customers(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<CustomerView>> {
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            Page::slice(docs.customers_scoped(scope), page)?
                .try_map(|c| views::customer_view(docs, &c))
        })
    }

    /// `customer(id)` query.
    pub fn customer(&self, actor: &Actor, id: CustomerId) -> DomainResult<CustomerView> {
        self.store.read(|docs| {
            let customer = docs.customer(&id)?;
            ensure_access(actor, customer.business_id)?;
            views::customer_view(docs, customer)
        })
    }
}
