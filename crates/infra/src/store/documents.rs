use std::collections::HashMap;

use chrono::Utc;

use stockbook_auth::User;
use stockbook_core::{
    ActivityId, BusinessId, CustomerId, DomainError, DomainResult, InvoiceId, ProductId, SaleId,
    UserId,
};
use stockbook_customers::Customer;
use stockbook_invoicing::Invoice;
use stockbook_products::Product;
use stockbook_sales::Sale;
use stockbook_tenants::Business;

use crate::audit::{ActivityLog, AuditAction};

/// Every collection of the document store, plus the counter table and the
/// append-only activity feed.
///
/// One value of this type is one consistent snapshot; [`super::UnitOfWork`]
/// implementations hand it to operation closures. Unique-key constraints
/// (username, SKU per business, email per business) are enforced by the
/// `upsert_*` methods here, mirroring the store's unique indexes.
#[derive(Debug, Clone, Default)]
pub struct Documents {
    businesses: HashMap<BusinessId, Business>,
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    customers: HashMap<CustomerId, Customer>,
    invoices: HashMap<InvoiceId, Invoice>,
    sales: HashMap<SaleId, Sale>,
    counters: HashMap<String, u64>,
    activity: Vec<ActivityLog>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    // ── businesses ──────────────────────────────────────────────────────

    pub fn upsert_business(&mut self, business: Business) {
        self.businesses.insert(business.id, business);
    }

    pub fn business(&self, id: &BusinessId) -> DomainResult<&Business> {
        self.businesses
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("business {id}")))
    }

    pub fn remove_business(&mut self, id: &BusinessId) -> DomainResult<Business> {
        self.businesses
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("business {id}")))
    }

    /// All businesses, ordered by BID.
    pub fn businesses(&self) -> Vec<Business> {
        let mut all: Vec<Business> = self.businesses.values().cloned().collect();
        all.sort_by_key(|b| b.bid);
        all
    }

    // ── users ───────────────────────────────────────────────────────────

    /// Insert or replace a user, enforcing global username uniqueness.
    pub fn upsert_user(&mut self, user: User) -> DomainResult<()> {
        let taken = self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username);
        if taken {
            return Err(DomainError::duplicate_key(format!(
                "username \"{}\" is taken",
                user.username
            )));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn user(&self, id: &UserId) -> DomainResult<&User> {
        self.users
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))
    }

    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn remove_user(&mut self, id: &UserId) -> DomainResult<User> {
        self.users
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))
    }

    // ── products ────────────────────────────────────────────────────────

    /// Insert or replace a product, enforcing SKU uniqueness per business.
    pub fn upsert_product(&mut self, product: Product) -> DomainResult<()> {
        let taken = self.products.values().any(|p| {
            p.id != product.id && p.business_id == product.business_id && p.sku == product.sku
        });
        if taken {
            return Err(DomainError::duplicate_key(format!(
                "SKU \"{}\" already exists in this business",
                product.sku
            )));
        }
        self.products.insert(product.id, product);
        Ok(())
    }

    pub fn product(&self, id: &ProductId) -> DomainResult<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn remove_product(&mut self, id: &ProductId) -> DomainResult<Product> {
        self.products
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    /// Products visible in `scope` (`None` = every business), in stable
    /// creation order.
    pub fn products_scoped(&self, scope: Option<BusinessId>) -> Vec<Product> {
        let mut all: Vec<Product> = self
            .products
            .values()
            .filter(|p| scope.is_none_or(|b| p.business_id == b))
            .cloned()
            .collect();
        all.sort_by(|a, b| (a.created_at, a.id.as_uuid()).cmp(&(b.created_at, b.id.as_uuid())));
        all
    }

    // ── customers ───────────────────────────────────────────────────────

    /// Insert or replace a customer, enforcing email uniqueness per
    /// business.
    pub fn upsert_customer(&mut self, customer: Customer) -> DomainResult<()> {
        let taken = self.customers.values().any(|c| {
            c.id != customer.id
                && c.business_id == customer.business_id
                && c.email == customer.email
        });
        if taken {
            return Err(DomainError::duplicate_key(format!(
                "email \"{}\" already exists in this business",
                customer.email
            )));
        }
        self.customers.insert(customer.id, customer);
        Ok(())
    }

    pub fn customer(&self, id: &CustomerId) -> DomainResult<&Customer> {
        self.customers
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))
    }

    pub fn remove_customer(&mut self, id: &CustomerId) -> DomainResult<Customer> {
        self.customers
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("customer {id}")))
    }

    pub fn customers_scoped(&self, scope: Option<BusinessId>) -> Vec<Customer> {
        let mut all: Vec<Customer> = self
            .customers
            .values()
            .filter(|c| scope.is_none_or(|b| c.business_id == b))
            .cloned()
            .collect();
        all.sort_by(|a, b| (a.created_at, a.id.as_uuid()).cmp(&(b.created_at, b.id.as_uuid())));
        all
    }

    // ── invoices ────────────────────────────────────────────────────────

    pub fn upsert_invoice(&mut self, invoice: Invoice) {
        self.invoices.insert(invoice.id, invoice);
    }

    pub fn invoice(&self, id: &InvoiceId) -> DomainResult<&Invoice> {
        self.invoices
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    pub fn remove_invoice(&mut self, id: &InvoiceId) -> DomainResult<Invoice> {
        self.invoices
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("invoice {id}")))
    }

    pub fn invoices_scoped(&self, scope: Option<BusinessId>) -> Vec<Invoice> {
        let mut all: Vec<Invoice> = self
            .invoices
            .values()
            .filter(|i| scope.is_none_or(|b| i.business_id == b))
            .cloned()
            .collect();
        all.sort_by(|a, b| (a.created_at, a.id.as_uuid()).cmp(&(b.created_at, b.id.as_uuid())));
        all
    }

    /// How many invoices still carry a line for `product` (restrict-delete
    /// support).
    pub fn invoices_referencing_product(&self, product: &ProductId) -> usize {
        self.invoices
            .values()
            .filter(|i| i.items.iter().any(|item| item.product_id == *product))
            .count()
    }

    /// How many invoices still reference `customer`.
    pub fn invoices_referencing_customer(&self, customer: &CustomerId) -> usize {
        self.invoices
            .values()
            .filter(|i| i.customer_id == *customer)
            .count()
    }

    // ── sales ───────────────────────────────────────────────────────────

    pub fn upsert_sale(&mut self, sale: Sale) {
        self.sales.insert(sale.id, sale);
    }

    pub fn sale(&self, id: &SaleId) -> DomainResult<&Sale> {
        self.sales
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("sale {id}")))
    }

    pub fn remove_sale(&mut self, id: &SaleId) -> DomainResult<Sale> {
        self.sales
            .remove(id)
            .ok_or_else(|| DomainError::not_found(format!("sale {id}")))
    }

    /// The sale mirroring `invoice`, if present.
    pub fn sale_by_invoice(&self, invoice: &InvoiceId) -> Option<&Sale> {
        self.sales.values().find(|s| s.invoice_id == *invoice)
    }

    pub fn sales_scoped(&self, scope: Option<BusinessId>) -> Vec<Sale> {
        let mut all: Vec<Sale> = self
            .sales
            .values()
            .filter(|s| scope.is_none_or(|b| s.business_id == b))
            .cloned()
            .collect();
        all.sort_by(|a, b| (a.created_at, a.id.as_uuid()).cmp(&(b.created_at, b.id.as_uuid())));
        all
    }

    // ── counters ────────────────────────────────────────────────────────

    /// Issue the next value of a named monotonic sequence (business BIDs).
    /// Increment-and-read is atomic within the surrounding transaction.
    pub fn next_sequence(&mut self, name: &str) -> u64 {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    // ── activity feed ───────────────────────────────────────────────────

    /// Append one audit entry, stamped now.
    pub fn record_activity(
        &mut self,
        user_id: UserId,
        entity: &str,
        action: AuditAction,
        description: impl Into<String>,
    ) {
        self.activity.push(ActivityLog {
            id: ActivityId::new(),
            user_id,
            entity: entity.to_string(),
            action,
            description: description.into(),
            when: Utc::now(),
        });
    }

    /// The activity feed in append order, optionally restricted to one
    /// user's entries.
    pub fn activity_scoped(&self, scope: Option<UserId>) -> Vec<ActivityLog> {
        self.activity
            .iter()
            .filter(|a| scope.is_none_or(|u| a.user_id == u))
            .cloned()
            .collect()
    }
}
