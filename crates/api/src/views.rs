//! Reference-resolved operation outputs.
//!
//! The source schema expanded references implicitly (`populate`); here
//! resolution is explicit and total — a view either resolves every
//! reference or the operation fails with `NotFound`, never returning a
//! partially populated object. The one deliberate exception is
//! [`ActivityView::user`]: accounts are deletable while the audit feed is
//! append-only, so a missing author is represented as `None`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockbook_auth::{Role, User};
use stockbook_core::{DomainResult, UserId};
use stockbook_customers::Customer;
use stockbook_infra::{ActivityLog, Documents};
use stockbook_invoicing::Invoice;
use stockbook_products::Product;
use stockbook_sales::Sale;
use stockbook_tenants::Business;

/// A user without its credential hash, with its business resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub business: Option<Business>,
    pub created_at: DateTime<Utc>,
}

/// `register`/`login` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub business: Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerView {
    pub customer: Customer,
    pub business: Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceItemView {
    pub product: Product,
    pub quantity: i64,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub invoice: Invoice,
    pub customer: Customer,
    pub business: Business,
    pub items: Vec<InvoiceItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleView {
    pub sale: Sale,
    pub invoice: Invoice,
    pub customer: Customer,
    pub business: Business,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub entry: ActivityLog,
    /// `None` when the acting account has since been deleted.
    pub user: Option<UserView>,
}

pub(crate) fn user_view(docs: &Documents, user: &User) -> DomainResult<UserView> {
    let business = match user.business_id {
        Some(id) => Some(docs.business(&id)?.clone()),
        None => None,
    };
    Ok(UserView {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
        business,
        created_at: user.created_at,
    })
}

pub(crate) fn product_view(docs: &Documents, product: &Product) -> DomainResult<ProductView> {
    Ok(ProductView {
        product: product.clone(),
        business: docs.business(&product.business_id)?.clone(),
    })
}

pub(crate) fn customer_view(docs: &Documents, customer: &Customer) -> DomainResult<CustomerView> {
    Ok(CustomerView {
        customer: customer.clone(),
        business: docs.business(&customer.business_id)?.clone(),
    })
}

pub(crate) fn invoice_view(docs: &Documents, invoice: &Invoice) -> DomainResult<InvoiceView> {
    let customer = docs.customer(&invoice.customer_id)?.clone();
    let business = docs.business(&invoice.business_id)?.clone();
    let items = invoice
        .items
        .iter()
        .map(|item| {
            Ok(InvoiceItemView {
                product: docs.product(&item.product_id)?.clone(),
                quantity: item.quantity,
                price: item.price,
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Ok(InvoiceView {
        invoice: invoice.clone(),
        customer,
        business,
        items,
    })
}

pub(crate) fn sale_view(docs: &Documents, sale: &Sale) -> DomainResult<SaleView> {
    Ok(SaleView {
        sale: sale.clone(),
        invoice: docs.invoice(&sale.invoice_id)?.clone(),
        customer: docs.customer(&sale.customer_id)?.clone(),
        business: docs.business(&sale.business_id)?.clone(),
    })
}

pub(crate) fn activity_view(docs: &Documents, entry: &ActivityLog) -> DomainResult<ActivityView> {
    let user = match docs.user(&entry.user_id) {
        Ok(user) => Some(user_view(docs, user)?),
        Err(_) => None,
    };
    Ok(ActivityView {
        entry: entry.clone(),
        user,
    })
}
