//! Operation inputs (the mutation argument sets of the schema).
//!
//! Ids and enums arrive already typed; parsing wire strings is the
//! binding's job (`FromStr` is provided on every id and enum).

use serde::{Deserialize, Serialize};

use stockbook_auth::Role;
use stockbook_core::{BusinessId, CustomerId, ProductId};
use stockbook_invoicing::InvoiceStatus;
use stockbook_tenants::BusinessKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
    pub business_id: Option<BusinessId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub business_id: Option<BusinessId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kind: BusinessKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBusinessInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub kind: Option<BusinessKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub brand: String,
    pub sku: String,
    pub quantity: i64,
    /// Unit price in smallest currency unit.
    pub price: u64,
    /// Defaults to [`stockbook_products::DEFAULT_LOW_STOCK_AMOUNT`].
    pub low_stock_amount: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<u64>,
    pub low_stock_amount: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// One requested invoice line. The price is caller-supplied and fixed at
/// invoicing time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InvoiceItemInput {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: u64,
}

/// Partial invoice update: only supplied fields change; `items` replaces
/// the whole list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInvoiceInput {
    pub customer_id: Option<CustomerId>,
    pub items: Option<Vec<InvoiceItemInput>>,
    pub status: Option<InvoiceStatus>,
}
