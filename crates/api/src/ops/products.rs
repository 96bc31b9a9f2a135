//! Product catalog operations.

use chrono::Utc;

use stockbook_auth::{Actor, business_scope, ensure_access};
use stockbook_core::{BusinessId, DomainError, DomainResult, Page, PageArgs, ProductId};
use stockbook_infra::{AuditAction, ChangeSet, UnitOfWork};
use stockbook_products::{DEFAULT_LOW_STOCK_AMOUNT, Product};

use crate::context::list_scope;
use crate::dto::{CreateProductInput, UpdateProductInput};
use crate::views::{self, ProductView};
use crate::{Services, stock};

impl<S: UnitOfWork> Services<S> {
    /// `createProduct` mutation.
    pub fn create_product(
        &self,
        actor: &Actor,
        input: CreateProductInput,
    ) -> DomainResult<ProductView> {
        let business_id = business_scope(actor)?;
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if input.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if input.quantity < 0 {
            return Err(DomainError::validation(
                "initial quantity must not be negative",
            ));
        }

        let mut product = Product {
            id: ProductId::new(),
            business_id,
            name: input.name,
            brand: input.brand,
            sku: input.sku,
            quantity: input.quantity,
            price: input.price,
            low_stock_amount: input.low_stock_amount.unwrap_or(DEFAULT_LOW_STOCK_AMOUNT),
            low_stock_alert: false,
            created_at: Utc::now(),
        };
        product.recompute_low_stock();

        self.store.transact(|docs| {
            docs.business(&business_id)?;
            docs.upsert_product(product.clone())?;
            docs.record_activity(
                actor.user_id,
                "Product",
                AuditAction::Create,
                format!("Product \"{}\" (SKU: {}) created", product.name, product.sku),
            );
            views::product_view(docs, &product)
        })
    }

    /// `updateProduct` mutation (partial).
    ///
    /// A supplied `quantity` is translated into a delta and routed through
    /// the stock ledger; a threshold change alone also passes through it
    /// (delta 0) so the low-stock alert is recomputed and audited.
    pub fn update_product(
        &self,
        actor: &Actor,
        id: ProductId,
        input: UpdateProductInput,
    ) -> DomainResult<ProductView> {
        self.store.transact(|docs| {
            let old = docs.product(&id)?.clone();
            ensure_access(actor, old.business_id)?;

            let mut product = old.clone();
            if let Some(name) = &input.name {
                if name.trim().is_empty() {
                    return Err(DomainError::validation("product name cannot be empty"));
                }
                product.name = name.clone();
            }
            if let Some(brand) = &input.brand {
                product.brand = brand.clone();
            }
            if let Some(sku) = &input.sku {
                if sku.trim().is_empty() {
                    return Err(DomainError::validation("SKU cannot be empty"));
                }
                product.sku = sku.clone();
            }
            if let Some(price) = input.price {
                product.price = price;
            }
            if let Some(low_stock_amount) = input.low_stock_amount {
                product.low_stock_amount = low_stock_amount;
            }
            if let Some(quantity) = input.quantity {
                if quantity < 0 {
                    return Err(DomainError::validation("quantity must not be negative"));
                }
            }

            let mut changes = ChangeSet::new();
            changes.push("name", &old.name, &product.name);
            changes.push("brand", &old.brand, &product.brand);
            changes.push("sku", &old.sku, &product.sku);
            if let Some(quantity) = input.quantity {
                changes.push("quantity", old.quantity, quantity);
            }
            changes.push("price", old.price, product.price);
            changes.push("lowStockAmount", old.low_stock_amount, product.low_stock_amount);

            docs.upsert_product(product)?;

            let delta = input.quantity.map_or(0, |q| q - old.quantity);
            let product = stock::adjust_stock(docs, actor, &id, delta, "Product update")?;

            let description = match changes.describe() {
                Some(d) => format!(
                    "Product \"{}\" (SKU: {}) updated. {}",
                    old.name, old.sku, d
                ),
                None => format!("Product \"{}\" (SKU: {}) updated", old.name, old.sku),
            };
            docs.record_activity(actor.user_id, "Product", AuditAction::Update, description);

            views::product_view(docs, &product)
        })
    }

    /// `deleteProduct` mutation.
    ///
    /// Restrict-delete: a product still referenced by invoice lines cannot
    /// be removed (the references would dangle).
    pub fn delete_product(&self, actor: &Actor, id: ProductId) -> DomainResult<()> {
        self.store.transact(|docs| {
            let product = docs.product(&id)?.clone();
            ensure_access(actor, product.business_id)?;

            let referencing = docs.invoices_referencing_product(&id);
            if referencing > 0 {
                return Err(DomainError::conflict(format!(
                    "product \"{}\" is referenced by {referencing} invoice(s)",
                    product.name
                )));
            }

            docs.remove_product(&id)?;
            docs.record_activity(
                actor.user_id,
                "Product",
                AuditAction::Delete,
                format!("Product \"{}\" (SKU: {}) deleted", product.name, product.sku),
            );
            Ok(())
        })
    }

    /// `products` query.
    pub fn products(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<ProductView>> {
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            Page::slice(docs.products_scoped(scope), page)?
                .try_map(|p| views::product_view(docs, &p))
        })
    }

    /// `product(id)` query.
    pub fn product(&self, actor: &Actor, id: ProductId) -> DomainResult<ProductView> {
        self.store.read(|docs| {
            let product = docs.product(&id)?;
            ensure_access(actor, product.business_id)?;
            views::product_view(docs, product)
        })
    }

    /// `searchProducts` query: case-insensitive match on name, brand, or
    /// SKU. Platform callers may scope to one business; everyone else is
    /// pinned to their own.
    pub fn search_products(
        &self,
        actor: &Actor,
        term: &str,
        business_id: Option<BusinessId>,
        page: PageArgs,
    ) -> DomainResult<Page<ProductView>> {
        let scope = if actor.is_platform() {
            business_id
        } else {
            let own = list_scope(actor)?;
            if let Some(requested) = business_id {
                if own != Some(requested) {
                    return Err(DomainError::Unauthorized);
                }
            }
            own
        };

        let needle = term.to_lowercase();
        self.store.read(|docs| {
            let matches: Vec<Product> = docs
                .products_scoped(scope)
                .into_iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&needle)
                        || p.brand.to_lowercase().contains(&needle)
                        || p.sku.to_lowercase().contains(&needle)
                })
                .collect();
            Page::slice(matches, page)?.try_map(|p| views::product_view(docs, &p))
        })
    }

    /// `lowStockProducts` query: products whose derived alert is raised.
    pub fn low_stock_products(
        &self,
        actor: &Actor,
        page: PageArgs,
    ) -> DomainResult<Page<ProductView>> {
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            let low: Vec<Product> = docs
                .products_scoped(scope)
                .into_iter()
                .filter(|p| p.low_stock_alert)
                .collect();
            Page::slice(low, page)?.try_map(|p| views::product_view(docs, &p))
        })
    }
}
