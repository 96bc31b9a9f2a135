//! Invoice workflow: the stock-mutation core.
//!
//! Each mutation runs inside one store transaction, so customer/product
//! validation, ledger deltas, invoice/sale persistence, and audit entries
//! commit or roll back together — a failure partway through a multi-product
//! update leaves no partial deduction behind.

use chrono::Utc;

use stockbook_auth::{Actor, business_scope, ensure_access};
use stockbook_core::{
    CustomerId, DomainError, DomainResult, InvoiceId, Page, PageArgs, ProductId, SaleId,
};
use stockbook_infra::{AuditAction, ChangeSet, Documents, UnitOfWork};
use stockbook_invoicing::{
    Invoice, InvoiceItem, InvoiceStatus, aggregate_quantities, compute_total,
};
use stockbook_sales::Sale;

use crate::context::list_scope;
use crate::dto::{InvoiceItemInput, UpdateInvoiceInput};
use crate::views::{self, InvoiceView};
use crate::{Services, stock};

fn to_items(inputs: &[InvoiceItemInput]) -> Vec<InvoiceItem> {
    inputs
        .iter()
        .map(|i| InvoiceItem {
            product_id: i.product_id,
            quantity: i.quantity,
            price: i.price,
        })
        .collect()
}

/// Resolve a line's product and check it belongs to `business_id`.
fn owned_product_check(
    docs: &Documents,
    product_id: &ProductId,
    business_id: stockbook_core::BusinessId,
) -> DomainResult<()> {
    let product = docs
        .product(product_id)
        .map_err(|_| DomainError::invalid_reference("product does not belong to this business"))?;
    if product.business_id != business_id {
        return Err(DomainError::invalid_reference(
            "product does not belong to this business",
        ));
    }
    Ok(())
}

impl<S: UnitOfWork> Services<S> {
    /// `createInvoice` mutation.
    ///
    /// Two-pass: a pre-flight pass resolves and checks every line before
    /// any mutation, then the ledger deducts each line. The total is
    /// computed from the caller-supplied per-line prices, not re-read from
    /// the catalog.
    pub fn create_invoice(
        &self,
        actor: &Actor,
        customer_id: CustomerId,
        items: Vec<InvoiceItemInput>,
    ) -> DomainResult<InvoiceView> {
        let business_id = business_scope(actor)?;
        let items = to_items(&items);
        let total = compute_total(&items)?;

        self.store.transact(|docs| {
            let customer = docs.customer(&customer_id).map_err(|_| {
                DomainError::invalid_reference("customer does not belong to this business")
            })?;
            if customer.business_id != business_id {
                return Err(DomainError::invalid_reference(
                    "customer does not belong to this business",
                ));
            }
            let customer_name = customer.name.clone();

            // Pre-flight pass: no mutation happens until every line checks
            // out.
            for item in &items {
                owned_product_check(docs, &item.product_id, business_id)?;
                let product = docs.product(&item.product_id)?;
                if product.quantity < item.quantity {
                    return Err(DomainError::insufficient_stock(
                        product.name.clone(),
                        product.sku.clone(),
                    ));
                }
            }

            // Deduction pass through the ledger.
            for item in &items {
                stock::adjust_stock(
                    docs,
                    actor,
                    &item.product_id,
                    -item.quantity,
                    "Invoice creation",
                )?;
            }

            let invoice = Invoice {
                id: InvoiceId::new(),
                customer_id,
                business_id,
                items: items.clone(),
                total,
                status: InvoiceStatus::Pending,
                created_at: Utc::now(),
            };
            docs.upsert_invoice(invoice.clone());

            let sale = Sale {
                id: SaleId::new(),
                invoice_id: invoice.id,
                customer_id,
                business_id,
                total,
                created_at: invoice.created_at,
            };
            docs.upsert_sale(sale);

            docs.record_activity(
                actor.user_id,
                "Invoice",
                AuditAction::Create,
                format!("Invoice created for customer \"{customer_name}\" (Total: {total})"),
            );
            docs.record_activity(
                actor.user_id,
                "Sale",
                AuditAction::Create,
                format!("Sale created for customer \"{customer_name}\" (Total: {total})"),
            );

            views::invoice_view(docs, &invoice)
        })
    }

    /// `updateInvoice` mutation (partial; `items` replaces the whole
    /// list).
    ///
    /// Stock deltas are computed per product over the aggregated old and
    /// new item lists: a product still present moves by `old − new`
    /// (positive = net restock), a product dropped from the list is
    /// restocked in full.
    pub fn update_invoice(
        &self,
        actor: &Actor,
        id: InvoiceId,
        input: UpdateInvoiceInput,
    ) -> DomainResult<InvoiceView> {
        self.store.transact(|docs| {
            let old = docs.invoice(&id)?.clone();
            ensure_access(actor, old.business_id)?;

            let mut invoice = old.clone();
            let mut changes = ChangeSet::new();

            if let Some(customer_id) = input.customer_id {
                let customer = docs.customer(&customer_id).map_err(|_| {
                    DomainError::invalid_reference("customer does not belong to this business")
                })?;
                if customer.business_id != old.business_id {
                    return Err(DomainError::invalid_reference(
                        "customer does not belong to this business",
                    ));
                }
                invoice.customer_id = customer_id;
                changes.push("customer", old.customer_id, customer_id);
            }

            if let Some(item_inputs) = &input.items {
                let new_items = to_items(item_inputs);
                let new_total = compute_total(&new_items)?;

                // Ownership validation for every new line (no stock check
                // yet; the ledger enforces it per aggregated delta).
                for item in &new_items {
                    owned_product_check(docs, &item.product_id, old.business_id)?;
                }

                let new_agg = aggregate_quantities(&new_items);
                let old_agg = aggregate_quantities(&old.items);

                // Stable ordering keeps the audit trail deterministic.
                let mut touched: Vec<(ProductId, i64)> = new_agg
                    .iter()
                    .map(|(product_id, new_qty)| {
                        let old_qty = old_agg.get(product_id).copied().unwrap_or(0);
                        (*product_id, old_qty - new_qty)
                    })
                    .collect();
                touched.sort_by_key(|(product_id, _)| *product_id.as_uuid());

                for (product_id, delta) in touched {
                    stock::adjust_stock(docs, actor, &product_id, delta, "Invoice update")?;
                }

                let mut removed: Vec<(ProductId, i64)> = old_agg
                    .iter()
                    .filter(|(product_id, _)| !new_agg.contains_key(*product_id))
                    .map(|(product_id, old_qty)| (*product_id, *old_qty))
                    .collect();
                removed.sort_by_key(|(product_id, _)| *product_id.as_uuid());

                for (product_id, old_qty) in removed {
                    stock::adjust_stock(
                        docs,
                        actor,
                        &product_id,
                        old_qty,
                        "Invoice update (product removed)",
                    )?;
                }

                invoice.items = new_items;
                invoice.total = new_total;
                changes.push("total", old.total, new_total);
            }

            if let Some(status) = input.status {
                invoice.status = status;
                changes.push("status", old.status, status);
            }

            docs.upsert_invoice(invoice.clone());

            let description = match changes.describe() {
                Some(d) => format!("Invoice updated. {d}"),
                None => "Invoice updated".to_string(),
            };
            docs.record_activity(actor.user_id, "Invoice", AuditAction::Update, description);

            if invoice.total != old.total {
                let mut sale = docs
                    .sale_by_invoice(&invoice.id)
                    .cloned()
                    .ok_or_else(|| DomainError::storage("sale mirror missing for invoice"))?;
                sale.total = invoice.total;
                docs.upsert_sale(sale);
                docs.record_activity(
                    actor.user_id,
                    "Sale",
                    AuditAction::Update,
                    format!("Sale updated for invoice (Total: {})", invoice.total),
                );
            }

            views::invoice_view(docs, &invoice)
        })
    }

    /// `deleteInvoice` mutation: restock every line in full, then remove
    /// the invoice and its paired sale.
    pub fn delete_invoice(&self, actor: &Actor, id: InvoiceId) -> DomainResult<()> {
        self.store.transact(|docs| {
            let invoice = docs.invoice(&id)?.clone();
            ensure_access(actor, invoice.business_id)?;

            let mut restock: Vec<(ProductId, i64)> =
                aggregate_quantities(&invoice.items).into_iter().collect();
            restock.sort_by_key(|(product_id, _)| *product_id.as_uuid());

            for (product_id, quantity) in restock {
                stock::adjust_stock(docs, actor, &product_id, quantity, "Invoice deletion")?;
            }

            docs.remove_invoice(&invoice.id)?;
            let sale = docs
                .sale_by_invoice(&invoice.id)
                .cloned()
                .ok_or_else(|| DomainError::storage("sale mirror missing for invoice"))?;
            docs.remove_sale(&sale.id)?;

            docs.record_activity(
                actor.user_id,
                "Invoice",
                AuditAction::Delete,
                format!("Invoice deleted (Total: {})", invoice.total),
            );
            docs.record_activity(
                actor.user_id,
                "Sale",
                AuditAction::Delete,
                format!("Sale deleted for invoice (Total: {})", invoice.total),
            );
            Ok(())
        })
    }

    /// `invoices` query.
    pub fn invoices(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<InvoiceView>> {
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            Page::slice(docs.invoices_scoped(scope), page)?
                .try_map(|i| views::invoice_view(docs, &i))
        })
    }

    /// `invoice(id)` query.
    pub fn invoice(&self, actor: &Actor, id: InvoiceId) -> DomainResult<InvoiceView> {
        self.store.read(|docs| {
            let invoice = docs.invoice(&id)?;
            ensure_access(actor, invoice.business_id)?;
            views::invoice_view(docs, invoice)
        })
    }
}
