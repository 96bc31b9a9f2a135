//! Sale queries and the cascading sale deletion.

use chrono::{DateTime, Utc};

use stockbook_auth::{Actor, ensure_access};
use stockbook_core::{DomainError, DomainResult, Page, PageArgs, ProductId, SaleId};
use stockbook_infra::{AuditAction, UnitOfWork};
use stockbook_invoicing::aggregate_quantities;
use stockbook_sales::Sale;

use crate::context::list_scope;
use crate::views::{self, SaleView};
use crate::{Services, stock};

impl<S: UnitOfWork> Services<S> {
    /// `sales` query.
    pub fn sales(&self, actor: &Actor, page: PageArgs) -> DomainResult<Page<SaleView>> {
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            Page::slice(docs.sales_scoped(scope), page)?.try_map(|s| views::sale_view(docs, &s))
        })
    }

    /// `sale(id)` query.
    pub fn sale(&self, actor: &Actor, id: SaleId) -> DomainResult<SaleView> {
        self.store.read(|docs| {
            let sale = docs.sale(&id)?;
            ensure_access(actor, sale.business_id)?;
            views::sale_view(docs, sale)
        })
    }

    /// `salesReport(startDate, endDate)` query: sales created in the
    /// inclusive window, role-scoped.
    pub fn sales_report(
        &self,
        actor: &Actor,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<SaleView>> {
        if start > end {
            return Err(DomainError::validation("startDate must not be after endDate"));
        }
        let scope = list_scope(actor)?;
        self.store.read(|docs| {
            let in_window: Vec<Sale> = docs
                .sales_scoped(scope)
                .into_iter()
                .filter(|s| s.created_at >= start && s.created_at <= end)
                .collect();
            in_window
                .iter()
                .map(|s| views::sale_view(docs, s))
                .collect()
        })
    }

    /// `deleteSale` mutation.
    ///
    /// A sale never outlives its invoice, so deleting the mirror cascades:
    /// the invoice's lines are restocked in full and both documents are
    /// removed together.
    pub fn delete_sale(&self, actor: &Actor, id: SaleId) -> DomainResult<()> {
        self.store.transact(|docs| {
            let sale = docs.sale(&id)?.clone();
            ensure_access(actor, sale.business_id)?;

            let invoice = docs
                .invoice(&sale.invoice_id)
                .map_err(|_| DomainError::storage("sale without a backing invoice"))?
                .clone();

            let mut restock: Vec<(ProductId, i64)> =
                aggregate_quantities(&invoice.items).into_iter().collect();
            restock.sort_by_key(|(product_id, _)| *product_id.as_uuid());

            for (product_id, quantity) in restock {
                stock::adjust_stock(docs, actor, &product_id, quantity, "Invoice deletion")?;
            }

            docs.remove_sale(&sale.id)?;
            docs.remove_invoice(&invoice.id)?;

            docs.record_activity(
                actor.user_id,
                "Sale",
                AuditAction::Delete,
                format!("Sale deleted (Total: {})", sale.total),
            );
            docs.record_activity(
                actor.user_id,
                "Invoice",
                AuditAction::Delete,
                format!("Invoice deleted (Total: {})", invoice.total),
            );
            Ok(())
        })
    }
}
