//! Black-box tests of the operation layer: the invoice-driven
//! stock-mutation workflow plus the directory operations around it.
//!
//! Everything goes through `Services` the way a GraphQL binding would:
//! register/login for tokens, `authenticate` for the actor, then typed
//! operations.

use std::sync::Arc;

use chrono::{Duration, Utc};

use stockbook_api::dto::{
    CreateBusinessInput, CreateCustomerInput, CreateProductInput, InvoiceItemInput, LoginInput,
    RegisterInput, UpdateInvoiceInput, UpdateProductInput, UpdateUserInput,
};
use stockbook_api::views::{CustomerView, ProductView};
use stockbook_api::{ApiConfig, Services};
use stockbook_auth::{Actor, Role};
use stockbook_core::{BusinessId, DomainError, PageArgs, ProductId};
use stockbook_infra::MemoryStore;
use stockbook_invoicing::InvoiceStatus;
use stockbook_tenants::{Business, BusinessKind};

type TestServices = Services<Arc<MemoryStore>>;

struct Harness {
    services: TestServices,
    platform: Actor,
}

fn harness() -> Harness {
    stockbook_observability::init();

    let services = Services::new(Arc::new(MemoryStore::new()), &ApiConfig::default());
    let payload = services
        .register(
            None,
            RegisterInput {
                username: "root".to_string(),
                password: "root-pw".to_string(),
                role: Some(Role::Platform),
                business_id: None,
            },
        )
        .expect("platform registration");
    let platform = services
        .authenticate(Some(&payload.token))
        .expect("platform token authenticates");

    Harness { services, platform }
}

impl Harness {
    fn business(&self, name: &str) -> Business {
        self.services
            .create_business(
                &self.platform,
                CreateBusinessInput {
                    name: name.to_string(),
                    address: None,
                    phone: None,
                    kind: BusinessKind::Store,
                },
            )
            .expect("business creation")
    }

    fn actor(&self, username: &str, role: Role, business: BusinessId) -> Actor {
        let payload = self
            .services
            .register(
                Some(&self.platform),
                RegisterInput {
                    username: username.to_string(),
                    password: "pw".to_string(),
                    role: Some(role),
                    business_id: Some(business),
                },
            )
            .expect("account registration");
        self.services
            .authenticate(Some(&payload.token))
            .expect("token authenticates")
    }

    fn product(
        &self,
        actor: &Actor,
        name: &str,
        sku: &str,
        quantity: i64,
        price: u64,
    ) -> ProductView {
        self.services
            .create_product(
                actor,
                CreateProductInput {
                    name: name.to_string(),
                    brand: "Acme".to_string(),
                    sku: sku.to_string(),
                    quantity,
                    price,
                    low_stock_amount: None,
                },
            )
            .expect("product creation")
    }

    fn customer(&self, actor: &Actor, name: &str, email: &str) -> CustomerView {
        self.services
            .create_customer(
                actor,
                CreateCustomerInput {
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: None,
                    address: None,
                },
            )
            .expect("customer creation")
    }

    fn quantity_of(&self, actor: &Actor, id: ProductId) -> i64 {
        self.services
            .product(actor, id)
            .expect("product lookup")
            .product
            .quantity
    }
}

fn item(product_id: ProductId, quantity: i64, price: u64) -> InvoiceItemInput {
    InvoiceItemInput {
        product_id,
        quantity,
        price,
    }
}

fn page(first: i64) -> PageArgs {
    PageArgs::new(first, None)
}

// ── invoice workflow ────────────────────────────────────────────────────

#[test]
fn creating_an_invoice_deducts_stock_and_mirrors_a_sale() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    assert_eq!(invoice.invoice.total, 1_000);
    assert_eq!(invoice.invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.customer.id, customer.customer.id);
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(h.quantity_of(&admin, product.product.id), 8);

    let sales = h.services.sales(&admin, PageArgs::default()).unwrap();
    assert_eq!(sales.items.len(), 1);
    assert_eq!(sales.items[0].sale.total, 1_000);
    assert_eq!(sales.items[0].invoice.id, invoice.invoice.id);
}

#[test]
fn updating_items_applies_the_net_stock_delta() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();
    assert_eq!(h.quantity_of(&admin, product.product.id), 8);

    // 2 → 5 of the same product: net additional deduction of 3.
    let updated = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                items: Some(vec![item(product.product.id, 5, 500)]),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(h.quantity_of(&admin, product.product.id), 5);
    assert_eq!(updated.invoice.total, 2_500);

    let sales = h.services.sales(&admin, PageArgs::default()).unwrap();
    assert_eq!(sales.items[0].sale.total, 2_500);
}

#[test]
fn removing_a_product_from_the_item_list_restocks_it_in_full() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let widget = h.product(&admin, "Widget", "WID-1", 10, 500);
    let gadget = h.product(&admin, "Gadget", "GAD-1", 50, 100);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(widget.product.id, 5, 500)])
        .unwrap();
    assert_eq!(h.quantity_of(&admin, widget.product.id), 5);

    h.services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                items: Some(vec![item(gadget.product.id, 1, 100)]),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(h.quantity_of(&admin, widget.product.id), 10);
    assert_eq!(h.quantity_of(&admin, gadget.product.id), 49);
}

#[test]
fn deleting_an_invoice_restocks_and_removes_the_sale() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    h.services.delete_invoice(&admin, invoice.invoice.id).unwrap();

    assert_eq!(h.quantity_of(&admin, product.product.id), 10);
    assert!(matches!(
        h.services.invoice(&admin, invoice.invoice.id),
        Err(DomainError::NotFound(_))
    ));
    assert!(h.services.sales(&admin, PageArgs::default()).unwrap().items.is_empty());
}

#[test]
fn overdraw_on_create_fails_without_touching_any_line() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let plenty = h.product(&admin, "Plenty", "PLN-1", 50, 100);
    let scarce = h.product(&admin, "Scarce", "SCR-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let err = h
        .services
        .create_invoice(
            &admin,
            customer.customer.id,
            vec![item(plenty.product.id, 5, 100), item(scarce.product.id, 11, 500)],
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::InsufficientStock { .. }));
    // The pre-flight pass means the passable first line was never deducted.
    assert_eq!(h.quantity_of(&admin, plenty.product.id), 50);
    assert_eq!(h.quantity_of(&admin, scarce.product.id), 10);
    assert!(h.services.invoices(&admin, PageArgs::default()).unwrap().items.is_empty());
}

#[test]
fn repeated_lines_beyond_stock_roll_back_the_whole_create() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    // Each line passes the per-line check; their sum does not. The ledger
    // rejects the second deduction and the transaction rolls back.
    let err = h
        .services
        .create_invoice(
            &admin,
            customer.customer.id,
            vec![item(product.product.id, 6, 500), item(product.product.id, 6, 500)],
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::InsufficientStock { .. }));
    assert_eq!(h.quantity_of(&admin, product.product.id), 10);
    assert!(h.services.invoices(&admin, PageArgs::default()).unwrap().items.is_empty());
}

#[test]
fn failed_update_leaves_no_partial_deduction() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let widget = h.product(&admin, "Widget", "WID-1", 10, 500);
    let gadget = h.product(&admin, "Gadget", "GAD-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(
            &admin,
            customer.customer.id,
            vec![item(widget.product.id, 2, 500), item(gadget.product.id, 2, 500)],
        )
        .unwrap();
    assert_eq!(h.quantity_of(&admin, widget.product.id), 8);
    assert_eq!(h.quantity_of(&admin, gadget.product.id), 8);

    // The widget delta (+1) is applicable, the gadget delta (−98) is not;
    // whichever order the loop takes, nothing may stick.
    let err = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                items: Some(vec![item(widget.product.id, 1, 500), item(gadget.product.id, 100, 500)]),
                ..Default::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::InsufficientStock { .. }));
    assert_eq!(h.quantity_of(&admin, widget.product.id), 8);
    assert_eq!(h.quantity_of(&admin, gadget.product.id), 8);

    let after = h.services.invoice(&admin, invoice.invoice.id).unwrap();
    assert_eq!(after.invoice.total, 2_000);
    let sales = h.services.sales(&admin, PageArgs::default()).unwrap();
    assert_eq!(sales.items[0].sale.total, 2_000);
}

#[test]
fn updating_status_alone_moves_no_stock() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    let paid = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                status: Some(InvoiceStatus::Paid),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(paid.invoice.status, InvoiceStatus::Paid);
    assert_eq!(h.quantity_of(&admin, product.product.id), 8);

    let cancelled = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                status: Some(InvoiceStatus::Cancelled),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(cancelled.invoice.status, InvoiceStatus::Cancelled);
    assert_eq!(h.quantity_of(&admin, product.product.id), 8);
}

#[test]
fn invoice_customer_reference_can_be_replaced_but_only_within_the_business() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let admin = h.actor("alice", Role::Admin, b1.id);
    let other_admin = h.actor("bob", Role::Admin, b2.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let carol = h.customer(&admin, "Carol", "carol@example.com");
    let dave = h.customer(&admin, "Dave", "dave@example.com");
    let foreign = h.customer(&other_admin, "Eve", "eve@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, carol.customer.id, vec![item(product.product.id, 1, 500)])
        .unwrap();

    let updated = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                customer_id: Some(dave.customer.id),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.customer.id, dave.customer.id);

    let err = h
        .services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                customer_id: Some(foreign.customer.id),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidReference(_)));
}

#[test]
fn deleting_a_sale_cascades_to_its_invoice() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 4, 500)])
        .unwrap();
    let sale_id = h.services.sales(&admin, PageArgs::default()).unwrap().items[0].sale.id;

    h.services.delete_sale(&admin, sale_id).unwrap();

    assert_eq!(h.quantity_of(&admin, product.product.id), 10);
    assert!(matches!(
        h.services.invoice(&admin, invoice.invoice.id),
        Err(DomainError::NotFound(_))
    ));
    assert!(h.services.sales(&admin, PageArgs::default()).unwrap().items.is_empty());
}

#[test]
fn referenced_products_and_customers_resist_deletion() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 1, 500)])
        .unwrap();

    assert!(matches!(
        h.services.delete_product(&admin, product.product.id),
        Err(DomainError::Conflict(_))
    ));
    assert!(matches!(
        h.services.delete_customer(&admin, customer.customer.id),
        Err(DomainError::Conflict(_))
    ));

    h.services.delete_invoice(&admin, invoice.invoice.id).unwrap();
    h.services.delete_product(&admin, product.product.id).unwrap();
    h.services.delete_customer(&admin, customer.customer.id).unwrap();
}

#[test]
fn low_stock_alert_follows_the_invoice_flow() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    // Default threshold is 10.
    let widget = h.product(&admin, "Widget", "WID-1", 12, 500);
    let gadget = h.product(&admin, "Gadget", "GAD-1", 50, 100);
    let customer = h.customer(&admin, "Carol", "carol@example.com");
    assert!(!widget.product.low_stock_alert);

    let invoice = h
        .services
        .create_invoice(&admin, customer.customer.id, vec![item(widget.product.id, 3, 500)])
        .unwrap();

    let view = h.services.product(&admin, widget.product.id).unwrap();
    assert_eq!(view.product.quantity, 9);
    assert!(view.product.low_stock_alert);

    let low = h.services.low_stock_products(&admin, PageArgs::default()).unwrap();
    assert!(low.items.iter().any(|p| p.product.id == widget.product.id));

    // Replacing the widget line restocks it above the threshold again.
    h.services
        .update_invoice(
            &admin,
            invoice.invoice.id,
            UpdateInvoiceInput {
                items: Some(vec![item(gadget.product.id, 1, 100)]),
                ..Default::default()
            },
        )
        .unwrap();

    let view = h.services.product(&admin, widget.product.id).unwrap();
    assert_eq!(view.product.quantity, 12);
    assert!(!view.product.low_stock_alert);
}

#[test]
fn the_ledger_audits_each_effective_adjustment_once() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 50, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    h.services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    let ledger_entries = |h: &Harness| {
        h.services
            .activity_logs(&h.platform, page(100))
            .unwrap()
            .items
            .into_iter()
            .filter(|a| a.entry.description.contains("adjusted by"))
            .count()
    };

    assert_eq!(ledger_entries(&h), 1);

    // A price-only update moves no stock and flips no alert: no new entry.
    h.services
        .update_product(
            &admin,
            product.product.id,
            UpdateProductInput {
                price: Some(600),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(ledger_entries(&h), 1);

    // A quantity change goes through the ledger.
    h.services
        .update_product(
            &admin,
            product.product.id,
            UpdateProductInput {
                quantity: Some(40),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(ledger_entries(&h), 2);

    let feed = h.services.activity_logs(&h.platform, page(100)).unwrap();
    assert!(feed.items.iter().any(|a| a.entry.description.contains("Invoice created for customer")));
    assert!(feed.items.iter().any(|a| a.entry.description.contains("Sale created for customer")));
}

// ── tenant isolation ────────────────────────────────────────────────────

#[test]
fn foreign_actors_cannot_touch_another_business() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let alice = h.actor("alice", Role::Admin, b1.id);
    let mallory = h.actor("mallory", Role::Admin, b2.id);
    let product = h.product(&alice, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&alice, "Carol", "carol@example.com");

    let invoice = h
        .services
        .create_invoice(&alice, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    assert!(matches!(
        h.services.product(&mallory, product.product.id),
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        h.services.update_product(
            &mallory,
            product.product.id,
            UpdateProductInput { quantity: Some(0), ..Default::default() },
        ),
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        h.services.update_invoice(
            &mallory,
            invoice.invoice.id,
            UpdateInvoiceInput { status: Some(InvoiceStatus::Paid), ..Default::default() },
        ),
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        h.services.delete_invoice(&mallory, invoice.invoice.id),
        Err(DomainError::Unauthorized)
    ));
    // Invoicing against a foreign customer is an invalid reference.
    assert!(matches!(
        h.services.create_invoice(&mallory, customer.customer.id, vec![item(product.product.id, 1, 500)]),
        Err(DomainError::InvalidReference(_))
    ));

    // Nothing moved.
    assert_eq!(h.quantity_of(&alice, product.product.id), 8);
    let after = h.services.invoice(&alice, invoice.invoice.id).unwrap();
    assert_eq!(after.invoice.status, InvoiceStatus::Pending);
}

#[test]
fn platform_accounts_cannot_own_business_scoped_records() {
    let h = harness();

    let err = h
        .services
        .create_product(
            &h.platform,
            CreateProductInput {
                name: "Widget".to_string(),
                brand: "Acme".to_string(),
                sku: "WID-1".to_string(),
                quantity: 1,
                price: 100,
                low_stock_amount: None,
            },
        )
        .unwrap_err();

    match err {
        DomainError::Validation(msg) => assert!(msg.contains("platform accounts")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ── accounts and tokens ─────────────────────────────────────────────────

#[test]
fn register_login_token_flow() {
    let h = harness();
    let business = h.business("Store One");
    h.actor("alice", Role::Admin, business.id);

    let payload = h
        .services
        .login(LoginInput {
            username: "alice".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
    let actor = h.services.authenticate(Some(&payload.token)).unwrap();
    assert_eq!(actor.role, Role::Admin);
    assert_eq!(actor.business_id, Some(business.id));

    assert!(matches!(
        h.services.login(LoginInput {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        }),
        Err(DomainError::InvalidCredentials)
    ));
    assert!(matches!(
        h.services.login(LoginInput {
            username: "nobody".to_string(),
            password: "pw".to_string(),
        }),
        Err(DomainError::InvalidCredentials)
    ));

    assert!(matches!(
        h.services.authenticate(None),
        Err(DomainError::NotAuthenticated)
    ));
    assert!(matches!(
        h.services.authenticate(Some("garbage")),
        Err(DomainError::NotAuthenticated)
    ));

    let me = h.services.me(&actor).unwrap();
    assert_eq!(me.username, "alice");
    assert_eq!(me.business.as_ref().map(|b| b.id), Some(business.id));
}

#[test]
fn deleted_accounts_stop_authenticating() {
    let h = harness();
    let business = h.business("Store One");
    let payload = h
        .services
        .register(
            Some(&h.platform),
            RegisterInput {
                username: "bob".to_string(),
                password: "pw".to_string(),
                role: Some(Role::User),
                business_id: Some(business.id),
            },
        )
        .unwrap();

    h.services.delete_user(&h.platform, payload.user.id).unwrap();

    assert!(matches!(
        h.services.authenticate(Some(&payload.token)),
        Err(DomainError::NotAuthenticated)
    ));
}

#[test]
fn role_changes_take_effect_on_the_next_request() {
    let h = harness();
    let business = h.business("Store One");
    let payload = h
        .services
        .register(
            Some(&h.platform),
            RegisterInput {
                username: "bob".to_string(),
                password: "pw".to_string(),
                role: Some(Role::Admin),
                business_id: Some(business.id),
            },
        )
        .unwrap();

    h.services
        .update_user(
            &h.platform,
            payload.user.id,
            UpdateUserInput {
                role: Some(Role::User),
                ..Default::default()
            },
        )
        .unwrap();

    // Same token, fresh context resolution: the stored role wins.
    let actor = h.services.authenticate(Some(&payload.token)).unwrap();
    assert_eq!(actor.role, Role::User);
}

#[test]
fn non_platform_callers_cannot_register_accounts() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);

    let err = h
        .services
        .register(
            Some(&admin),
            RegisterInput {
                username: "intruder".to_string(),
                password: "pw".to_string(),
                role: Some(Role::Admin),
                business_id: Some(business.id),
            },
        )
        .unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
}

#[test]
fn duplicate_keys_are_rejected() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let alice = h.actor("alice", Role::Admin, b1.id);
    let bob = h.actor("bob", Role::Admin, b2.id);

    // Username is global.
    assert!(matches!(
        h.services.register(
            Some(&h.platform),
            RegisterInput {
                username: "alice".to_string(),
                password: "pw".to_string(),
                role: Some(Role::User),
                business_id: Some(b1.id),
            },
        ),
        Err(DomainError::DuplicateKey(_))
    ));

    // SKU is unique per business only.
    h.product(&alice, "Widget", "WID-1", 5, 100);
    assert!(matches!(
        h.services.create_product(
            &alice,
            CreateProductInput {
                name: "Widget Clone".to_string(),
                brand: "Acme".to_string(),
                sku: "WID-1".to_string(),
                quantity: 5,
                price: 100,
                low_stock_amount: None,
            },
        ),
        Err(DomainError::DuplicateKey(_))
    ));
    h.product(&bob, "Widget", "WID-1", 5, 100);

    // Customer email is unique per business only.
    h.customer(&alice, "Carol", "carol@example.com");
    assert!(matches!(
        h.services.create_customer(
            &alice,
            CreateCustomerInput {
                name: "Carol Again".to_string(),
                email: "carol@example.com".to_string(),
                phone: None,
                address: None,
            },
        ),
        Err(DomainError::DuplicateKey(_))
    ));
    h.customer(&bob, "Carol", "carol@example.com");
}

// ── tenants, queries, pagination ────────────────────────────────────────

#[test]
fn business_bids_are_sequential_and_platform_scoped() {
    let h = harness();
    let b1 = h.business("First");
    let b2 = h.business("Second");
    let b3 = h.business("Third");
    assert_eq!((b1.bid, b2.bid, b3.bid), (1, 2, 3));

    let listed = h.services.businesses(&h.platform, PageArgs::default()).unwrap();
    assert_eq!(listed.total_count, 3);

    let admin = h.actor("alice", Role::Admin, b1.id);
    assert!(matches!(
        h.services.businesses(&admin, PageArgs::default()),
        Err(DomainError::Unauthorized)
    ));
    // Own business resolves; a foreign one does not.
    assert_eq!(h.services.business(&admin, b1.id).unwrap().id, b1.id);
    assert!(matches!(
        h.services.business(&admin, b2.id),
        Err(DomainError::Unauthorized)
    ));

    let found = h
        .services
        .search_businesses(&h.platform, "sec", PageArgs::default())
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, b2.id);
}

#[test]
fn product_lists_paginate_and_stay_tenant_scoped() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let alice = h.actor("alice", Role::Admin, b1.id);
    let bob = h.actor("bob", Role::Admin, b2.id);

    for n in 0..25 {
        h.product(&alice, &format!("Widget {n}"), &format!("WID-{n}"), 10, 100);
    }
    h.product(&bob, "Foreign", "FRN-1", 10, 100);

    let first_page = h.services.products(&alice, PageArgs::new(10, 0)).unwrap();
    assert_eq!(first_page.items.len(), 10);
    assert_eq!(first_page.total_count, 25);
    assert!(first_page.has_more);

    let last_page = h.services.products(&alice, PageArgs::new(10, 20)).unwrap();
    assert_eq!(last_page.items.len(), 5);
    assert!(!last_page.has_more);

    // Platform sees across tenants.
    let all = h.services.products(&h.platform, page(100)).unwrap();
    assert_eq!(all.total_count, 26);
}

#[test]
fn product_search_matches_name_brand_and_sku_within_scope() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let alice = h.actor("alice", Role::Admin, b1.id);
    let bob = h.actor("bob", Role::Admin, b2.id);

    h.product(&alice, "Espresso Grinder", "GRD-9", 4, 12_000);
    h.product(&alice, "Filter Paper", "FLT-2", 100, 300);
    h.product(&bob, "Espresso Machine", "ESP-1", 2, 80_000);

    let by_name = h
        .services
        .search_products(&alice, "espresso", None, PageArgs::default())
        .unwrap();
    assert_eq!(by_name.items.len(), 1);

    let by_sku = h
        .services
        .search_products(&alice, "flt", None, PageArgs::default())
        .unwrap();
    assert_eq!(by_sku.items.len(), 1);

    let by_brand = h
        .services
        .search_products(&alice, "acme", None, PageArgs::default())
        .unwrap();
    assert_eq!(by_brand.items.len(), 2);

    // A business actor cannot search someone else's catalog.
    assert!(matches!(
        h.services.search_products(&alice, "espresso", Some(b2.id), PageArgs::default()),
        Err(DomainError::Unauthorized)
    ));

    // Platform can scope to one business or search across all.
    let platform_scoped = h
        .services
        .search_products(&h.platform, "espresso", Some(b2.id), PageArgs::default())
        .unwrap();
    assert_eq!(platform_scoped.items.len(), 1);
    let platform_all = h
        .services
        .search_products(&h.platform, "espresso", None, PageArgs::default())
        .unwrap();
    assert_eq!(platform_all.items.len(), 2);
}

#[test]
fn sales_report_returns_the_inclusive_window() {
    let h = harness();
    let business = h.business("Store One");
    let admin = h.actor("alice", Role::Admin, business.id);
    let product = h.product(&admin, "Widget", "WID-1", 10, 500);
    let customer = h.customer(&admin, "Carol", "carol@example.com");

    h.services
        .create_invoice(&admin, customer.customer.id, vec![item(product.product.id, 2, 500)])
        .unwrap();

    let now = Utc::now();
    let hour = Duration::hours(1);

    let report = h.services.sales_report(&admin, now - hour, now + hour).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].sale.total, 1_000);

    let empty = h.services.sales_report(&admin, now + hour, now + hour + hour).unwrap();
    assert!(empty.is_empty());

    assert!(matches!(
        h.services.sales_report(&admin, now + hour, now - hour),
        Err(DomainError::Validation(_))
    ));
}

#[test]
fn activity_feed_is_scoped_to_the_caller() {
    let h = harness();
    let b1 = h.business("Store One");
    let b2 = h.business("Store Two");
    let alice = h.actor("alice", Role::Admin, b1.id);
    let bob = h.actor("bob", Role::Admin, b2.id);

    h.product(&alice, "Widget", "WID-1", 10, 100);
    h.product(&bob, "Gadget", "GAD-1", 10, 100);

    let alices = h.services.activity_logs(&alice, page(100)).unwrap();
    assert!(!alices.items.is_empty());
    assert!(alices.items.iter().all(|a| a.entry.user_id == alice.user_id));

    // Platform sees entries from both actors (and its own).
    let platform_feed = h.services.activity_logs(&h.platform, page(100)).unwrap();
    assert!(platform_feed.items.iter().any(|a| a.entry.user_id == alice.user_id));
    assert!(platform_feed.items.iter().any(|a| a.entry.user_id == bob.user_id));
}
