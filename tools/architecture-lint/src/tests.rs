//! Unit tests for the architecture lint.

use std::path::PathBuf;

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "domain/stock_ledger_service.rs",
    "use crate::domain::ports::InventoryStore; fn f() {}",
    true
)]
#[case(
    "domain/stock_ledger_service.rs",
    "use crate::outbound::persistence::DieselInventoryStore; fn f() {}",
    false
)]
#[case(
    "domain/stock_ledger_service.rs",
    "use stockroom::outbound::notification::ChannelNotifier; fn f() {}",
    false
)]
#[case("domain/inventory/asset.rs", "use diesel::prelude::*; struct Asset;", false)]
#[case(
    "domain/ports/inventory_store.rs",
    "fn f() { let _ = diesel_async::AsyncPgConnection::establish; }",
    false
)]
#[case(
    "outbound/notification/channel_notifier.rs",
    "use crate::outbound::persistence::DbPool; fn f() {}",
    false
)]
#[case(
    "outbound/persistence/diesel_inventory_store.rs",
    "use super::pool::DbPool; use crate::outbound::persistence::PoolConfig; fn f() {}",
    true
)]
#[case(
    "outbound/persistence/diesel_inventory_store.rs",
    "use super::schema::assets; fn f() {}",
    false
)]
#[case(
    "outbound/persistence/diesel_tenant_registry.rs",
    "use super::schema::tenants; fn f() {}",
    true
)]
#[case(
    "outbound/persistence/diesel_tenant_transaction.rs",
    "use super::schema::{alerts, assets}; fn f() {}",
    true
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_the_hexagon_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("config.rs", "fn f() {}");
    assert!(matches!(result, Err(ArchitectureLintError::Parse { .. })));
}

#[rstest]
fn violations_name_the_offending_file(lint_single: LintSingle) {
    let Err(ArchitectureLintError::Violations(violations)) = lint_single.lint(
        "outbound/persistence/diesel_tenant_registry.rs",
        "fn f() { let _ = super::schema::consumables::table; }",
    ) else {
        panic!("expected a violation");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].file,
        PathBuf::from("outbound/persistence/diesel_tenant_registry.rs")
    );
    assert!(violations[0].message.contains("consumables"));
}

#[rstest]
fn lints_a_backend_tree_on_disk() {
    let backend = tempfile::tempdir().expect("temp dir");
    let domain = backend.path().join("src").join("domain");
    std::fs::create_dir_all(&domain).expect("domain dir");
    std::fs::write(domain.join("mod.rs"), "use crate::outbound::Adapter;").expect("write");

    let result = lint_backend_sources(backend.path());

    assert!(matches!(result, Err(ArchitectureLintError::Violations(ref v)) if v.len() == 1));
}
