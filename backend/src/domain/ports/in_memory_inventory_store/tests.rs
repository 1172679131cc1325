//! Behavioural coverage for the in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::FutureExt;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::sequence::{name_prefix, tag_prefix};
use crate::domain::{ErrorCode, StatusId};

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid instant")
        + Duration::minutes(minute)
}

fn department(name: &str, minute: i64) -> Department {
    Department {
        id: DepartmentId::random(),
        tenant_id: None,
        name: name.to_owned(),
        created_at: at(minute),
    }
}

fn sequence_of(identifier: &str) -> String {
    identifier
        .trim_end_matches(|ch: char| ch.is_ascii_digit())
        .to_owned()
}

fn asset(tag: &str, name: &str) -> Asset {
    Asset {
        id: AssetId::random(),
        tenant_id: None,
        tag: tag.to_owned(),
        tag_prefix: sequence_of(tag),
        name: name.to_owned(),
        name_prefix: sequence_of(name),
        category_id: CategoryId::random(),
        location_id: LocationId::random(),
        department_id: DepartmentId::random(),
        assigned_to: None,
        status_id: Some(StatusId::random()),
        serial_number: None,
        created_at: at(0),
        updated_at: at(0),
    }
}

#[fixture]
fn store() -> InMemoryInventoryStore {
    InMemoryInventoryStore::new()
}

macro_rules! insert {
    ($store:expr, $tenant:expr, $entity:ty, $row:expr) => {{
        let row: $entity = $row;
        $store
            .in_tenant_transaction($tenant, move |tx| {
                async move { Ok(ScopedRepository::<$entity>::create(tx, row).await?) }.boxed()
            })
    }};
}

async fn fetch_department(
    store: &InMemoryInventoryStore,
    tenant: TenantId,
    id: DepartmentId,
) -> Option<Department> {
    store
        .in_tenant_transaction(tenant, move |tx| {
            async move { Ok(ScopedRepository::<Department>::get(tx, id).await?) }.boxed()
        })
        .await
        .expect("read succeeds")
}

#[rstest]
#[tokio::test]
async fn rows_are_invisible_to_other_tenants(store: InMemoryInventoryStore) {
    let (owner, intruder) = (TenantId::random(), TenantId::random());
    let stored = insert!(store, owner, Department, department("ICT", 0)).await.expect("insert");

    assert_eq!(stored.tenant_id, Some(owner));
    assert!(fetch_department(&store, owner, stored.id).await.is_some());
    assert!(fetch_department(&store, intruder, stored.id).await.is_none());

    let err = store
        .in_tenant_transaction(intruder, move |tx| {
            async move { Ok(ScopedRepository::<Department>::delete(tx, stored.id).await?) }.boxed()
        })
        .await
        .expect_err("foreign delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn updating_a_foreign_row_is_not_found(store: InMemoryInventoryStore) {
    let owner = TenantId::random();
    let stored = insert!(store, owner, Department, department("ICT", 0)).await.expect("insert");
    let mut renamed = stored.clone();
    renamed.name = "Finance".to_owned();
    renamed.tenant_id = None;

    let err = store
        .in_tenant_transaction(TenantId::random(), move |tx| {
            async move { Ok(ScopedRepository::<Department>::update(tx, renamed).await?) }.boxed()
        })
        .await
        .expect_err("foreign update");

    assert_eq!(err.code(), ErrorCode::NotFound);
    let kept = fetch_department(&store, owner, stored.id).await.expect("still there");
    assert_eq!(kept.name, "ICT");
}

#[rstest]
#[tokio::test]
async fn forged_tenant_is_rejected_on_create(store: InMemoryInventoryStore) {
    let mut forged = department("ICT", 0);
    forged.tenant_id = Some(TenantId::random());

    let err = insert!(store, TenantId::random(), Department, forged)
        .await
        .expect_err("forged tenant");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn names_are_unique_per_tenant(store: InMemoryInventoryStore) {
    let (first, second) = (TenantId::random(), TenantId::random());
    insert!(store, first, Department, department("ICT", 0)).await.expect("first tenant");
    insert!(store, second, Department, department("ICT", 0)).await.expect("other tenant may reuse");

    let err = insert!(store, first, Department, department("ICT", 1))
        .await
        .expect_err("duplicate within tenant");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.is_conflict());
}

#[rstest]
#[case(asset("CompDes001", "PLAN-ICT-DES99"))]
#[case(asset("CompDes999", "PLAN-ICT-DES01"))]
#[tokio::test]
async fn asset_tags_and_names_are_unique(store: InMemoryInventoryStore, #[case] clash: Asset) {
    let tenant = TenantId::random();
    insert!(store, tenant, Asset, asset("CompDes001", "PLAN-ICT-DES01"))
        .await
        .expect("first asset");

    let err = insert!(store, tenant, Asset, clash).await.expect_err("clash");

    assert!(err.is_conflict());
}

#[rstest]
#[tokio::test]
async fn failed_work_rolls_back_every_write(store: InMemoryInventoryStore) {
    let tenant = TenantId::random();
    let kept = department("ICT", 0);
    let kept_id = kept.id;

    let err = store
        .in_tenant_transaction(tenant, move |tx| {
            async move {
                ScopedRepository::<Department>::create(tx, kept).await?;
                Err::<(), _>(Error::invalid_state("abandon"))
            }
            .boxed()
        })
        .await
        .expect_err("work fails");

    assert_eq!(err.code(), ErrorCode::InvalidState);
    assert!(fetch_department(&store, tenant, kept_id).await.is_none());
}

#[rstest]
#[tokio::test]
async fn listing_is_oldest_first_and_paged(store: InMemoryInventoryStore) {
    let tenant = TenantId::random();
    for (minute, name) in [(2, "Stores"), (0, "ICT"), (1, "Finance")] {
        insert!(store, tenant, Department, department(name, minute)).await.expect("insert");
    }
    insert!(store, TenantId::random(), Department, department("Elsewhere", 0))
        .await
        .expect("other tenant");

    let (first_page, second_page, total) = store
        .in_tenant_transaction(tenant, |tx| {
            async move {
                let filter = DepartmentFilter::default();
                let first = ScopedRepository::<Department>::list(
                    tx,
                    &filter,
                    PageRequest::new(1, 2)?,
                )
                .await?;
                let second = ScopedRepository::<Department>::list(
                    tx,
                    &filter,
                    PageRequest::new(2, 2)?,
                )
                .await?;
                let total = ScopedRepository::<Department>::count(tx, &filter).await?;
                Ok((first, second, total))
            }
            .boxed()
        })
        .await
        .expect("list");

    let names = |rows: &[Department]| rows.iter().map(|row| row.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&first_page), ["ICT", "Finance"]);
    assert_eq!(names(&second_page), ["Stores"]);
    assert_eq!(total, 3);
}

#[rstest]
#[tokio::test]
async fn greatest_identifier_follows_sequence_order(store: InMemoryInventoryStore) {
    let tenant = TenantId::random();
    for (tag, name) in [
        ("CompDes999", "PLAN-ICT-DES01"),
        ("CompDes1000", "PLAN-ICT-DES02"),
        ("CompDesk01", "PLAN-ICT-DES03"),
    ] {
        insert!(store, tenant, Asset, asset(tag, name)).await.expect("insert");
    }
    insert!(store, TenantId::random(), Asset, asset("CompDes5000", "PLAN-ICT-DES09"))
        .await
        .expect("other tenant");

    let (greatest_tag, greatest_name) = store
        .in_tenant_transaction(tenant, |tx| {
            async move {
                let tag = tag_prefix("Computers:Desktop")?;
                let name = name_prefix("Plant", "ICT", "Computers:Desktop")?;
                tx.lock_identifier_prefix(&tag).await?;
                Ok((
                    tx.greatest_identifier(&tag).await?,
                    tx.greatest_identifier(&name).await?,
                ))
            }
            .boxed()
        })
        .await
        .expect("lookup");

    assert_eq!(greatest_tag.as_deref(), Some("CompDes1000"));
    assert_eq!(greatest_name.as_deref(), Some("PLAN-ICT-DES03"));
}

#[rstest]
#[tokio::test]
async fn sequences_ignore_prefixes_that_extend_them(store: InMemoryInventoryStore) {
    let tenant = TenantId::random();
    // `IT:PC2` numbers its tags `ITPC2001`, `ITPC2002`, ...
    let extension = Asset {
        tag_prefix: "ITPC2".to_owned(),
        name_prefix: "PLAN-ICT-PC2".to_owned(),
        ..asset("ITPC2001", "PLAN-ICT-PC201")
    };
    insert!(store, tenant, Asset, extension).await.expect("IT:PC2 asset");

    let (greatest_tag, greatest_name) = store
        .in_tenant_transaction(tenant, |tx| {
            async move {
                let tag = tag_prefix("IT:PC")?;
                let name = name_prefix("Plant", "ICT", "IT:PC")?;
                Ok((
                    tx.greatest_identifier(&tag).await?,
                    tx.greatest_identifier(&name).await?,
                ))
            }
            .boxed()
        })
        .await
        .expect("lookup");

    assert_eq!(greatest_tag, None);
    assert_eq!(greatest_name, None);
}

#[rstest]
#[tokio::test]
async fn only_one_pending_alert_per_consumable(store: InMemoryInventoryStore) {
    let tenant = TenantId::random();
    let consumable_id = ConsumableId::random();
    let alert = |status| Alert {
        id: AlertId::random(),
        tenant_id: None,
        consumable_id,
        message: "Stock for Toner is below reorder level.".to_owned(),
        status,
        created_at: at(0),
        updated_at: at(0),
    };
    insert!(store, tenant, Alert, alert(AlertStatus::Pending)).await.expect("first");
    insert!(store, tenant, Alert, alert(AlertStatus::Resolved)).await.expect("resolved history");

    let err = insert!(store, tenant, Alert, alert(AlertStatus::Pending))
        .await
        .expect_err("second pending");

    assert!(err.is_conflict());
}
