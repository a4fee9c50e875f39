mod common;

use common::{day, names, new_user, seed_users, setup_db};
use crud_scaffold::database::{users, EntityState};
use crud_scaffold::errors::RepoError;
use crud_scaffold::repositories::{BulkOperation, UpdateOptions, UserRepository};
use crud_scaffold::utils::query_builder::FilterMode;
use crud_scaffold::utils::resource_query::{ResourceOptions, ResourceQuery};
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, Condition, EntityTrait, TransactionTrait};

fn by_name() -> ResourceOptions {
    ResourceOptions::with_search_fields(["name"])
}

fn query() -> ResourceQuery {
    ResourceQuery::default()
}

#[tokio::test]
async fn list_hides_deleted_and_orders_by_latest_update() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a", "b", "c"]).await;

    repo.delete(&db, seeded[1].id.clone()).await.unwrap();

    let listed = repo.list(&db, &query(), &by_name()).await.unwrap();
    assert_eq!(names(&listed.items), ["c", "a"]);
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn filters_cannot_resurrect_deleted_rows() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a", "b"]).await;
    repo.delete(&db, seeded[0].id.clone()).await.unwrap();

    for filters in [r#"{"isDeleted":true}"#, r#"{"is_deleted":true}"#] {
        let params = ResourceQuery {
            filters: Some(filters.into()),
            ..query()
        };
        let listed = repo.list(&db, &params, &by_name()).await.unwrap();
        assert!(listed.items.is_empty(), "{filters}");
        assert_eq!(listed.total_count, 0, "{filters}");
    }
}

#[tokio::test]
async fn equal_sort_keys_are_ordered_by_id() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let data = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|name| new_user(name, &format!("{name}@example.com"), day(1)))
        .collect();
    repo.insert_many(&db, data).await.unwrap();

    let mut paged = Vec::new();
    for page in ["0", "1", "2"] {
        let params = ResourceQuery {
            page: Some(page.into()),
            limit: Some("2".into()),
            ..query()
        };
        let listed = repo.list(&db, &params, &by_name()).await.unwrap();
        paged.extend(listed.items.into_iter().map(|u| u.id));
    }

    let mut expected = paged.clone();
    expected.sort();
    expected.dedup();
    assert_eq!(paged, expected);
    assert_eq!(paged.len(), 5);
}

#[tokio::test]
async fn search_matches_substrings_case_insensitively() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["Anna", "bob", "Clara"]).await;

    let params = ResourceQuery {
        search: Some("A".into()),
        sort: Some("asc".into()),
        order_by: Some("name".into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(names(&listed.items), ["Anna", "Clara"]);
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn total_count_ignores_paging() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a", "b", "c"]).await;
    repo.delete(&db, seeded[1].id.clone()).await.unwrap();

    let params = ResourceQuery {
        page: Some("1".into()),
        limit: Some("1".into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(names(&listed.items), ["a"]);
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn pages_concatenate_to_the_full_listing() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c", "d", "e"]).await;

    let full = repo.list(&db, &query(), &by_name()).await.unwrap();

    let mut paged = Vec::new();
    for page in ["0", "1", "2"] {
        let params = ResourceQuery {
            page: Some(page.into()),
            limit: Some("2".into()),
            ..query()
        };
        let listed = repo.list(&db, &params, &by_name()).await.unwrap();
        assert_eq!(listed.total_count, 5);
        paged.extend(listed.items);
    }
    assert_eq!(paged, full.items);
}

#[tokio::test]
async fn malformed_filters_are_ignored() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b"]).await;

    let params = ResourceQuery {
        filters: Some("{not json".into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn filters_narrow_by_equality() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c"]).await;

    let params = ResourceQuery {
        filters: Some(r#"{"name":"b","email":"b@example.com"}"#.into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(names(&listed.items), ["b"]);

    let params = ResourceQuery {
        filters: Some(r#"{"createdBy":null}"#.into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(listed.total_count, 3);
}

#[tokio::test]
async fn array_filters_follow_the_filter_mode() {
    let db = setup_db().await;
    let filters = Some(r#"{"name":["a","c"]}"#.to_string());
    let params = ResourceQuery {
        filters,
        ..query()
    };

    let equality = UserRepository::default();
    seed_users(&db, &equality, &["a", "b", "c"]).await;
    let listed = equality.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(listed.total_count, 0);

    let membership = UserRepository::new(FilterMode::Membership);
    let listed = membership.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c", "d", "e"]).await;

    let params = ResourceQuery {
        date_from: Some("2024-01-02".into()),
        date_to: Some("2024-01-04T00:00:00Z".into()),
        sort: Some("asc".into()),
        order_by: Some("createdAt".into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(names(&listed.items), ["b", "c", "d"]);
}

#[tokio::test]
async fn a_single_date_bound_is_ignored() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b"]).await;

    let params = ResourceQuery {
        date_from: Some("2024-01-02".into()),
        ..query()
    };
    let listed = repo.list(&db, &params, &by_name()).await.unwrap();
    assert_eq!(listed.total_count, 2);
}

#[tokio::test]
async fn unparseable_dates_are_rejected() {
    let db = setup_db().await;
    let repo = UserRepository::default();

    let params = ResourceQuery {
        date_from: Some("yesterday".into()),
        date_to: Some("2024-01-04".into()),
        ..query()
    };
    let err = repo.list(&db, &params, &by_name()).await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidDate(value) if value == "yesterday"));
}

#[tokio::test]
async fn unknown_sort_field_surfaces_the_store_error() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a"]).await;

    let params = ResourceQuery {
        order_by: Some("noSuchField".into()),
        ..query()
    };
    let err = repo.list(&db, &params, &by_name()).await.unwrap_err();
    assert!(matches!(err, RepoError::Database(_)));
}

#[tokio::test]
async fn create_always_starts_active() {
    let db = setup_db().await;
    let repo = UserRepository::default();

    let mut data = new_user("a", "a@example.com", day(1));
    data.is_deleted = Set(true);
    let created = repo.create(&db, data).await.unwrap();

    assert_eq!(created.state(), EntityState::Active);
    assert!(!created.id.is_empty());
    assert_eq!(created.created_at, day(1));
}

#[tokio::test]
async fn update_returns_the_requested_version() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a"]).await;
    let id = seeded[0].id.clone();

    let patch = users::ActiveModel {
        name: Set("a2".into()),
        ..Default::default()
    };
    let after = repo
        .update(&db, id.clone(), patch, UpdateOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.name, "a2");
    assert_eq!(after.email, "a@example.com");
    assert!(after.updated_at > day(1));

    let patch = users::ActiveModel {
        name: Set("a3".into()),
        ..Default::default()
    };
    let before = repo
        .update(&db, id.clone(), patch, UpdateOptions::returning_before())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.name, "a2");

    let current = repo.find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(current.name, "a3");
}

#[tokio::test]
async fn update_cannot_touch_the_deleted_flag() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a"]).await;

    let patch = users::ActiveModel {
        is_deleted: Set(true),
        ..Default::default()
    };
    let updated = repo
        .update(&db, seeded[0].id.clone(), patch, UpdateOptions::default())
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_deleted);
}

#[tokio::test]
async fn deleted_records_are_out_of_reach() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a"]).await;
    let id = seeded[0].id.clone();

    let deleted = repo.delete(&db, id.clone()).await.unwrap().unwrap();
    assert_eq!(deleted.state(), EntityState::Deleted);

    assert!(repo.find_by_id(&db, id.clone()).await.unwrap().is_none());
    assert!(repo.delete(&db, id.clone()).await.unwrap().is_none());
    let patch = users::ActiveModel {
        name: Set("zombie".into()),
        ..Default::default()
    };
    assert!(repo
        .update(&db, id.clone(), patch, UpdateOptions::default())
        .await
        .unwrap()
        .is_none());

    let stored = users::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();
    assert!(stored.is_deleted);
    assert_eq!(stored.name, "a");
}

#[tokio::test]
async fn find_one_and_count_skip_deleted() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c"]).await;

    let only_b = Condition::all().add(users::Column::Name.eq("b"));
    let removed = repo.delete_one(&db, only_b.clone()).await.unwrap();
    assert_eq!(removed.map(|u| u.name), Some("b".to_string()));

    assert!(repo.find_one(&db, only_b).await.unwrap().is_none());
    assert_eq!(repo.count(&db, Condition::all()).await.unwrap(), 2);
    assert_eq!(repo.find(&db, Condition::all()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_many_and_delete_many_report_counts() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c"]).await;

    let a_or_b = Condition::any()
        .add(users::Column::Name.eq("a"))
        .add(users::Column::Name.eq("b"));
    let patch = users::ActiveModel {
        last_updated_by: Set(Some("admin".into())),
        ..Default::default()
    };
    assert_eq!(repo.update_many(&db, a_or_b.clone(), patch).await.unwrap(), 2);

    let touched = repo
        .find(&db, Condition::all().add(users::Column::LastUpdatedBy.eq("admin")))
        .await
        .unwrap();
    assert_eq!(touched.len(), 2);
    assert!(touched.iter().all(|u| u.updated_at > day(3)));

    assert_eq!(repo.delete_many(&db, a_or_b.clone()).await.unwrap(), 2);
    assert_eq!(repo.delete_many(&db, a_or_b).await.unwrap(), 0);
    assert_eq!(repo.count(&db, Condition::all()).await.unwrap(), 1);

    let everything = users::Entity::find().all(&db).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn insert_many_keeps_order() {
    let db = setup_db().await;
    let repo = UserRepository::default();

    let created = repo
        .insert_many(
            &db,
            vec![
                new_user("a", "a@example.com", day(1)),
                new_user("b", "b@example.com", day(2)),
            ],
        )
        .await
        .unwrap();
    assert_eq!(names(&created), ["a", "b"]);
    assert_eq!(repo.count(&db, Condition::all()).await.unwrap(), 2);
}

#[tokio::test]
async fn bulk_write_runs_inside_a_transaction() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    let seeded = seed_users(&db, &repo, &["a", "b"]).await;

    let txn = db.begin().await.unwrap();
    let result = repo
        .bulk_write(
            &txn,
            vec![
                BulkOperation::InsertOne(new_user("c", "c@example.com", day(3))),
                BulkOperation::UpdateOne {
                    id: seeded[0].id.clone(),
                    data: users::ActiveModel {
                        name: Set("a2".into()),
                        ..Default::default()
                    },
                },
                BulkOperation::DeleteOne {
                    id: seeded[1].id.clone(),
                },
            ],
        )
        .await
        .unwrap();
    txn.commit().await.unwrap();

    assert_eq!(result.inserted_count, 1);
    assert_eq!(result.modified_count, 1);
    assert_eq!(result.deleted_count, 1);

    let listed = repo
        .list(
            &db,
            &ResourceQuery {
                sort: Some("asc".into()),
                order_by: Some("name".into()),
                ..query()
            },
            &by_name(),
        )
        .await
        .unwrap();
    assert_eq!(names(&listed.items), ["a2", "c"]);
}

#[tokio::test]
async fn rolled_back_writes_leave_no_trace() {
    let db = setup_db().await;
    let repo = UserRepository::default();

    let txn = db.begin().await.unwrap();
    repo.create(&txn, new_user("a", "a@example.com", day(1)))
        .await
        .unwrap();
    txn.rollback().await.unwrap();

    assert_eq!(repo.count(&db, Condition::all()).await.unwrap(), 0);
}

#[tokio::test]
async fn with_pagination_pages_a_prepared_query() {
    let db = setup_db().await;
    let repo = UserRepository::default();
    seed_users(&db, &repo, &["a", "b", "c"]).await;

    let prepared = repo.query().with_filters(r#"{"createdBy":null}"#);
    let paged = repo
        .with_pagination(&db, prepared, Some("2"), None)
        .await
        .unwrap();
    assert_eq!(paged.items.len(), 2);
    assert_eq!(paged.total_count, 3);
}
