// tests/sqlite_sync.rs

//! Sync tests against an on-disk SQLite database.

mod common;

use common::{GNU_ELPA, backend_config, feed_file, setup_test_db};
use gs_elpa::db::{self, CATEGORY};
use gs_elpa::repository::{FeedSource, sync_repository_sqlite};
use gs_elpa::Error;

const FEED_V1: &str = r#"(1
 (ace-window . [(0 10 0) ((avy (0 5 0))) "Quickly switch windows." single])
 (avy . [(0 5 0) ((emacs (24 1)) (cl-lib (0 5))) "Jump to arbitrary positions" tar]))"#;

const FEED_V2: &str = r#"(1
 (ace-window . [(0 11 0) ((avy (0 5 0))) "Quickly switch windows." single]))"#;

#[test]
fn test_sync_stores_packages_and_common_data() {
    let (_dir, db_path) = setup_test_db();
    let file = feed_file(FEED_V1);
    let mut conn = db::open(&db_path).unwrap();

    let stats = sync_repository_sqlite(
        &mut conn,
        &backend_config(),
        "gnu",
        &FeedSource::File(file.path().to_path_buf()),
    )
    .unwrap();
    assert_eq!(stats.added, 2);

    let packages = db::sqlite::list_packages(&conn, CATEGORY).unwrap();
    let names: Vec<_> = packages.iter().map(|p| p.package.to_string()).collect();
    assert_eq!(names, vec!["app-emacs/ace-window-0.10.0", "app-emacs/avy-0.5.0"]);

    let avy = &packages[1];
    assert_eq!(avy.property("realname"), Some("avy"));
    assert_eq!(avy.property("source_type"), Some("tar"));
    assert_eq!(avy.dependencies(), vec!["app-emacs/emacs", "app-emacs/cl-lib"]);
    assert_eq!(avy.properties["depend"], avy.properties["dependencies"]);

    let common = db::sqlite::common_data(&conn, CATEGORY).unwrap().unwrap();
    assert_eq!(common.repo_uri, GNU_ELPA);
    assert_eq!(common.homepage, GNU_ELPA);
}

#[test]
fn test_resync_replaces_previous_packages() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let backend = backend_config();

    let first = feed_file(FEED_V1);
    sync_repository_sqlite(
        &mut conn,
        &backend,
        "gnu",
        &FeedSource::File(first.path().to_path_buf()),
    )
    .unwrap();

    let second = feed_file(FEED_V2);
    sync_repository_sqlite(
        &mut conn,
        &backend,
        "gnu",
        &FeedSource::File(second.path().to_path_buf()),
    )
    .unwrap();

    let packages = db::sqlite::list_packages(&conn, CATEGORY).unwrap();
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].package.version, "0.11.0");
}

#[test]
fn test_failed_sync_leaves_database_unchanged() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();
    let backend = backend_config();

    let good = feed_file(FEED_V1);
    sync_repository_sqlite(
        &mut conn,
        &backend,
        "gnu",
        &FeedSource::File(good.path().to_path_buf()),
    )
    .unwrap();

    let bad = feed_file("(2 (ace-window . [(9 9) nil \"new\" single]))");
    let result = sync_repository_sqlite(
        &mut conn,
        &backend,
        "gnu",
        &FeedSource::File(bad.path().to_path_buf()),
    );
    assert!(matches!(result, Err(Error::SyncError(_))));

    let packages = db::sqlite::list_packages(&conn, CATEGORY).unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].package.version, "0.10.0");
}

#[test]
fn test_unparseable_feed_is_a_parse_error() {
    let (_dir, db_path) = setup_test_db();
    let mut conn = db::open(&db_path).unwrap();

    let file = feed_file("(1 (ace-window . [(0 10 0) nil \"unterminated");
    let result = sync_repository_sqlite(
        &mut conn,
        &backend_config(),
        "gnu",
        &FeedSource::File(file.path().to_path_buf()),
    );
    assert!(matches!(result, Err(Error::ParseError(_))));
    assert!(db::sqlite::list_packages(&conn, CATEGORY).unwrap().is_empty());
}
