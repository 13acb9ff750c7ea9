use memo_core::db::migrations::latest_version;
use memo_core::db::open_db_in_memory;
use memo_core::{
    Memo, MemoRepository, MemoService, MemoValidationError, RepoError, SqliteMemoRepository,
};
use rusqlite::Connection;

#[test]
fn insert_assigns_distinct_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let ids: Vec<_> = (1..=20)
        .map(|index| repo.insert(&format!("memo {index}")).unwrap().mno)
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(repo.count().unwrap(), 20);
}

#[test]
fn ids_are_not_reused_after_deleting_the_newest_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let first = repo.insert("first").unwrap();
    let second = repo.insert("second").unwrap();
    assert_eq!(repo.delete_by_id(second.mno).unwrap(), 1);

    let third = repo.insert("third").unwrap();
    assert!(third.mno > second.mno);
    assert!(first.mno < second.mno);
}

#[test]
fn insert_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let stored = repo.insert("memo sample..1").unwrap();
    let loaded = repo.find_by_id(stored.mno).unwrap().unwrap();

    assert_eq!(loaded, stored);
    assert!(repo.exists_by_id(stored.mno).unwrap());
}

#[test]
fn find_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    assert_eq!(repo.find_by_id(100).unwrap(), None);
    assert!(!repo.exists_by_id(100).unwrap());
}

#[test]
fn update_text_changes_only_target_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let target = repo.insert("before").unwrap();
    let other = repo.insert("untouched").unwrap();

    assert_eq!(repo.update_text(target.mno, "update Text").unwrap(), 1);

    let loaded = repo.find_by_id(target.mno).unwrap().unwrap();
    assert_eq!(loaded.mno, target.mno);
    assert_eq!(loaded.memo_text, "update Text");
    assert_eq!(repo.find_by_id(other.mno).unwrap().unwrap(), other);
}

#[test]
fn update_memo_uses_the_memo_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let stored = repo.insert("before").unwrap();
    let changed = Memo::with_id(stored.mno, "after").unwrap();

    assert_eq!(repo.update_memo(&changed).unwrap(), 1);
    assert_eq!(repo.find_by_id(stored.mno).unwrap().unwrap(), changed);
}

#[test]
fn update_and_delete_on_missing_id_affect_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();
    repo.insert("only").unwrap();

    assert_eq!(repo.update_text(999, "nobody").unwrap(), 0);
    assert_eq!(repo.delete_by_id(999).unwrap(), 0);
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn invalid_text_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let err = repo.insert("   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemoValidationError::BlankText)
    ));

    let stored = repo.insert("valid").unwrap();
    let err = repo.update_text(stored.mno, &"x".repeat(201)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(MemoValidationError::TextTooLong { chars: 201, .. })
    ));
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn save_inserts_then_replaces_by_explicit_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let memo = Memo::with_id(100, "created with id").unwrap();
    repo.save(&memo).unwrap();
    assert_eq!(repo.find_by_id(100).unwrap().unwrap(), memo);

    let replaced = Memo::with_id(100, "update Text").unwrap();
    repo.save(&replaced).unwrap();
    assert_eq!(repo.find_by_id(100).unwrap().unwrap(), replaced);
    assert_eq!(repo.count().unwrap(), 1);

    let next = repo.insert("after explicit id").unwrap();
    assert!(next.mno > 100);
}

#[test]
fn delete_where_id_less_than_removes_exactly_lower_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();
    for index in 1..=30 {
        repo.insert(&format!("memo {index}")).unwrap();
    }

    let deleted = repo.delete_where_id_less_than(25).unwrap();

    assert_eq!(deleted, 24);
    let remaining: Vec<_> = repo
        .list_all_desc()
        .unwrap()
        .into_iter()
        .map(|memo| memo.mno)
        .collect();
    assert_eq!(remaining, vec![30, 29, 28, 27, 26, 25]);
    assert_eq!(repo.delete_where_id_less_than(25).unwrap(), 0);
}

#[test]
fn list_between_desc_is_inclusive_and_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();
    for index in 1..=100 {
        repo.insert(&format!("memo sample..{index}")).unwrap();
    }

    let ids: Vec<_> = repo
        .list_between_desc(70, 80)
        .unwrap()
        .into_iter()
        .map(|memo| memo.mno)
        .collect();

    assert_eq!(ids, (70..=80).rev().collect::<Vec<_>>());
    assert!(repo.list_between_desc(80, 70).unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let service = MemoService::new(SqliteMemoRepository::try_new(&conn).unwrap());

    let samples = service.register_samples(5).unwrap();
    assert_eq!(samples.len(), 5);
    assert_eq!(samples[4].memo_text, "memo sample..5");

    let created = service.write("from service").unwrap();
    assert_eq!(service.read(created.mno).unwrap().unwrap(), created);

    assert!(service.rename(created.mno, "renamed").unwrap());
    assert!(!service.rename(created.mno + 1, "missing").unwrap());
    assert!(service.remove(created.mno).unwrap());
    assert!(!service.remove(created.mno).unwrap());

    assert_eq!(service.purge_before(samples[2].mno).unwrap(), 2);
    assert_eq!(service.repo().count().unwrap(), 3);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteMemoRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_memo_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMemoRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("memo"))));
}

#[test]
fn repository_rejects_memo_table_missing_text_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE memo (mno INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteMemoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "memo",
            column: "memo_text"
        })
    ));
}

#[test]
fn invalid_persisted_row_surfaces_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO memo (mno, memo_text) VALUES (5, '   ');", [])
        .unwrap();
    let repo = SqliteMemoRepository::try_new(&conn).unwrap();

    let err = repo.find_by_id(5).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
