use chrono::NaiveDate;
use shelfmark_core::db::{open_db, open_db_in_memory};
use shelfmark_core::{
    CatalogService, CirculationService, CopyId, CopyStatus, FixedClock, InventoryService,
    LibraryConfig, LibraryError, MemberId, MemberService, OpenLoanOrder, SqliteCirculationRepository,
    SqliteCopyRepository, SqliteMemberRepository, SqliteTitleRepository, TitleDraft,
    ValidationError,
};
use rusqlite::Connection;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ledger(conn: &Connection, today: NaiveDate) -> CirculationService<SqliteCirculationRepository<'_>, FixedClock> {
    CirculationService::new(
        SqliteCirculationRepository::try_new(conn).unwrap(),
        FixedClock(today),
        &LibraryConfig::default(),
    )
}

fn add_copy(conn: &Connection, title: &str, accession: &str) -> CopyId {
    let catalog = CatalogService::new(SqliteTitleRepository::try_new(conn).unwrap());
    let title_id = match catalog.find_title_by_name(title).unwrap() {
        Some(existing) => existing.uuid,
        None => {
            catalog
                .add_title(&TitleDraft::new(title, "Author", "Genre", None))
                .unwrap()
                .uuid
        }
    };
    let inventory = InventoryService::new(SqliteCopyRepository::try_new(conn).unwrap());
    inventory.add_copy(title_id, accession, None).unwrap().uuid
}

fn add_member(conn: &Connection, name: &str) -> MemberId {
    let members = MemberService::new(SqliteMemberRepository::try_new(conn).unwrap());
    members.add_member(name, "").unwrap().uuid
}

fn copy_status(conn: &Connection, copy_id: CopyId) -> CopyStatus {
    let inventory = InventoryService::new(SqliteCopyRepository::try_new(conn).unwrap());
    inventory.get_copy(copy_id).unwrap().unwrap().copy.status
}

fn open_entries_for(conn: &Connection, copy_id: CopyId) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM circulation_entries WHERE copy_uuid = ?1 AND return_date IS NULL;",
        [copy_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn issue_then_return_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");

    let issued = ledger(&conn, date(2026, 3, 1)).issue(copy, ada, None).unwrap();
    assert_eq!(issued.issue_date, date(2026, 3, 1));
    assert_eq!(issued.due_date, Some(date(2026, 3, 15)));
    assert!(issued.is_open());
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);

    let returned = ledger(&conn, date(2026, 3, 10))
        .return_entry(issued.uuid)
        .unwrap();
    assert_eq!(returned.return_date, Some(date(2026, 3, 10)));
    assert_eq!(copy_status(&conn, copy), CopyStatus::Available);

    let stored = ledger(&conn, date(2026, 3, 10))
        .get_entry(issued.uuid)
        .unwrap()
        .unwrap();
    assert_eq!(stored, returned);

    let err = ledger(&conn, date(2026, 3, 11))
        .return_entry(issued.uuid)
        .unwrap_err();
    assert!(matches!(err, LibraryError::AlreadyReturned(id) if id == issued.uuid));
    assert_eq!(
        ledger(&conn, date(2026, 3, 11))
            .get_entry(issued.uuid)
            .unwrap()
            .unwrap()
            .return_date,
        Some(date(2026, 3, 10))
    );
}

#[test]
fn second_issue_of_same_copy_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let bob = add_member(&conn, "Bob");
    let service = ledger(&conn, date(2026, 3, 1));

    service.issue(copy, ada, None).unwrap();
    let err = service.issue(copy, bob, None).unwrap_err();

    assert!(matches!(err, LibraryError::CopyNotAvailable(id) if id == copy));
    assert_eq!(open_entries_for(&conn, copy), 1);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);
}

#[test]
fn issue_reports_unknown_copy_and_member() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let service = ledger(&conn, date(2026, 3, 1));

    let missing_copy = Uuid::new_v4();
    let err = service.issue(missing_copy, ada, None).unwrap_err();
    assert!(matches!(err, LibraryError::UnknownCopy(id) if id == missing_copy));

    let missing_member = Uuid::new_v4();
    let err = service.issue(copy, missing_member, None).unwrap_err();
    assert!(matches!(err, LibraryError::UnknownMember(id) if id == missing_member));

    assert_eq!(open_entries_for(&conn, copy), 0);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Available);
}

#[test]
fn issue_rejects_due_date_before_today() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let service = ledger(&conn, date(2026, 3, 10));

    let err = service
        .issue(copy, ada, Some(date(2026, 3, 9)))
        .unwrap_err();
    assert!(matches!(
        err,
        LibraryError::InvalidInput(ValidationError::DueBeforeIssue { .. })
    ));

    let entry = service.issue(copy, ada, Some(date(2026, 3, 10))).unwrap();
    assert_eq!(entry.due_date, Some(date(2026, 3, 10)));
}

#[test]
fn loan_period_comes_from_config() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let config = LibraryConfig {
        loan_period_days: 7,
        ..LibraryConfig::default()
    };
    let service = CirculationService::new(
        SqliteCirculationRepository::try_new(&conn).unwrap(),
        FixedClock(date(2026, 12, 28)),
        &config,
    );

    let entry = service.issue(copy, ada, None).unwrap();
    assert_eq!(entry.due_date, Some(date(2027, 1, 4)));
}

#[test]
fn return_of_unknown_entry_fails() {
    let conn = open_db_in_memory().unwrap();
    let missing = Uuid::new_v4();

    let err = ledger(&conn, date(2026, 3, 1))
        .return_entry(missing)
        .unwrap_err();
    assert!(matches!(err, LibraryError::UnknownEntry(id) if id == missing));
}

#[test]
fn returned_copy_can_be_issued_again_and_history_is_kept() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let bob = add_member(&conn, "Bob");

    let first = ledger(&conn, date(2026, 3, 1)).issue(copy, ada, None).unwrap();
    ledger(&conn, date(2026, 3, 5)).return_entry(first.uuid).unwrap();
    let second = ledger(&conn, date(2026, 3, 6)).issue(copy, bob, None).unwrap();

    let history = ledger(&conn, date(2026, 3, 6)).history(copy).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].uuid, second.uuid);
    assert_eq!(history[1].uuid, first.uuid);
    assert_eq!(history[1].return_date, Some(date(2026, 3, 5)));
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);
}

#[test]
fn list_open_joins_display_data_and_orders() {
    let conn = open_db_in_memory().unwrap();
    let dune = add_copy(&conn, "Dune", "A1");
    let emma = add_copy(&conn, "Emma", "E1");
    let spare = add_copy(&conn, "Foundation", "F1");
    let ada = add_member(&conn, "Ada");
    let bob = add_member(&conn, "Bob");

    ledger(&conn, date(2026, 3, 1))
        .issue(dune, ada, Some(date(2026, 3, 20)))
        .unwrap();
    ledger(&conn, date(2026, 3, 3))
        .issue(emma, bob, Some(date(2026, 3, 8)))
        .unwrap();
    let closed = ledger(&conn, date(2026, 3, 4)).issue(spare, bob, None).unwrap();
    ledger(&conn, date(2026, 3, 5)).return_entry(closed.uuid).unwrap();

    let service = ledger(&conn, date(2026, 3, 10));
    let recent = service.list_open(OpenLoanOrder::RecentFirst).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].title_name, "Emma");
    assert_eq!(recent[0].member_name, "Bob");
    assert_eq!(recent[0].accession_code, "E1");
    assert!(recent[0].overdue);
    assert_eq!(recent[1].title_name, "Dune");
    assert!(!recent[1].overdue);

    let oldest = service.list_open(OpenLoanOrder::OldestFirst).unwrap();
    assert_eq!(oldest[0].title_name, "Dune");

    let due = service.list_open(OpenLoanOrder::DueSoonest).unwrap();
    assert_eq!(due[0].title_name, "Emma");
}

#[test]
fn return_closes_only_the_named_entry_when_duplicates_exist() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let first = ledger(&conn, date(2026, 3, 1)).issue(copy, ada, None).unwrap();

    // Simulate a pre-existing inconsistency the unique index would normally prevent.
    conn.execute_batch("DROP INDEX uq_circulation_entries_open_copy;")
        .unwrap();
    let sibling = Uuid::new_v4();
    conn.execute(
        "INSERT INTO circulation_entries (uuid, copy_uuid, member_uuid, issue_date)
         VALUES (?1, ?2, ?3, '2026-03-02');",
        [sibling.to_string(), copy.to_string(), ada.to_string()],
    )
    .unwrap();

    ledger(&conn, date(2026, 3, 5)).return_entry(first.uuid).unwrap();

    let sibling_entry = ledger(&conn, date(2026, 3, 5))
        .get_entry(sibling)
        .unwrap()
        .unwrap();
    assert!(sibling_entry.is_open());
    assert_eq!(open_entries_for(&conn, copy), 1);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);

    ledger(&conn, date(2026, 3, 6)).return_entry(sibling).unwrap();
    assert_eq!(copy_status(&conn, copy), CopyStatus::Available);
}

fn freeze_copy_status(conn: &Connection) {
    conn.execute_batch(
        "CREATE TRIGGER freeze_copy_status BEFORE UPDATE OF status ON copies
         BEGIN
             SELECT RAISE(ABORT, 'status frozen');
         END;",
    )
    .unwrap();
}

fn entry_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM circulation_entries;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn issue_storage_failure_leaves_no_entry_behind() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    freeze_copy_status(&conn);

    let err = ledger(&conn, date(2026, 3, 1))
        .issue(copy, ada, None)
        .unwrap_err();

    assert!(matches!(err, LibraryError::StorageFailure(_)));
    assert!(conn.is_autocommit());
    assert_eq!(entry_count(&conn), 0);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Available);
}

#[test]
fn return_storage_failure_keeps_entry_open() {
    let conn = open_db_in_memory().unwrap();
    let copy = add_copy(&conn, "Dune", "A1");
    let ada = add_member(&conn, "Ada");
    let entry = ledger(&conn, date(2026, 3, 1)).issue(copy, ada, None).unwrap();
    freeze_copy_status(&conn);

    let err = ledger(&conn, date(2026, 3, 8))
        .return_entry(entry.uuid)
        .unwrap_err();

    assert!(matches!(err, LibraryError::StorageFailure(_)));
    assert!(conn.is_autocommit());
    assert_eq!(entry_count(&conn), 1);
    assert_eq!(open_entries_for(&conn, copy), 1);
    let stored = ledger(&conn, date(2026, 3, 8))
        .get_entry(entry.uuid)
        .unwrap()
        .unwrap();
    assert_eq!(stored.return_date, None);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);
}

#[test]
fn concurrent_issues_of_one_copy_yield_exactly_one_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    let (copy, members) = {
        let conn = open_db(&path).unwrap();
        let copy = add_copy(&conn, "Dune", "A1");
        let members = vec![add_member(&conn, "Ada"), add_member(&conn, "Bob")];
        (copy, members)
    };

    let barrier = Arc::new(Barrier::new(members.len()));
    let handles: Vec<_> = members
        .into_iter()
        .map(|member| {
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let service = ledger(&conn, date(2026, 3, 1));
                barrier.wait();
                match service.issue(copy, member, None) {
                    Ok(_) => "issued",
                    Err(LibraryError::CopyNotAvailable(_)) => "not_available",
                    Err(other) => panic!("unexpected error: {other}"),
                }
            })
        })
        .collect();

    let mut outcomes: Vec<&str> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    outcomes.sort_unstable();
    assert_eq!(outcomes, vec!["issued", "not_available"]);

    let conn = open_db(&path).unwrap();
    assert_eq!(open_entries_for(&conn, copy), 1);
    assert_eq!(copy_status(&conn, copy), CopyStatus::Issued);
}
