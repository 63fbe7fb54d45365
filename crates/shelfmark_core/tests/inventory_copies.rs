use shelfmark_core::db::open_db_in_memory;
use shelfmark_core::{
    CatalogService, CopyFilter, CopyStatus, InventoryService, LibraryError, SqliteCopyRepository,
    SqliteTitleRepository, TitleDraft, TitleId,
};
use rusqlite::Connection;
use uuid::Uuid;

fn add_title(conn: &Connection, name: &str) -> TitleId {
    let catalog = CatalogService::new(SqliteTitleRepository::try_new(conn).unwrap());
    catalog
        .add_title(&TitleDraft::new(name, "Author", "Genre", None))
        .unwrap()
        .uuid
}

#[test]
fn add_copy_starts_available_under_title() {
    let conn = open_db_in_memory().unwrap();
    let dune = add_title(&conn, "Dune");
    let service = InventoryService::new(SqliteCopyRepository::try_new(&conn).unwrap());

    let copy = service
        .add_copy(dune, " A1 ", Some("Compartment 3"))
        .unwrap();
    assert_eq!(copy.status, CopyStatus::Available);
    assert_eq!(copy.accession_code, "A1");

    let listing = service.get_copy(copy.uuid).unwrap().unwrap();
    assert_eq!(listing.title_name, "Dune");
    assert_eq!(listing.copy, copy);
}

#[test]
fn add_copy_for_unknown_title_fails_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteCopyRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    let err = service.add_copy(missing, "A1", None).unwrap_err();
    assert!(matches!(err, LibraryError::UnknownTitle(id) if id == missing));

    let copies: i64 = conn
        .query_row("SELECT COUNT(*) FROM copies;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(copies, 0);
}

#[test]
fn accession_codes_are_not_unique() {
    let conn = open_db_in_memory().unwrap();
    let dune = add_title(&conn, "Dune");
    let service = InventoryService::new(SqliteCopyRepository::try_new(&conn).unwrap());

    service.add_copy(dune, "A1", None).unwrap();
    service.add_copy(dune, "A1", None).unwrap();
    assert_eq!(service.list_copies(&CopyFilter::default()).unwrap().len(), 2);
}

#[test]
fn list_copies_orders_by_title_and_filters() {
    let conn = open_db_in_memory().unwrap();
    let foundation = add_title(&conn, "Foundation");
    let dune = add_title(&conn, "Dune");
    let service = InventoryService::new(SqliteCopyRepository::try_new(&conn).unwrap());

    service
        .add_copy(foundation, "F1", Some("Compartment 7"))
        .unwrap();
    service.add_copy(dune, "D2", Some("Compartment 3")).unwrap();
    service.add_copy(dune, "D1", None).unwrap();

    let all = service.list_copies(&CopyFilter::default()).unwrap();
    let codes: Vec<&str> = all
        .iter()
        .map(|listing| listing.copy.accession_code.as_str())
        .collect();
    assert_eq!(codes, vec!["D1", "D2", "F1"]);

    let by_location = service
        .list_copies(&CopyFilter {
            text: Some("compartment 7".to_string()),
            status: None,
        })
        .unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].title_name, "Foundation");

    let issued = service
        .list_copies(&CopyFilter {
            text: None,
            status: Some(CopyStatus::Issued),
        })
        .unwrap();
    assert!(issued.is_empty());
}

#[test]
fn set_location_moves_copy_and_rejects_unknown_copy() {
    let conn = open_db_in_memory().unwrap();
    let dune = add_title(&conn, "Dune");
    let service = InventoryService::new(SqliteCopyRepository::try_new(&conn).unwrap());
    let copy = service.add_copy(dune, "A1", Some("Compartment 3")).unwrap();

    service.set_location(copy.uuid, Some("Compartment 9")).unwrap();
    let moved = service.get_copy(copy.uuid).unwrap().unwrap();
    assert_eq!(moved.copy.current_location.as_deref(), Some("Compartment 9"));

    service.set_location(copy.uuid, Some("  ")).unwrap();
    let cleared = service.get_copy(copy.uuid).unwrap().unwrap();
    assert_eq!(cleared.copy.current_location, None);

    let missing = Uuid::new_v4();
    let err = service.set_location(missing, Some("Compartment 1")).unwrap_err();
    assert!(matches!(err, LibraryError::UnknownCopy(id) if id == missing));
}
