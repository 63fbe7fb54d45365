use shelfmark_core::db::open_db_in_memory;
use shelfmark_core::{LibraryError, LocationService, SqliteLocationRepository};
use rusqlite::Connection;

fn location_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn seeding_twice_keeps_exactly_n_slots() {
    let conn = open_db_in_memory().unwrap();
    let service = LocationService::new(SqliteLocationRepository::try_new(&conn).unwrap());

    assert_eq!(service.seed_range(45).unwrap(), 45);
    assert_eq!(service.seed_range(45).unwrap(), 0);
    assert_eq!(service.seed_range(10).unwrap(), 0);
    assert_eq!(location_rows(&conn), 45);

    let locations = service.list_locations().unwrap();
    assert_eq!(locations[0].name, "Compartment 1");
    assert_eq!(locations[44].name, "Compartment 45");
    assert_eq!(locations[0].description, "Auto-created slot 1");
}

#[test]
fn seeding_skips_existing_slots_in_any_case() {
    let conn = open_db_in_memory().unwrap();
    let service = LocationService::new(SqliteLocationRepository::try_new(&conn).unwrap());

    service
        .add_location("compartment 2", "Reference shelf")
        .unwrap();
    assert_eq!(service.seed_range(3).unwrap(), 2);

    let slot = service.get_location("COMPARTMENT 2").unwrap().unwrap();
    assert_eq!(slot.name, "compartment 2");
    assert_eq!(slot.description, "Reference shelf");
    assert_eq!(location_rows(&conn), 3);
}

#[test]
fn seeding_larger_range_extends_existing_range() {
    let conn = open_db_in_memory().unwrap();
    let service = LocationService::new(SqliteLocationRepository::try_new(&conn).unwrap());

    service.seed_range(5).unwrap();
    assert_eq!(service.seed_range(8).unwrap(), 3);
    assert_eq!(location_rows(&conn), 8);
}

#[test]
fn add_location_rejects_case_insensitive_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let service = LocationService::new(SqliteLocationRepository::try_new(&conn).unwrap());

    service.add_location("Reading Room", "").unwrap();
    let err = service.add_location("READING ROOM", "again").unwrap_err();
    assert!(matches!(err, LibraryError::DuplicateLocation(ref name) if name == "READING ROOM"));
    assert_eq!(location_rows(&conn), 1);
}

#[test]
fn list_locations_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let service = LocationService::new(SqliteLocationRepository::try_new(&conn).unwrap());

    service.add_location("Zeta", "").unwrap();
    service.add_location("Alpha", "").unwrap();
    service.seed_range(1).unwrap();

    let names: Vec<String> = service
        .list_locations()
        .unwrap()
        .into_iter()
        .map(|location| location.name)
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Compartment 1"]);
}
