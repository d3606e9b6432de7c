use punchlist_core::{with_record_service, ConnectionPool};

#[test]
fn create_returns_hydrated_record() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let record = with_record_service(&pool, |service| service.create("buy milk")).unwrap();

    assert!(record.id > 0);
    assert_eq!(record.text, "buy milk");
    assert!(!record.done);
    assert!(record.created_at_ms > 0);
}

#[test]
fn example_scenario_assigns_sequential_ids() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let first = with_record_service(&pool, |service| service.create("buy milk")).unwrap();
    let second = with_record_service(&pool, |service| service.create("walk dog")).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let listed = with_record_service(&pool, |service| service.list()).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, 2);
    assert_eq!(listed[0].text, "walk dog");
    assert_eq!(listed[1].id, 1);
    assert_eq!(listed[1].text, "buy milk");
}

#[test]
fn sequential_creates_list_newest_first() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    for text in ["a", "b", "c"] {
        with_record_service(&pool, |service| service.create(text)).unwrap();
    }

    let listed = with_record_service(&pool, |service| service.list()).unwrap();
    let texts: Vec<&str> = listed.iter().map(|record| record.text.as_str()).collect();
    assert_eq!(texts, ["c", "b", "a"]);
    assert!(listed.windows(2).all(|pair| pair[0].id > pair[1].id));
}

#[test]
fn get_by_id_returns_committed_record() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let created = with_record_service(&pool, |service| service.create("find me")).unwrap();
    let loaded = with_record_service(&pool, |service| service.get(created.id))
        .unwrap()
        .unwrap();

    assert_eq!(loaded, created);
}

#[test]
fn get_missing_record_returns_none() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let absent = with_record_service(&pool, |service| service.get(42)).unwrap();
    assert!(absent.is_none());
}

#[test]
fn list_on_empty_store_is_empty() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let listed = with_record_service(&pool, |service| service.list()).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn record_serializes_with_wire_field_names() {
    let pool = ConnectionPool::open_in_memory().unwrap();

    let record = with_record_service(&pool, |service| service.create("wire shape")).unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["id"], record.id);
    assert_eq!(json["text"], "wire shape");
    assert_eq!(json["done"], false);
    assert_eq!(json["createdAt"], record.created_at_ms);
}
