use blog_core::db::migrations::latest_version;
use blog_core::db::open_db_in_memory;
use blog_core::{
    Blog, Collection, EntityId, Filter, Post, SqliteStore, Store, StoreError, User,
};
use rusqlite::Connection;

#[test]
fn insert_then_find_one_by_field() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let user = User::new("a@b.com", "hash").unwrap();
    store.insert(&user).unwrap();

    let loaded: Option<User> = store
        .find_one(&Filter::new().eq("email", "a@b.com"))
        .unwrap();
    assert_eq!(loaded, Some(user));

    let missing: Option<User> = store
        .find_one(&Filter::new().eq("email", "nobody@b.com"))
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn find_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = User::new("a@b.com", "hash").unwrap();
    store.insert(&user).unwrap();

    let titles = ["zeta", "alpha", "mid"];
    for title in titles {
        store
            .insert(&Blog::new("a@b.com", title, "D", user.id).unwrap())
            .unwrap();
    }

    let blogs: Vec<Blog> = store
        .find(&Filter::new().eq("author_id", user.id))
        .unwrap();
    let loaded: Vec<_> = blogs.iter().map(|blog| blog.title.as_str()).collect();
    assert_eq!(loaded, titles);
}

#[test]
fn contains_is_case_insensitive_literal_substring() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let user = User::new("a@b.com", "hash").unwrap();
    store.insert(&user).unwrap();
    let blog = Blog::new("a@b.com", "T", "D", user.id).unwrap();
    store.insert(&blog).unwrap();
    let post = blog.new_post("Greeting", "hello world", 1).unwrap();
    store.insert(&post).unwrap();

    let lower: Vec<Post> = store
        .find(&Filter::new().contains("content", "lo wor"))
        .unwrap();
    assert_eq!(lower, vec![post.clone()]);

    let upper: Vec<Post> = store
        .find(&Filter::new().contains("content", "Hello"))
        .unwrap();
    assert_eq!(upper, vec![post.clone()]);

    let first: Option<Post> = store
        .find_one(&Filter::new().contains("content", "WORLD"))
        .unwrap();
    assert_eq!(first, Some(post.clone()));

    let absent: Vec<Post> = store
        .find(&Filter::new().contains("content", "goodbye"))
        .unwrap();
    assert!(absent.is_empty());

    let percent: Vec<Post> = store
        .find(&Filter::new().contains("content", "%"))
        .unwrap();
    assert!(percent.is_empty());
}

#[test]
fn unique_email_is_enforced_by_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    store.insert(&User::new("a@b.com", "h1").unwrap()).unwrap();
    let err = store
        .insert(&User::new("a@b.com", "h2").unwrap())
        .unwrap_err();

    match err {
        StoreError::UniqueViolation { collection, field } => {
            assert_eq!(collection, Collection::Users);
            assert_eq!(field, "email");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn dangling_reference_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let orphan = Blog::new("a@b.com", "T", "D", EntityId::new()).unwrap();
    let err = store.insert(&orphan).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConstraintViolation {
            collection: Collection::Blogs,
            ..
        }
    ));
}

#[test]
fn unknown_filter_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let err = store
        .find::<Post>(&Filter::new().eq("body", "x"))
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownField { .. }));

    let err = store
        .find::<Post>(&Filter::new().contains("created_date", "1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidFilter(_)));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_posts_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (id TEXT PRIMARY KEY, email TEXT, password_hash TEXT);
         CREATE TABLE blogs (id TEXT PRIMARY KEY);",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("posts"))
    ));
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users (id, email, password_hash) VALUES ('not-hex', 'a@b.com', 'h');",
        [],
    )
    .unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let err = store.find::<User>(&Filter::new()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
