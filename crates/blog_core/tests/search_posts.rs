use blog_core::db::open_db_in_memory;
use blog_core::{
    hash_password, search_posts, Blog, BlogService, HighlightMarker, MemoryStore, SearchError,
    SearchQuery, Session, SqliteStore, Store, User, UserService,
};

struct Fixture<S: Store> {
    users: UserService<S>,
    blogs: BlogService<S>,
}

impl<S: Store + Clone> Fixture<S> {
    fn new(store: S) -> Self {
        Self {
            users: UserService::new(store.clone()),
            blogs: BlogService::new(store),
        }
    }

    fn user_with_blog(&self, email: &str) -> (User, Blog) {
        let user = self
            .users
            .register_user(email, &hash_password("password1"), &mut Session::anonymous())
            .unwrap();
        let blog = self
            .blogs
            .create_blog(&user.email, "T", "D", user.id)
            .unwrap();
        (user, blog)
    }
}

fn assert_hello_query_finds_lowercase_post<S: Store + Clone>(store: S) {
    let fixture = Fixture::new(store.clone());
    let (user, blog) = fixture.user_with_blog("a@b.com");
    fixture
        .blogs
        .create_post(blog.id, "P1", "hello world", &user.email)
        .unwrap();

    let hits = search_posts(&store, &user.email, &SearchQuery::new("Hello")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "<mark>hello</mark> world");
    assert_eq!(hits[0].title, "P1");
}

#[test]
fn capitalized_term_matches_lowercase_content_in_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    assert_hello_query_finds_lowercase_post(store);
}

#[test]
fn capitalized_term_matches_lowercase_content_in_memory() {
    let store = MemoryStore::new();
    assert_hello_query_finds_lowercase_post(&store);
}

#[test]
fn every_casing_of_a_term_is_found_and_highlighted() {
    let store = MemoryStore::new();
    let fixture = Fixture::new(&store);
    let (user, blog) = fixture.user_with_blog("a@b.com");
    fixture
        .blogs
        .create_post(blog.id, "hello", "say hello and HELLO", &user.email)
        .unwrap();

    for text in ["Hello", "hello", "HELLO"] {
        let hits = search_posts(&store, &user.email, &SearchQuery::new(text)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "<mark>hello</mark>");
        assert_eq!(
            hits[0].content,
            "say <mark>hello</mark> and <mark>HELLO</mark>"
        );
    }
}

#[test]
fn post_matching_title_and_content_appears_once() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let fixture = Fixture::new(store);
    let (user, blog) = fixture.user_with_blog("a@b.com");
    fixture
        .blogs
        .create_post(blog.id, "rust notes", "rust is fun", &user.email)
        .unwrap();

    let hits = search_posts(&store, &user.email, &SearchQuery::new("rust fun")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "<mark>rust</mark> notes");
    assert_eq!(hits[0].content, "<mark>rust</mark> is <mark>fun</mark>");
}

#[test]
fn results_keep_first_seen_order() {
    let store = MemoryStore::new();
    let fixture = Fixture::new(&store);
    let (user, blog) = fixture.user_with_blog("a@b.com");
    let by_content = fixture
        .blogs
        .create_post(blog.id, "first", "mentions apple", &user.email)
        .unwrap();
    let by_title = fixture
        .blogs
        .create_post(blog.id, "apple pie", "recipe", &user.email)
        .unwrap();

    let hits = search_posts(&store, &user.email, &SearchQuery::new("apple")).unwrap();
    let ids: Vec<_> = hits.iter().map(|post| post.id).collect();
    // Title matches are collected before content matches.
    assert_eq!(ids, vec![by_title.id, by_content.id]);
}

#[test]
fn search_is_scoped_to_author() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let fixture = Fixture::new(store);
    let (alice, alice_blog) = fixture.user_with_blog("alice@b.com");
    let (bob, bob_blog) = fixture.user_with_blog("bob@b.com");
    fixture
        .blogs
        .create_post(alice_blog.id, "A", "shared word", &alice.email)
        .unwrap();
    fixture
        .blogs
        .create_post(bob_blog.id, "B", "shared word", &bob.email)
        .unwrap();

    let hits = search_posts(&store, &alice.email, &SearchQuery::new("shared")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author, alice.email);
}

#[test]
fn empty_and_blank_queries_are_invalid() {
    let store = MemoryStore::new();
    for text in ["", "   \t"] {
        let err = search_posts(&store, "a@b.com", &SearchQuery::new(text)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery { .. }));
    }
}

#[test]
fn stored_posts_are_not_modified_by_highlighting() {
    let store = MemoryStore::new();
    let fixture = Fixture::new(&store);
    let (user, blog) = fixture.user_with_blog("a@b.com");
    fixture
        .blogs
        .create_post(blog.id, "P", "hello world", &user.email)
        .unwrap();

    search_posts(&store, &user.email, &SearchQuery::new("hello")).unwrap();
    let stored = fixture.blogs.list_posts(&blog).unwrap();
    assert_eq!(stored[0].content, "hello world");
}

#[test]
fn custom_marker_and_regex_characters() {
    let store = MemoryStore::new();
    let fixture = Fixture::new(&store);
    let (user, blog) = fixture.user_with_blog("a@b.com");
    fixture
        .blogs
        .create_post(blog.id, "P", "price is $5 (approx)", &user.email)
        .unwrap();

    let query = SearchQuery::new("$5 (approx)").with_marker(HighlightMarker::new("[", "]"));
    let hits = search_posts(&store, &user.email, &query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "price is [$5] [(approx)]");
}
