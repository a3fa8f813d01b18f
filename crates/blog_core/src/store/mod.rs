//! Document store contract over the `users`, `blogs` and `posts` collections.
//!
//! # Responsibility
//! - Define the `insert` / `find` / `find_one` surface used by services.
//! - Keep storage details (SQL, in-memory vectors) behind one trait so
//!   services can run against either backend.
//!
//! # Invariants
//! - Filters may only name fields declared by the target document schema.
//! - `find` returns documents in insertion order.
//! - Fields declared `unique` are never duplicated within a collection.

use crate::db::DbError;
use crate::model::id::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod documents;
pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Named collection holding one kind of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Blogs,
    Posts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Users, Self::Blogs, Self::Posts];

    /// Collection name, also used as the SQLite table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Blogs => "blogs",
            Self::Posts => "posts",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Store-layer error for persistence, filtering and decoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A stored record could not be decoded into its document type.
    InvalidData(String),
    UnknownField {
        collection: Collection,
        field: String,
    },
    /// A filter condition does not fit the field type.
    InvalidFilter(String),
    /// Insert would duplicate a field declared unique.
    UniqueViolation {
        collection: Collection,
        field: String,
    },
    /// Any other constraint the backend refused (e.g. a dangling reference).
    ConstraintViolation {
        collection: Collection,
        message: String,
    },
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::UnknownField { collection, field } => {
                write!(f, "unknown field `{field}` for collection `{collection}`")
            }
            Self::InvalidFilter(message) => write!(f, "invalid filter: {message}"),
            Self::UniqueViolation { collection, field } => {
                write!(f, "duplicate value for unique field `{collection}.{field}`")
            }
            Self::ConstraintViolation {
                collection,
                message,
            } => write!(f, "constraint violation in `{collection}`: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Scalar type of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

/// Schema entry for one document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub unique: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            unique: false,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            unique: false,
        }
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }
}

/// Stored scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<EntityId> for FieldValue {
    fn from(value: EntityId) -> Self {
        Self::Text(value.to_hex())
    }
}

/// Flat, ordered field list for one stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn text(&self, name: &str) -> StoreResult<String> {
        match self.get(name) {
            Some(FieldValue::Text(value)) => Ok(value.clone()),
            Some(FieldValue::Integer(_)) => Err(StoreError::InvalidData(format!(
                "field `{name}` holds an integer, expected text"
            ))),
            None => Err(StoreError::InvalidData(format!("missing field `{name}`"))),
        }
    }

    pub fn integer(&self, name: &str) -> StoreResult<i64> {
        match self.get(name) {
            Some(FieldValue::Integer(value)) => Ok(*value),
            Some(FieldValue::Text(_)) => Err(StoreError::InvalidData(format!(
                "field `{name}` holds text, expected an integer"
            ))),
            None => Err(StoreError::InvalidData(format!("missing field `{name}`"))),
        }
    }

    pub fn id(&self, name: &str) -> StoreResult<EntityId> {
        let raw = self.text(name)?;
        EntityId::parse(&raw)
            .map_err(|err| StoreError::InvalidData(format!("field `{name}`: {err}")))
    }
}

/// Typed record that lives in one collection.
pub trait Document: Sized {
    const COLLECTION: Collection;
    /// Declared fields, in storage column order.
    const FIELDS: &'static [FieldSpec];

    fn to_record(&self) -> Record;
    /// Decodes and re-validates a stored record.
    fn from_record(record: &Record) -> StoreResult<Self>;
}

/// One predicate inside a [`Filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Field equals value.
    Equals(&'static str, FieldValue),
    /// Text field contains `term` as a literal substring, ignoring case.
    Contains(&'static str, String),
}

impl Condition {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Equals(field, _) | Self::Contains(field, _) => *field,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        match (self, record.get(self.field())) {
            (Self::Equals(_, expected), Some(actual)) => actual == expected,
            (Self::Contains(_, term), Some(FieldValue::Text(text))) => {
                contains_ignoring_case(text, term)
            }
            _ => false,
        }
    }
}

/// Literal substring test under Unicode lowercase mapping.
fn contains_ignoring_case(text: &str, term: &str) -> bool {
    text.to_lowercase().contains(&term.to_lowercase())
}

/// Conjunction of field conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Equals(field, value.into()));
        self
    }

    pub fn contains(mut self, field: &'static str, term: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains(field, term.into()));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|condition| condition.matches(record))
    }

    /// Rejects fields outside `D`'s schema and kind mismatches.
    pub fn check_against<D: Document>(&self) -> StoreResult<()> {
        for condition in &self.conditions {
            let spec = field_spec::<D>(condition.field())?;
            match condition {
                Condition::Equals(field, value) if value.kind() != spec.kind => {
                    return Err(StoreError::InvalidFilter(format!(
                        "`{field}` is {:?} but was compared with {:?}",
                        spec.kind,
                        value.kind()
                    )));
                }
                Condition::Contains(field, _) if spec.kind != FieldKind::Text => {
                    return Err(StoreError::InvalidFilter(format!(
                        "substring match on non-text field `{field}`"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn field_spec<D: Document>(name: &str) -> StoreResult<&'static FieldSpec> {
    D::FIELDS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| StoreError::UnknownField {
            collection: D::COLLECTION,
            field: name.to_string(),
        })
}

/// Persistence surface shared by all services.
///
/// No transactions: each call stands alone.
pub trait Store {
    fn insert<D: Document>(&self, document: &D) -> StoreResult<()>;
    fn find<D: Document>(&self, filter: &Filter) -> StoreResult<Vec<D>>;

    fn find_one<D: Document>(&self, filter: &Filter) -> StoreResult<Option<D>> {
        Ok(self.find::<D>(filter)?.into_iter().next())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn insert<D: Document>(&self, document: &D) -> StoreResult<()> {
        (**self).insert(document)
    }

    fn find<D: Document>(&self, filter: &Filter) -> StoreResult<Vec<D>> {
        (**self).find(filter)
    }

    fn find_one<D: Document>(&self, filter: &Filter) -> StoreResult<Option<D>> {
        (**self).find_one(filter)
    }
}
