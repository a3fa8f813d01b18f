//! SQLite-backed document store.
//!
//! # Responsibility
//! - Map collections to tables and document fields to columns.
//! - Translate constraint failures into semantic store errors.
//!
//! # Invariants
//! - Only connections bootstrapped through `db::open_db*` are accepted.
//! - Column and table names come from document schemas, never from callers;
//!   all values are bound as parameters.

use super::{
    Collection, Condition, Document, FieldKind, FieldValue, Filter, Record, Store, StoreError,
    StoreResult,
};
use crate::db::migrations::{current_version, latest_version};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension, Row};

const UNIQUE_FAILURE_PREFIX: &str = "UNIQUE constraint failed: ";

/// Store over a migrated SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when a collection table is absent.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore<'_> {
    fn insert<D: Document>(&self, document: &D) -> StoreResult<()> {
        let record = document.to_record();
        let columns = record.fields().map(|(name, _)| name).collect::<Vec<_>>();
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            D::COLLECTION.name(),
            columns.join(", "),
            placeholders.join(", ")
        );

        self.conn
            .execute(
                &sql,
                params_from_iter(record.fields().map(|(_, value)| to_sql_value(value))),
            )
            .map_err(|err| map_insert_error(err, D::COLLECTION))?;

        debug!(
            "event=store_insert module=store status=ok collection={}",
            D::COLLECTION
        );
        Ok(())
    }

    fn find<D: Document>(&self, filter: &Filter) -> StoreResult<Vec<D>> {
        self.select(filter, None)
    }

    fn find_one<D: Document>(&self, filter: &Filter) -> StoreResult<Option<D>> {
        Ok(self.select(filter, Some(1))?.into_iter().next())
    }
}

impl SqliteStore<'_> {
    fn select<D: Document>(&self, filter: &Filter, limit: Option<u32>) -> StoreResult<Vec<D>> {
        filter.check_against::<D>()?;

        let columns = D::FIELDS
            .iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {columns} FROM {} WHERE 1 = 1", D::COLLECTION.name());
        let mut bind_values: Vec<Value> = Vec::new();
        let mut scans_text = false;

        for condition in filter.conditions() {
            match condition {
                Condition::Equals(field, value) => {
                    sql.push_str(&format!(" AND {field} = ?"));
                    bind_values.push(to_sql_value(value));
                }
                // SQLite's lower() folds ASCII only; substring terms are
                // checked on decoded rows instead.
                Condition::Contains(..) => scans_text = true,
            }
        }

        sql.push_str(" ORDER BY rowid ASC");
        if let (Some(limit), false) = (limit, scans_text) {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let record = read_record::<D>(row)?;
            if scans_text && !filter.matches(&record) {
                continue;
            }
            documents.push(D::from_record(&record)?);
            if limit.is_some_and(|limit| documents.len() >= limit as usize) {
                break;
            }
        }

        Ok(documents)
    }
}

fn read_record<D: Document>(row: &Row<'_>) -> StoreResult<Record> {
    let mut record = Record::new();
    for spec in D::FIELDS {
        let value = match spec.kind {
            FieldKind::Text => FieldValue::Text(row.get(spec.name)?),
            FieldKind::Integer => FieldValue::Integer(row.get(spec.name)?),
        };
        record = record.with(spec.name, value);
    }
    Ok(record)
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::Text(text.clone()),
        FieldValue::Integer(number) => Value::Integer(*number),
    }
}

fn map_insert_error(err: rusqlite::Error, collection: Collection) -> StoreError {
    let constraint_message = match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(message.clone().unwrap_or_else(|| failure.to_string()))
        }
        _ => None,
    };
    let Some(message) = constraint_message else {
        return err.into();
    };

    warn!(
        "event=store_insert module=store status=rejected collection={collection} error_code=constraint"
    );
    match unique_violation_field(&message, collection) {
        Some(field) => StoreError::UniqueViolation { collection, field },
        None => StoreError::ConstraintViolation {
            collection,
            message,
        },
    }
}

/// Extracts `email` from `UNIQUE constraint failed: users.email`.
fn unique_violation_field(message: &str, collection: Collection) -> Option<String> {
    let columns = message.strip_prefix(UNIQUE_FAILURE_PREFIX)?;
    let first = columns.split(", ").next()?;
    let field = first
        .strip_prefix(collection.name())
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(first);
    Some(field.to_string())
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for collection in Collection::ALL {
        let exists = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [collection.name()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::MissingRequiredTable(collection.name()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::unique_violation_field;
    use crate::store::Collection;

    #[test]
    fn unique_violation_field_strips_table_prefix() {
        assert_eq!(
            unique_violation_field("UNIQUE constraint failed: users.email", Collection::Users),
            Some("email".to_string())
        );
        assert_eq!(
            unique_violation_field("FOREIGN KEY constraint failed", Collection::Blogs),
            None
        );
    }
}
