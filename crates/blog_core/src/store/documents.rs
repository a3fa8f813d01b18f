//! Document schemas for the three blog collections.

use super::{Collection, Document, FieldSpec, Record, StoreError, StoreResult};
use crate::model::blog::Blog;
use crate::model::post::Post;
use crate::model::user::User;
use crate::model::ModelValidationError;

fn invalid(collection: Collection, err: ModelValidationError) -> StoreError {
    StoreError::InvalidData(format!("{collection}: {err}"))
}

impl Document for User {
    const COLLECTION: Collection = Collection::Users;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("id").unique(),
        FieldSpec::text("email").unique(),
        FieldSpec::text("password_hash"),
    ];

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("email", self.email.as_str())
            .with("password_hash", self.password_hash.as_str())
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let user = Self {
            id: record.id("id")?,
            email: record.text("email")?,
            password_hash: record.text("password_hash")?,
        };
        user.validate()
            .map_err(|err| invalid(Self::COLLECTION, err))?;
        Ok(user)
    }
}

impl Document for Blog {
    const COLLECTION: Collection = Collection::Blogs;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("id").unique(),
        FieldSpec::text("author_id"),
        FieldSpec::text("author"),
        FieldSpec::text("title"),
        FieldSpec::text("description"),
    ];

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("author_id", self.author_id)
            .with("author", self.author.as_str())
            .with("title", self.title.as_str())
            .with("description", self.description.as_str())
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let blog = Self {
            id: record.id("id")?,
            author_id: record.id("author_id")?,
            author: record.text("author")?,
            title: record.text("title")?,
            description: record.text("description")?,
        };
        blog.validate()
            .map_err(|err| invalid(Self::COLLECTION, err))?;
        Ok(blog)
    }
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("id").unique(),
        FieldSpec::text("blog_id"),
        FieldSpec::text("title"),
        FieldSpec::text("content"),
        FieldSpec::text("author"),
        FieldSpec::integer("created_date"),
    ];

    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("blog_id", self.blog_id)
            .with("title", self.title.as_str())
            .with("content", self.content.as_str())
            .with("author", self.author.as_str())
            .with("created_date", self.created_date)
    }

    fn from_record(record: &Record) -> StoreResult<Self> {
        let post = Self {
            id: record.id("id")?,
            blog_id: record.id("blog_id")?,
            title: record.text("title")?,
            content: record.text("content")?,
            author: record.text("author")?,
            created_date: record.integer("created_date")?,
        };
        post.validate()
            .map_err(|err| invalid(Self::COLLECTION, err))?;
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::blog::Blog;
    use crate::model::id::EntityId;
    use crate::store::{Document, FieldValue, Record, StoreError};

    #[test]
    fn records_follow_declared_field_order() {
        let blog = Blog::new("a@b.com", "T", "D", EntityId::new()).unwrap();
        let names: Vec<_> = blog.to_record().fields().map(|(name, _)| name).collect();
        let declared: Vec<_> = Blog::FIELDS.iter().map(|spec| spec.name).collect();
        assert_eq!(names, declared);
    }

    #[test]
    fn decoding_rechecks_model_invariants() {
        let record = Record::new()
            .with("id", EntityId::new())
            .with("author_id", EntityId::new())
            .with("author", "a@b.com")
            .with("title", "")
            .with("description", "D");

        let err = Blog::from_record(&record).unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(message) if message.contains("title")));
    }

    #[test]
    fn ids_are_stored_as_hex_text() {
        let id = EntityId::new();
        assert_eq!(FieldValue::from(id), FieldValue::Text(id.to_hex()));
    }
}
