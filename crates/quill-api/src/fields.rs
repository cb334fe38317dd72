//! `?fields=` projection for post listings.
//!
//! Pure presentation over already-fetched posts; the field list is parsed
//! before the database is touched so a bad filter costs no I/O.

use std::str::FromStr;

use chrono::SecondsFormat;
use serde_json::{Map, Value};

use quill_types::models::Post;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Id,
    Title,
    Content,
    OwnerId,
    CreatedAt,
}

impl PostField {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Content => "content",
            Self::OwnerId => "owner_id",
            Self::CreatedAt => "created_at",
        }
    }

    fn value_of(self, post: &Post) -> Value {
        match self {
            Self::Id => Value::from(post.id),
            Self::Title => Value::from(post.title.clone()),
            Self::Content => Value::from(post.content.clone()),
            Self::OwnerId => Value::from(post.owner_id),
            Self::CreatedAt => {
                Value::from(post.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl FromStr for PostField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            "owner_id" => Ok(Self::OwnerId),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(ValidationError::UnknownField),
        }
    }
}

/// Parse a comma separated field list. Blank entries are skipped; a list that
/// is blank overall, or names any unknown field, is rejected.
pub fn parse_fields(raw: &str) -> Result<Vec<PostField>, ValidationError> {
    let fields = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(PostField::from_str)
        .collect::<Result<Vec<PostField>, _>>()?;

    if fields.is_empty() {
        return Err(ValidationError::UnknownField);
    }
    Ok(fields)
}

pub fn project(posts: &[Post], fields: &[PostField]) -> Vec<Map<String, Value>> {
    posts
        .iter()
        .map(|post| {
            fields
                .iter()
                .map(|field| (field.name().to_string(), field.value_of(post)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Post {
        Post {
            id: 3,
            title: "hello".into(),
            content: "world".into(),
            owner_id: 9,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn parses_known_fields() {
        assert_eq!(
            parse_fields("id, title,,created_at").unwrap(),
            vec![PostField::Id, PostField::Title, PostField::CreatedAt]
        );
    }

    #[test]
    fn rejects_unknown_or_blank() {
        assert_eq!(parse_fields("id,password"), Err(ValidationError::UnknownField));
        assert_eq!(parse_fields(" , "), Err(ValidationError::UnknownField));
    }

    #[test]
    fn projects_only_requested_fields() {
        let out = project(&[sample()], &[PostField::Id, PostField::CreatedAt]);
        assert_eq!(out.len(), 1);
        let row = &out[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row["id"], Value::from(3));
        assert_eq!(row["created_at"], Value::from("2024-05-01T12:00:00Z"));
        assert!(!row.contains_key("content"));
    }
}
