use tracing::{info, warn};

use quill_db::{Database, StorageError, models::CommentRow};
use quill_types::models::{Comment, Identity};

use crate::error::{DomainError, Resource};
use crate::service::parse_timestamp;
use crate::validation::{validate_content, validate_id};

fn comment_from_row(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        post_id: row.post_id,
        content: row.content,
        owner_id: row.owner_id,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn create_comment(
    db: &Database,
    owner: &Identity,
    post_id: i64,
    content: &str,
) -> Result<Comment, DomainError> {
    validate_id(post_id)?;
    validate_content(content)?;

    let row = db
        .create_comment(post_id, content, owner.id)
        .map_err(|e| match e {
            StorageError::ForeignKeyViolation => {
                warn!("Comment on missing post {}", post_id);
                DomainError::NotFound(Resource::Post)
            }
            other => DomainError::from_storage(other, Resource::Comment),
        })?;

    info!("User {} commented {} on post {}", owner.id, row.id, post_id);
    Ok(comment_from_row(row))
}

/// Comments of an existing post, newest first.
pub fn list_comments(db: &Database, post_id: i64) -> Result<Vec<Comment>, DomainError> {
    validate_id(post_id)?;

    db.get_post(post_id)
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;

    let rows = db
        .list_comments(post_id)
        .map_err(|e| DomainError::from_storage(e, Resource::Comment))?;
    Ok(rows.into_iter().map(comment_from_row).collect())
}

pub fn update_comment(
    db: &Database,
    owner: &Identity,
    post_id: i64,
    comment_id: i64,
    content: &str,
) -> Result<Comment, DomainError> {
    validate_id(post_id)?;
    validate_id(comment_id)?;
    validate_content(content)?;

    let row = db
        .update_comment(post_id, comment_id, owner.id, content)
        .map_err(|e| DomainError::from_storage(e, Resource::Comment))?;

    info!("User {} updated comment {}", owner.id, comment_id);
    Ok(comment_from_row(row))
}

pub fn delete_comment(
    db: &Database,
    owner: &Identity,
    post_id: i64,
    comment_id: i64,
) -> Result<(), DomainError> {
    validate_id(post_id)?;
    validate_id(comment_id)?;

    db.delete_comment(post_id, comment_id, owner.id)
        .map_err(|e| DomainError::from_storage(e, Resource::Comment))?;

    info!("User {} deleted comment {}", owner.id, comment_id);
    Ok(())
}
