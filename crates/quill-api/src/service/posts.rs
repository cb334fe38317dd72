use tracing::info;

use quill_db::{Database, models::PostRow};
use quill_types::models::{Identity, Post};

use crate::error::{DomainError, Resource};
use crate::service::parse_timestamp;
use crate::validation::{validate_content, validate_id, validate_title};

fn post_from_row(row: PostRow) -> Post {
    Post {
        id: row.id,
        title: row.title,
        content: row.content,
        owner_id: row.owner_id,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn create_post(
    db: &Database,
    owner: &Identity,
    title: &str,
    content: &str,
) -> Result<Post, DomainError> {
    validate_title(title)?;
    validate_content(content)?;

    // owner_id comes from a resolved identity, so a foreign key failure here
    // is an internal fault rather than a missing user.
    let row = db
        .create_post(title, content, owner.id)
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;

    info!("User {} created post {}", owner.id, row.id);
    Ok(post_from_row(row))
}

pub fn get_post(db: &Database, id: i64) -> Result<Post, DomainError> {
    validate_id(id)?;

    let row = db
        .get_post(id)
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;
    Ok(post_from_row(row))
}

pub fn list_posts(db: &Database) -> Result<Vec<Post>, DomainError> {
    let rows = db
        .list_posts()
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;
    Ok(rows.into_iter().map(post_from_row).collect())
}

/// Only the owner may update. A post owned by someone else is reported as
/// missing so its existence is not revealed.
pub fn update_post(
    db: &Database,
    owner: &Identity,
    id: i64,
    title: &str,
    content: &str,
) -> Result<Post, DomainError> {
    validate_id(id)?;
    validate_title(title)?;
    validate_content(content)?;

    let row = db
        .update_post(id, owner.id, title, content)
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;

    info!("User {} updated post {}", owner.id, id);
    Ok(post_from_row(row))
}

pub fn delete_post(db: &Database, owner: &Identity, id: i64) -> Result<(), DomainError> {
    validate_id(id)?;

    db.delete_post(id, owner.id)
        .map_err(|e| DomainError::from_storage(e, Resource::Post))?;

    info!("User {} deleted post {}", owner.id, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::service::test_support;

    #[test]
    fn create_sets_owner_from_identity() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");

        let post = create_post(&state.db, &alice, "Hello", "First post").unwrap();
        assert_eq!(post.owner_id, alice.id);
        assert_eq!(get_post(&state.db, post.id).unwrap().title, "Hello");
    }

    #[test]
    fn create_validates_fields() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");

        assert_eq!(
            create_post(&state.db, &alice, "", "body").unwrap_err(),
            DomainError::Validation(ValidationError::EmptyTitle)
        );
        assert_eq!(
            create_post(&state.db, &alice, &"t".repeat(101), "body").unwrap_err(),
            DomainError::Validation(ValidationError::TitleTooLong)
        );
        assert_eq!(
            create_post(&state.db, &alice, "title", "").unwrap_err(),
            DomainError::Validation(ValidationError::EmptyContent)
        );
        assert!(list_posts(&state.db).unwrap().is_empty());
    }

    #[test]
    fn non_owner_sees_not_found_like_missing_post() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");
        let bob = test_support::identity(&state, "bob@x.com");
        let post = create_post(&state.db, &alice, "Mine", "Hands off").unwrap();
        let missing = post.id + 1000;

        let foreign_update = update_post(&state.db, &bob, post.id, "Stolen", "x").unwrap_err();
        let missing_update = update_post(&state.db, &bob, missing, "Stolen", "x").unwrap_err();
        assert_eq!(foreign_update, missing_update);
        assert_eq!(foreign_update, DomainError::NotFound(Resource::Post));

        let foreign_delete = delete_post(&state.db, &bob, post.id).unwrap_err();
        let missing_delete = delete_post(&state.db, &bob, missing).unwrap_err();
        assert_eq!(foreign_delete, missing_delete);

        let unchanged = get_post(&state.db, post.id).unwrap();
        assert_eq!(unchanged.title, "Mine");
    }

    #[test]
    fn owner_can_update_and_delete() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");
        let post = create_post(&state.db, &alice, "Draft", "v1").unwrap();

        let updated = update_post(&state.db, &alice, post.id, "Final", "v2").unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "v2");

        delete_post(&state.db, &alice, post.id).unwrap();
        assert_eq!(
            get_post(&state.db, post.id).unwrap_err(),
            DomainError::NotFound(Resource::Post)
        );
    }

    #[test]
    fn invalid_id_is_rejected_before_lookup() {
        let state = test_support::state();
        assert_eq!(
            get_post(&state.db, 0).unwrap_err(),
            DomainError::Validation(ValidationError::InvalidId)
        );
    }

    #[test]
    fn list_is_newest_first() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");
        let first = create_post(&state.db, &alice, "one", "a").unwrap();
        let second = create_post(&state.db, &alice, "two", "b").unwrap();

        let ids: Vec<i64> = list_posts(&state.db).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
