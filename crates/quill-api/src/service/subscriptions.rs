use tracing::{info, warn};

use quill_db::{Database, StorageError};

use crate::error::{DomainError, Resource};
use crate::validation::{validate_id, validate_subscription};

/// Subscribe `subscriber_id` to `author_id`. Self-subscription is rejected
/// before anything else, whether or not the user exists.
pub fn create_subscription(
    db: &Database,
    subscriber_id: i64,
    author_id: i64,
) -> Result<(), DomainError> {
    validate_subscription(subscriber_id, author_id)?;
    validate_id(subscriber_id)?;
    validate_id(author_id)?;

    db.get_user_by_id(author_id).map_err(|e| match e {
        StorageError::RowsNotFound => {
            warn!("Subscription to missing author {}", author_id);
            DomainError::NotFound(Resource::User)
        }
        other => DomainError::from_storage(other, Resource::User),
    })?;

    // The author may vanish between the lookup and the insert.
    db.create_subscription(subscriber_id, author_id)
        .map_err(|e| match e {
            StorageError::ForeignKeyViolation => DomainError::NotFound(Resource::User),
            other => DomainError::from_storage(other, Resource::Subscription),
        })?;

    info!("User {} subscribed to {}", subscriber_id, author_id);
    Ok(())
}

pub fn list_subscriptions(db: &Database, subscriber_id: i64) -> Result<Vec<i64>, DomainError> {
    validate_id(subscriber_id)?;

    db.list_subscriptions(subscriber_id)
        .map_err(|e| DomainError::from_storage(e, Resource::Subscription))
}

pub fn delete_subscription(
    db: &Database,
    subscriber_id: i64,
    author_id: i64,
) -> Result<(), DomainError> {
    validate_id(subscriber_id)?;
    validate_id(author_id)?;

    db.delete_subscription(subscriber_id, author_id)
        .map_err(|e| DomainError::from_storage(e, Resource::Subscription))?;

    info!("User {} unsubscribed from {}", subscriber_id, author_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::service::test_support;

    #[test]
    fn self_subscription_fails_even_for_unknown_users() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");

        for id in [alice.id, 9_999, 0, -3] {
            assert_eq!(
                create_subscription(&state.db, id, id).unwrap_err(),
                DomainError::Validation(ValidationError::SelfSubscription)
            );
        }
    }

    #[test]
    fn subscribe_list_unsubscribe() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");
        let bob = test_support::identity(&state, "bob@x.com");

        create_subscription(&state.db, alice.id, bob.id).unwrap();
        create_subscription(&state.db, alice.id, bob.id).unwrap();
        assert_eq!(list_subscriptions(&state.db, alice.id).unwrap(), vec![bob.id]);
        assert!(list_subscriptions(&state.db, bob.id).unwrap().is_empty());

        delete_subscription(&state.db, alice.id, bob.id).unwrap();
        assert_eq!(
            delete_subscription(&state.db, alice.id, bob.id).unwrap_err(),
            DomainError::NotFound(Resource::Subscription)
        );
    }

    #[test]
    fn unknown_author_is_user_not_found() {
        let state = test_support::state();
        let alice = test_support::identity(&state, "alice@x.com");

        assert_eq!(
            create_subscription(&state.db, alice.id, alice.id + 50).unwrap_err(),
            DomainError::NotFound(Resource::User)
        );
        assert_eq!(
            create_subscription(&state.db, alice.id, 0).unwrap_err(),
            DomainError::Validation(ValidationError::InvalidId)
        );
    }
}
