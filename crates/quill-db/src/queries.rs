use rusqlite::{Connection, Row, params};

use crate::models::{CommentRow, PostRow, UserRow};
use crate::{Database, StorageError};

const USER_COLUMNS: &str = "id, email, password_hash, created_at";
const POST_COLUMNS: &str = "id, title, content, owner_id, created_at";
const COMMENT_COLUMNS: &str = "id, post_id, content, owner_id, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRow, StorageError> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO users (email, password_hash) VALUES (?1, ?2) RETURNING {USER_COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![email, password_hash], user_row)?)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<UserRow, StorageError> {
        self.with_conn(|conn| query_user(conn, "email = ?1", email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<UserRow, StorageError> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    // -- Posts --

    pub fn create_post(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
    ) -> Result<PostRow, StorageError> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO posts (title, content, owner_id) VALUES (?1, ?2, ?3) RETURNING {POST_COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![title, content, owner_id], post_row)?)
        })
    }

    pub fn get_post(&self, id: i64) -> Result<PostRow, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1");
            Ok(conn.query_row(&sql, [id], post_row)?)
        })
    }

    pub fn list_posts(&self) -> Result<Vec<PostRow>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], post_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Overwrite title and content of a post owned by `owner_id`.
    /// A missing post and a post owned by someone else both yield `RowsNotFound`.
    pub fn update_post(
        &self,
        id: i64,
        owner_id: i64,
        title: &str,
        content: &str,
    ) -> Result<PostRow, StorageError> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "UPDATE posts SET title = ?1, content = ?2
                 WHERE id = ?3 AND owner_id = ?4
                 RETURNING {POST_COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![title, content, id, owner_id], post_row)?)
        })
    }

    pub fn delete_post(&self, id: i64, owner_id: i64) -> Result<(), StorageError> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute(
                "DELETE FROM posts WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )?;
            expect_affected(affected)
        })
    }

    // -- Comments --

    pub fn create_comment(
        &self,
        post_id: i64,
        content: &str,
        owner_id: i64,
    ) -> Result<CommentRow, StorageError> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "INSERT INTO comments (post_id, content, owner_id) VALUES (?1, ?2, ?3) RETURNING {COMMENT_COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![post_id, content, owner_id], comment_row)?)
        })
    }

    pub fn list_comments(&self, post_id: i64) -> Result<Vec<CommentRow>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ?1 ORDER BY created_at DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([post_id], comment_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_comment(
        &self,
        post_id: i64,
        id: i64,
        owner_id: i64,
        content: &str,
    ) -> Result<CommentRow, StorageError> {
        self.with_conn_mut(|conn| {
            let sql = format!(
                "UPDATE comments SET content = ?1
                 WHERE id = ?2 AND post_id = ?3 AND owner_id = ?4
                 RETURNING {COMMENT_COLUMNS}"
            );
            Ok(conn.query_row(&sql, params![content, id, post_id, owner_id], comment_row)?)
        })
    }

    pub fn delete_comment(&self, post_id: i64, id: i64, owner_id: i64) -> Result<(), StorageError> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute(
                "DELETE FROM comments WHERE id = ?1 AND post_id = ?2 AND owner_id = ?3",
                params![id, post_id, owner_id],
            )?;
            expect_affected(affected)
        })
    }

    // -- Subscriptions --

    /// Idempotent: subscribing twice to the same author is not an error.
    pub fn create_subscription(&self, subscriber_id: i64, author_id: i64) -> Result<(), StorageError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO subscriptions (subscriber_id, author_id) VALUES (?1, ?2)
                 ON CONFLICT (subscriber_id, author_id) DO NOTHING",
                params![subscriber_id, author_id],
            )?;
            Ok(())
        })
    }

    pub fn list_subscriptions(&self, subscriber_id: i64) -> Result<Vec<i64>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT author_id FROM subscriptions WHERE subscriber_id = ?1 ORDER BY author_id",
            )?;
            let ids = stmt
                .query_map([subscriber_id], |row| row.get(0))?
                .collect::<Result<Vec<i64>, _>>()?;
            Ok(ids)
        })
    }

    pub fn delete_subscription(&self, subscriber_id: i64, author_id: i64) -> Result<(), StorageError> {
        self.with_conn_mut(|conn| {
            let affected = conn.execute(
                "DELETE FROM subscriptions WHERE subscriber_id = ?1 AND author_id = ?2",
                params![subscriber_id, author_id],
            )?;
            expect_affected(affected)
        })
    }
}

fn query_user<P: rusqlite::ToSql>(
    conn: &Connection,
    predicate: &str,
    value: P,
) -> Result<UserRow, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate}");
    Ok(conn.query_row(&sql, [value], user_row)?)
}

/// Zero affected rows is the only ownership signal a conditional mutation gives.
fn expect_affected(affected: usize) -> Result<(), StorageError> {
    if affected == 0 {
        return Err(StorageError::RowsNotFound);
    }
    Ok(())
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn post_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn comment_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        content: row.get(2)?,
        owner_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_user(email: &str) -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user(email, "hash").unwrap();
        (db, user.id)
    }

    #[test]
    fn duplicate_email_is_unique_violation() {
        let (db, _) = db_with_user("a@x.com");
        let err = db.create_user("a@x.com", "other").unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation));
    }

    #[test]
    fn missing_user_is_rows_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_user_by_id(42), Err(StorageError::RowsNotFound)));
        assert!(matches!(
            db.get_user_by_email("nobody@x.com"),
            Err(StorageError::RowsNotFound)
        ));
    }

    #[test]
    fn comment_on_missing_post_is_foreign_key_violation() {
        let (db, uid) = db_with_user("a@x.com");
        let err = db.create_comment(999, "hello", uid).unwrap_err();
        assert!(matches!(err, StorageError::ForeignKeyViolation));
    }

    #[test]
    fn update_and_delete_require_owner() {
        let (db, owner) = db_with_user("a@x.com");
        let other = db.create_user("b@x.com", "hash").unwrap().id;
        let post = db.create_post("title", "body", owner).unwrap();

        assert!(matches!(
            db.update_post(post.id, other, "t", "c"),
            Err(StorageError::RowsNotFound)
        ));
        assert!(matches!(db.delete_post(post.id, other), Err(StorageError::RowsNotFound)));

        let updated = db.update_post(post.id, owner, "new", "text").unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.owner_id, owner);

        db.delete_post(post.id, owner).unwrap();
        assert!(matches!(db.get_post(post.id), Err(StorageError::RowsNotFound)));
    }

    #[test]
    fn deleting_post_cascades_to_comments() {
        let (db, uid) = db_with_user("a@x.com");
        let post = db.create_post("title", "body", uid).unwrap();
        db.create_comment(post.id, "first", uid).unwrap();
        db.create_comment(post.id, "second", uid).unwrap();
        assert_eq!(db.list_comments(post.id).unwrap().len(), 2);

        db.delete_post(post.id, uid).unwrap();
        assert!(db.list_comments(post.id).unwrap().is_empty());
    }

    #[test]
    fn comment_mutation_is_scoped_to_its_post() {
        let (db, uid) = db_with_user("a@x.com");
        let first = db.create_post("one", "body", uid).unwrap();
        let second = db.create_post("two", "body", uid).unwrap();
        let comment = db.create_comment(first.id, "hi", uid).unwrap();

        assert!(matches!(
            db.update_comment(second.id, comment.id, uid, "moved"),
            Err(StorageError::RowsNotFound)
        ));
        assert!(matches!(
            db.delete_comment(second.id, comment.id, uid),
            Err(StorageError::RowsNotFound)
        ));
        db.delete_comment(first.id, comment.id, uid).unwrap();
    }

    #[test]
    fn subscriptions_are_idempotent_and_deletable() {
        let (db, reader) = db_with_user("reader@x.com");
        let author = db.create_user("author@x.com", "hash").unwrap().id;

        db.create_subscription(reader, author).unwrap();
        db.create_subscription(reader, author).unwrap();
        assert_eq!(db.list_subscriptions(reader).unwrap(), vec![author]);

        db.delete_subscription(reader, author).unwrap();
        assert!(matches!(
            db.delete_subscription(reader, author),
            Err(StorageError::RowsNotFound)
        ));
    }

    #[test]
    fn subscription_to_missing_author_is_foreign_key_violation() {
        let (db, reader) = db_with_user("reader@x.com");
        let err = db.create_subscription(reader, 777).unwrap_err();
        assert!(matches!(err, StorageError::ForeignKeyViolation));
    }
}
