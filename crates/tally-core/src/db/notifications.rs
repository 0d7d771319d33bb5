//! Notification operations

use rusqlite::{params, Connection, Row};

use super::{parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{NewNotification, Notification};

fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
    let notification_type: String = row.get(1)?;
    let priority: String = row.get(4)?;
    let created_at: String = row.get(8)?;
    Ok(Notification {
        id: row.get(0)?,
        notification_type: parse_enum(&notification_type, 1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        priority: parse_enum(&priority, 4)?,
        related_id: row.get(5)?,
        action_url: row.get(6)?,
        read: row.get(7)?,
        created_at: parse_datetime(&created_at),
    })
}

/// Insert on an existing connection so callers can share a transaction
pub(crate) fn insert_notification(conn: &Connection, notification: &NewNotification) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO notifications (notification_type, title, message, priority, related_id, action_url)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        params![
            notification.notification_type.as_str(),
            notification.title,
            notification.message,
            notification.priority.as_str(),
            notification.related_id,
            notification.action_url
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Store a notification
    pub fn create_notification(&self, notification: &NewNotification) -> Result<i64> {
        let conn = self.conn()?;
        insert_notification(&conn, notification)
    }

    /// List notifications, newest first. Unread only unless `include_read`.
    pub fn list_notifications(&self, include_read: bool, limit: i64) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, notification_type, title, message, priority, related_id, action_url, read, created_at
            FROM notifications
            WHERE read = 0 OR ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let notifications = stmt
            .query_map(params![include_read, limit], row_to_notification)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notifications)
    }

    pub fn mark_notification_read(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute("UPDATE notifications SET read = 1 WHERE id = ?", params![id])?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    /// Mark everything read, returning how many changed
    pub fn mark_all_notifications_read(&self) -> Result<usize> {
        let conn = self.conn()?;
        let updated = conn.execute("UPDATE notifications SET read = 1 WHERE read = 0", [])?;
        Ok(updated)
    }

    pub fn delete_notification(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM notifications WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Notification {} not found", id)));
        }
        Ok(())
    }

    pub fn count_unread_notifications(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE read = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
