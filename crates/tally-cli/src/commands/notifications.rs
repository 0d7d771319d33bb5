//! Notification command implementations

use anyhow::Result;
use tally_core::db::Database;
use tally_core::models::Priority;

const LIST_LIMIT: i64 = 50;

pub fn cmd_notifications_list(db: &Database, include_read: bool) -> Result<()> {
    let notifications = db.list_notifications(include_read, LIST_LIMIT)?;

    if notifications.is_empty() {
        println!("✅ No unread notifications.");
        return Ok(());
    }

    println!();
    println!("🔔 Notifications");
    println!("   ─────────────────────────────────────────────────────────────");

    for n in &notifications {
        let icon = match n.priority {
            Priority::Urgent => "🔴",
            Priority::High => "🟠",
            Priority::Normal => "🟡",
            Priority::Low => "⚪",
        };
        let read = if n.read { " (read)" } else { "" };
        println!("   {} [{}] {}{}", icon, n.id, n.title, read);
        println!("      {}", n.message);
        println!("      {}", n.created_at.format("%Y-%m-%d %H:%M"));
        println!();
    }

    if !include_read {
        println!("   Mark as read with: tally notifications read <ID>");
    }

    Ok(())
}

pub fn cmd_notifications_read(db: &Database, id: i64) -> Result<()> {
    db.mark_notification_read(id)?;
    println!("✅ Marked notification {} as read", id);
    Ok(())
}

pub fn cmd_notifications_read_all(db: &Database) -> Result<usize> {
    let marked = db.mark_all_notifications_read()?;
    println!("✅ Marked {} notifications as read", marked);
    Ok(marked)
}
