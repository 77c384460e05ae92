use anyhow::Result;

use crate::config;
use crate::services::notification_service::NotificationService;

/// Retention for the ever-growing notifications table. Run from cron; the
/// server itself never schedules anything.
pub async fn handle(days: Option<i64>) -> Result<()> {
    let days = days.unwrap_or(config::config().notifications.retention_days);
    let service = NotificationService::new().await?;
    let removed = service.prune_read_older_than(days).await?;
    println!(
        "Pruned {} read notifications older than {} days",
        removed, days
    );
    Ok(())
}
