use anyhow::Result;

use crate::database::DatabaseManager;

pub async fn handle() -> Result<()> {
    DatabaseManager::health_check().await?;
    println!("Database: ok");
    Ok(())
}
