use anyhow::Result;

use crate::database::DatabaseManager;

pub async fn handle() -> Result<()> {
    DatabaseManager::migrate().await?;
    println!("Migrations applied");
    Ok(())
}
