use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::database::DatabaseManager;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    categories: Vec<String>,
}

/// Load category fixtures. Existing names are left alone, so the command
/// is safe to re-run.
pub async fn handle(path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture file {}", path.display()))?;
    let seed: SeedFile = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse fixture file {}", path.display()))?;

    let pool = DatabaseManager::pool().await?;
    let mut inserted = 0u64;
    for name in &seed.categories {
        let result = sqlx::query(
            "INSERT INTO categories (name) SELECT $1 WHERE NOT EXISTS (SELECT 1 FROM categories WHERE name = $1)",
        )
        .bind(name)
        .execute(&pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!(
        "Seeded {} of {} categories from {}",
        inserted,
        seed.categories.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixture_yaml() {
        let seed: SeedFile = serde_yaml::from_str(
            "categories:\n  - General\n  - Cafe Culture\n  - Gear\n",
        )
        .unwrap();
        assert_eq!(seed.categories.len(), 3);
        assert_eq!(seed.categories[1], "Cafe Culture");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed: SeedFile = serde_yaml::from_str("{}").unwrap();
        assert!(seed.categories.is_empty());
    }
}
