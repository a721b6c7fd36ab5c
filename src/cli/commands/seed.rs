use crate::database::DatabaseManager;

/// Default rank bands; idempotent, existing names are left untouched
const RANKS: &[(&str, i64, i64)] = &[
    ("Novice", 0, 99),
    ("Adventurer", 100, 249),
    ("Veteran", 250, 499),
    ("Elite", 500, 999),
    ("Master", 1000, 1999),
    ("Legend", 2000, 1_000_000),
];

pub async fn handle() -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    for &(name, min_xp, max_xp) in RANKS {
        sqlx::query(
            r#"
            INSERT INTO ranks (name, min_xp, max_xp)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(min_xp)
        .bind(max_xp)
        .execute(pool)
        .await?;
    }

    println!("Seeded {} rank bands", RANKS.len());
    Ok(())
}
