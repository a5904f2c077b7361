use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub time_minutes: i64,
    pub price: Decimal,
    pub link: Option<String>,
}

/// Fields for a new recipe; the owner and id are supplied elsewhere.
#[derive(Debug)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub time_minutes: i64,
    pub price: Decimal,
    pub link: Option<String>,
}

// SQLite has no decimal type; price is stored as TEXT and parsed on the way
// out.
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    time_minutes: i64,
    price: String,
    link: Option<String>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = anyhow::Error;

    fn try_from(row: RecipeRow) -> anyhow::Result<Self> {
        let price = Decimal::from_str(&row.price)
            .with_context(|| format!("stored price {:?} is not a decimal", row.price))?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            time_minutes: row.time_minutes,
            price,
            link: row.link,
        })
    }
}

const RECIPE_COLUMNS: &str = "id, user_id, title, description, time_minutes, price, link";

/// All recipes owned by `user_id`, most recently created first.
pub async fn list_by_user(db: &SqlitePool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = ? ORDER BY id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    rows.into_iter().map(Recipe::try_from).collect()
}

pub async fn create(db: &SqlitePool, user_id: Uuid, fields: NewRecipe) -> anyhow::Result<Recipe> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        "INSERT INTO recipes (user_id, title, description, time_minutes, price, link, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) \
         RETURNING {RECIPE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.time_minutes)
    .bind(fields.price.to_string())
    .bind(&fields.link)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await?;
    row.try_into()
}

/// Fetch a recipe through its owner's identity. A recipe owned by someone
/// else is indistinguishable from a missing one.
pub async fn get_for_user(
    db: &SqlitePool,
    user_id: Uuid,
    id: i64,
) -> anyhow::Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    row.map(Recipe::try_from).transpose()
}

/// Apply `changes` on top of the stored recipe, re-checking ownership. The
/// owner is never changed.
pub async fn update_for_user(
    db: &SqlitePool,
    user_id: Uuid,
    id: i64,
    changes: RecipeChanges,
) -> anyhow::Result<Option<Recipe>> {
    let Some(current) = get_for_user(db, user_id, id).await? else {
        return Ok(None);
    };

    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        "UPDATE recipes \
         SET title = ?, description = ?, time_minutes = ?, price = ?, link = ? \
         WHERE id = ? AND user_id = ? \
         RETURNING {RECIPE_COLUMNS}"
    ))
    .bind(changes.title.unwrap_or(current.title))
    .bind(changes.description.or(current.description))
    .bind(changes.time_minutes.unwrap_or(current.time_minutes))
    .bind(changes.price.unwrap_or(current.price).to_string())
    .bind(changes.link.or(current.link))
    .bind(id)
    .bind(user_id)
    .fetch_one(db)
    .await?;
    Ok(Some(row.try_into()?))
}

/// Delete if owned; `false` means the recipe was missing or not theirs.
pub async fn delete_for_user(db: &SqlitePool, user_id: Uuid, id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(Debug, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
}
