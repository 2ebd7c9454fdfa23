use folio_core::collection::CollectionSchema;
use folio_core::schema::Portfolio;
use folio_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `portfolios` table.
#[derive(Debug, Clone, FromRow)]
pub struct PortfolioRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub collections: Json<Vec<CollectionSchema>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PortfolioRow> for Portfolio {
    fn from(row: PortfolioRow) -> Self {
        Portfolio {
            id: row.id,
            title: row.title,
            description: row.description,
            slug: row.slug,
            is_active: row.is_active,
            order: row.sort_order,
            collections: row.collections.0,
        }
    }
}
