//! Repository for the `portfolios` table.

use sqlx::PgPool;

use crate::models::portfolio::PortfolioRow;

const COLUMNS: &str = "id, title, description, slug, is_active, sort_order, \
     collections, created_at, updated_at";

pub struct PortfolioRepo;

impl PortfolioRepo {
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PortfolioRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM portfolios WHERE slug = $1");
        sqlx::query_as::<_, PortfolioRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Active portfolios in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<PortfolioRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portfolios \
             WHERE is_active = TRUE \
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, PortfolioRow>(&query)
            .fetch_all(pool)
            .await
    }
}
