/// Row types for the `raw_games` table. Used by sqlx for typed queries.

#[derive(Debug, sqlx::FromRow)]
pub struct RawGameRow {
    pub id: i64,
    pub sport: String,
    /// One provider record as a JSON object.
    pub payload: String,
}
