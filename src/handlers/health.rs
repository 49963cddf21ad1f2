/// Liveness probe. Does not touch the database.
pub async fn health() -> &'static str {
    "ok"
}
