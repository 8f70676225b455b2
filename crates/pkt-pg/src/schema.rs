/// Schema metadata for PostgreSQL tables.
///
/// Purely describes table structure; no I/O happens here. All methods
/// return `&'static str` so DDL can be assembled at compile time via
/// [`const_format::concatcp!`]. Actual statements run through [`create`].
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

/// Creates one entity's table and indices if absent.
pub async fn create<S>(client: &tokio_postgres::Client) -> Result<(), crate::PgErr>
where
    S: Schema,
{
    log::debug!("[schema] ensuring table {}", S::name());
    client.batch_execute(S::creates()).await?;
    client.batch_execute(S::indices()).await?;
    Ok(())
}
