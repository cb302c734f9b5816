use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement, Value};

use crate::infrastructure::persistence::error::DbError;

pub type Row = Vec<Value>;

/// `($1, $2), ($3, $4)` for `rows` rows of `width` columns
fn placeholders(width: usize, rows: usize) -> String {
    (0..rows)
        .map(|r| {
            let cols: Vec<String> = (1..=width).map(|c| format!("${}", r * width + c)).collect();
            format!("({})", cols.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run `query` once per chunk of `rows`, with `@values` replaced by the chunk's
/// placeholders. Returns the number of affected rows.
pub async fn bulk_import(
    conn: &DatabaseConnection,
    query: &str,
    rows: Vec<Row>,
    chunk_size: usize,
) -> Result<u64, DbError> {
    if !query.contains("@values") {
        return Err(DbError::Other(format!(
            "bulk query has no @values reference: {}",
            query
        )));
    }

    let mut affected = 0u64;
    for chunk in rows.chunks(chunk_size.max(1)) {
        let width = chunk[0].len();
        let sql = query.replace("@values", &placeholders(width, chunk.len()));
        let values: Vec<Value> = chunk.iter().flat_map(|row| row.iter().cloned()).collect();

        let result = conn
            .execute(Statement::from_sql_and_values(DbBackend::Postgres, &sql, values))
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        affected += result.rows_affected();
    }

    Ok(affected)
}

/// Execute a statement with positional values
pub async fn exec(
    conn: &DatabaseConnection,
    sql: &str,
    values: Vec<Value>,
) -> Result<u64, DbError> {
    let result = conn
        .execute(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(result.rows_affected())
}
