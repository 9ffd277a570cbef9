//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use herald_error::{DatabaseError, DatabaseErrorKind};

/// Establish a connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable to determine the connection string.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub fn establish_connection() -> Result<PgConnection, DatabaseError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    Ok(PgConnection::establish(&database_url)?)
}
