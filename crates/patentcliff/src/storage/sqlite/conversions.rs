//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without a repository.

use chrono::{DateTime, Utc};
use patentcliff_core::auth::{Role, User, UserCredentials};
use patentcliff_core::drugs::{Drug, DrugSummary, ExpiringPatent, Patent, Product};
use rusqlite::Row;

// ============================================================================
// Drug conversions
// ============================================================================

/// Convert a SQLite row to a Drug.
///
/// Expected columns: id, app_no, brand_name, generic_name, app_type
pub fn row_to_drug(row: &Row) -> rusqlite::Result<Drug> {
    Ok(Drug {
        id: row.get(0)?,
        app_no: row.get(1)?,
        brand_name: row.get(2)?,
        generic_name: row.get(3)?,
        app_type: row.get(4)?,
    })
}

/// Expected columns: id, app_no, product_no, strength, route, approval_date
pub fn row_to_product(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        app_no: row.get(1)?,
        product_no: row.get(2)?,
        strength: row.get(3)?,
        route: row.get(4)?,
        approval_date: row.get(5)?,
    })
}

/// Convert a SQLite row to a Patent.
///
/// Expected columns: id, app_no, product_no, patent_number, patent_expiry_date, days_until_expiry
pub fn row_to_patent(row: &Row) -> rusqlite::Result<Patent> {
    let product_no: String = row.get(2)?;

    Ok(Patent {
        id: row.get(0)?,
        app_no: row.get(1)?,
        product_no: product_no_from_column(product_no),
        patent_number: row.get(3)?,
        patent_expiry_date: row.get(4)?,
        days_until_expiry: row.get(5)?,
    })
}

/// Convert an aggregate row to a DrugSummary.
///
/// Expected columns: app_no, brand_name, generic_name, app_type, product_count,
/// patent_count, earliest_expiry, latest_expiry, min_days_until_expiry
pub fn row_to_summary(row: &Row) -> rusqlite::Result<DrugSummary> {
    Ok(DrugSummary {
        app_no: row.get(0)?,
        brand_name: row.get(1)?,
        generic_name: row.get(2)?,
        app_type: row.get(3)?,
        product_count: row.get(4)?,
        patent_count: row.get(5)?,
        earliest_expiry: row.get(6)?,
        latest_expiry: row.get(7)?,
        min_days_until_expiry: row.get(8)?,
    })
}

/// Expected columns: app_no, brand_name, generic_name, product_no, patent_number,
/// patent_expiry_date, days_until_expiry
pub fn row_to_expiring(row: &Row) -> rusqlite::Result<ExpiringPatent> {
    let product_no: String = row.get(3)?;

    Ok(ExpiringPatent {
        app_no: row.get(0)?,
        brand_name: row.get(1)?,
        generic_name: row.get(2)?,
        product_no: product_no_from_column(product_no),
        patent_number: row.get(4)?,
        patent_expiry_date: row.get(5)?,
        days_until_expiry: row.get(6)?,
    })
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, email, name, role, created_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role: parse_role(&role)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Expected columns: id, email, name, role, created_at, password_hash
pub fn row_to_credentials(row: &Row) -> rusqlite::Result<UserCredentials> {
    Ok(UserCredentials {
        user: row_to_user(row)?,
        password_hash: row.get(5)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// The patents table stores `''` for patents without a product.
fn product_no_from_column(product_no: String) -> Option<String> {
    Some(product_no).filter(|p| !p.is_empty())
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_role(s: &str) -> rusqlite::Result<Role> {
    s.parse::<Role>().map_err(|msg| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
        )
    })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn query<T>(sql: &str, f: impl FnOnce(&Row) -> rusqlite::Result<T>) -> rusqlite::Result<T> {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(sql, [], f)
    }

    #[test]
    fn test_row_to_patent_empty_product_is_none() {
        let patent = query(
            "SELECT 7, 'N1', '', '1234567', '2030-01-01', 42",
            row_to_patent,
        )
        .unwrap();

        assert_eq!(patent.id, 7);
        assert_eq!(patent.product_no, None);
        assert_eq!(patent.days_until_expiry, Some(42));
    }

    #[test]
    fn test_row_to_patent_keeps_product_and_null_days() {
        let patent = query(
            "SELECT 1, 'N1', '002', '1234567', NULL, NULL",
            row_to_patent,
        )
        .unwrap();

        assert_eq!(patent.product_no.as_deref(), Some("002"));
        assert_eq!(patent.patent_expiry_date, None);
        assert_eq!(patent.days_until_expiry, None);
    }

    #[test]
    fn test_row_to_summary() {
        let summary = query(
            "SELECT 'N1', 'ALPHA', 'alphazine', 'N', 2, 3, '2026-01-01', '2031-01-01', -4",
            row_to_summary,
        )
        .unwrap();

        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.patent_count, 3);
        assert_eq!(summary.min_days_until_expiry, Some(-4));
    }

    #[test]
    fn test_row_to_user() {
        let user = query(
            "SELECT 3, 'ada@example.com', 'Ada', 'admin', '2024-06-15T10:30:00+00:00'",
            row_to_user,
        )
        .unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.role, Role::Admin);
        assert_eq!(format_datetime(&user.created_at), "2024-06-15T10:30:00+00:00");
    }

    #[test]
    fn test_row_to_user_rejects_unknown_role() {
        let result = query(
            "SELECT 3, 'ada@example.com', 'Ada', 'root', '2024-06-15T10:30:00+00:00'",
            row_to_user,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_row_to_credentials() {
        let creds = query(
            "SELECT 1, 'ada@example.com', 'Ada', 'user', '2024-06-15T10:30:00Z', '$argon2id$hash'",
            row_to_credentials,
        )
        .unwrap();

        assert_eq!(creds.user.email, "ada@example.com");
        assert_eq!(creds.password_hash, "$argon2id$hash");
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-datetime").is_err());
    }
}
