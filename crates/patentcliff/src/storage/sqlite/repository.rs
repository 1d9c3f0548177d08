//! SQLite repository implementation.
//!
//! Implements the repository traits from `patentcliff_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use tracing::warn;

use patentcliff_core::auth::{NewUser, User, UserCredentials};
use patentcliff_core::drugs::{
    DrugDetail, DrugSummary, ExpiringPatent, ImportRow, ImportSummary, PatentStatus,
};
use patentcliff_core::storage::{
    DrugRepository, ImportRepository, RepositoryError, Result, UserRepository,
};

use super::conversions::{
    format_datetime, row_to_credentials, row_to_drug, row_to_expiring, row_to_patent,
    row_to_product, row_to_summary, row_to_user,
};
use super::error::{map_import_error, map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Collects mapped rows, failing on the first conversion error.
fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> std::result::Result<Vec<T>, tokio_rusqlite::Error> {
    let mut items = Vec::new();
    for row_result in rows {
        items.push(row_result.map_err(wrap_err)?);
    }
    Ok(items)
}

/// SQLite-based repository implementation.
///
/// One connection serves drugs, imports and users.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (creating if needed) a file-based database.
    ///
    /// Enables WAL and foreign keys and creates any missing tables.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        conn.call(|conn| {
            // journal_mode answers with the mode now in effect
            conn.query_row(schema::PRAGMA_WAL, [], |row| row.get::<_, String>(0))
                .map_err(wrap_err)
        })
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMAS).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn query_summaries(
        &self,
        sql: String,
        params: Vec<String>,
    ) -> Result<Vec<DrugSummary>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), row_to_summary)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Drug"))
    }
}

// ============================================================================
// DrugRepository implementation
// ============================================================================

#[async_trait]
impl DrugRepository for SqliteRepository {
    async fn list_drugs(&self) -> Result<Vec<DrugSummary>> {
        self.query_summaries(schema::select_all_summaries(), Vec::new())
            .await
    }

    async fn search_drugs(&self, query: &str) -> Result<Vec<DrugSummary>> {
        let pattern = schema::like_contains_pattern(query);
        self.query_summaries(schema::select_summaries_by_name(), vec![pattern])
            .await
    }

    async fn expiring_within(&self, days: i64) -> Result<Vec<ExpiringPatent>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_EXPIRING_PATENTS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([days], row_to_expiring).map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Patent"))
    }

    async fn drugs_by_brand_names(&self, brand_names: &[String]) -> Result<Vec<DrugSummary>> {
        if brand_names.is_empty() {
            return Ok(Vec::new());
        }

        let params: Vec<String> = brand_names.iter().map(|n| n.to_uppercase()).collect();
        self.query_summaries(schema::select_summaries_by_brand_names(params.len()), params)
            .await
    }

    async fn get_drug_detail(&self, app_no: &str) -> Result<Option<DrugDetail>> {
        let app_no_owned = app_no.to_string();

        self.conn
            .call(move |conn| {
                let drug = conn
                    .query_row(schema::SELECT_DRUG_BY_APP_NO, [&app_no_owned], row_to_drug)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(drug) = drug else {
                    return Ok(None);
                };

                let mut stmt = conn
                    .prepare(schema::SELECT_PRODUCTS_BY_DRUG)
                    .map_err(wrap_err)?;
                let products = collect_rows(
                    stmt.query_map([drug.id], row_to_product)
                        .map_err(wrap_err)?,
                )?;

                let mut stmt = conn
                    .prepare(schema::SELECT_PATENTS_BY_DRUG)
                    .map_err(wrap_err)?;
                let patents = collect_rows(
                    stmt.query_map([drug.id], row_to_patent)
                        .map_err(wrap_err)?,
                )?;

                Ok(Some(DrugDetail {
                    drug,
                    products,
                    patents,
                }))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Drug", app_no))
    }

    async fn patent_status(&self, app_no: &str) -> Result<Vec<PatentStatus>> {
        let app_no_owned = app_no.to_string();

        let patents = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PATENTS_BY_APP_NO)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&app_no_owned], row_to_patent)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Patent", app_no))?;

        Ok(patents.into_iter().map(PatentStatus::from).collect())
    }
}

// ============================================================================
// ImportRepository implementation
// ============================================================================

#[async_trait]
impl ImportRepository for SqliteRepository {
    async fn import_rows(&self, rows: Vec<ImportRow>, skipped: usize) -> Result<ImportSummary> {
        let mut summary = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let summary = load_rows(&tx, &rows).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(summary)
            })
            .await
            .map_err(map_import_error)?;

        summary.rows_skipped = skipped;
        Ok(summary)
    }
}

/// Applies every row inside `tx`. Any error leaves the transaction to roll back.
fn load_rows(tx: &rusqlite::Transaction<'_>, rows: &[ImportRow]) -> rusqlite::Result<ImportSummary> {
    let mut summary = ImportSummary {
        rows_read: rows.len(),
        ..ImportSummary::default()
    };

    let mut insert_drug = tx.prepare(schema::INSERT_DRUG_IF_ABSENT)?;
    let mut select_drug_id = tx.prepare(schema::SELECT_DRUG_ID_BY_APP_NO)?;
    let mut insert_product = tx.prepare(schema::INSERT_PRODUCT_IF_ABSENT)?;
    let mut insert_patent = tx.prepare(schema::INSERT_PATENT_IF_ABSENT)?;

    for row in rows {
        summary.drugs_processed += 1;
        summary.drugs_inserted += insert_drug.execute(rusqlite::params![
            row.app_no,
            row.brand_name,
            row.generic_name,
            row.app_type
        ])?;

        let drug_id: Option<i64> = select_drug_id
            .query_row([&row.app_no], |r| r.get(0))
            .optional()?;
        let Some(drug_id) = drug_id else {
            warn!(app_no = %row.app_no, "Drug missing after insert, skipping row");
            summary.anomalies += 1;
            continue;
        };

        if let Some(product) = &row.product {
            summary.products_processed += 1;
            summary.products_inserted += insert_product.execute(rusqlite::params![
                drug_id,
                row.app_no,
                product.product_no,
                product.strength,
                product.route,
                product.approval_date
            ])?;
        }

        if let Some(patent) = &row.patent {
            summary.patents_processed += 1;
            summary.patents_inserted += insert_patent.execute(rusqlite::params![
                drug_id,
                row.app_no,
                patent.product_no,
                patent.patent_number,
                patent.patent_expiry_date,
                patent.days_until_expiry
            ])?;
        }
    }

    Ok(summary)
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let email = user.email.clone();
        let name = user.name.clone();
        let password_hash = user.password_hash.clone();
        let role = user.role;
        let created_at = user.created_at;
        let created_at_str = format_datetime(&user.created_at);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![email, password_hash, name, role.as_str(), created_at_str],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user.email.clone()))?;

        Ok(User {
            id,
            email: user.email.clone(),
            name: user.name.clone(),
            role,
            created_at,
        })
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_USER_BY_ID, [id], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let email_owned = email.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_USER_CREDENTIALS_BY_EMAIL,
                    [&email_owned],
                    row_to_credentials,
                )
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", email))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_USERS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_user).map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use patentcliff_core::auth::Role;
    use patentcliff_core::drugs::{PatentRow, ProductRow};

    fn row(app_no: &str, brand: &str, product_no: Option<&str>, patent: Option<(&str, Option<i64>)>) -> ImportRow {
        ImportRow {
            app_no: app_no.to_string(),
            brand_name: Some(brand.to_string()),
            generic_name: Some(format!("{}ine", brand.to_lowercase())),
            app_type: Some("N".to_string()),
            product: product_no.map(|p| ProductRow {
                product_no: p.to_string(),
                strength: Some("10MG".to_string()),
                route: Some("TABLET;ORAL".to_string()),
                approval_date: Some("2011-07-01".to_string()),
            }),
            patent: patent.map(|(number, days)| PatentRow {
                product_no: product_no.unwrap_or_default().to_string(),
                patent_number: number.to_string(),
                patent_expiry_date: Some("2027-01-01".to_string()),
                days_until_expiry: days,
            }),
        }
    }

    fn sample_rows() -> Vec<ImportRow> {
        vec![
            row("N202439", "XARELTO", Some("001"), Some(("7157456", Some(120)))),
            row("N202439", "XARELTO", Some("002"), Some(("7157456", Some(120)))),
            row("N202155", "ELIQUIS", Some("001"), Some(("6967208", Some(0)))),
            row("N202155", "ELIQUIS", Some("001"), Some(("9326945", Some(-1)))),
            row("N021995", "JANUVIA", None, Some(("7326708", Some(365)))),
            row("N021995", "JANUVIA", None, Some(("6699871", Some(366)))),
            row("N999999", "ORPHAN", None, None),
        ]
    }

    async fn seeded() -> SqliteRepository {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.import_rows(sample_rows(), 0).await.unwrap();
        repo
    }

    async fn count(repo: &SqliteRepository, table: &'static str) -> i64 {
        repo.conn
            .call(move |conn| {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
                    .map_err(wrap_err)
            })
            .await
            .unwrap()
    }

    fn new_user(email: &str, role: Role, created_at: chrono::DateTime<Utc>) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Ada".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            role,
            created_at,
        }
    }

    #[tokio::test]
    async fn test_import_counts() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let summary = repo.import_rows(sample_rows(), 2).await.unwrap();

        assert_eq!(summary.rows_read, 7);
        assert_eq!(summary.drugs_processed, 7);
        assert_eq!(summary.drugs_inserted, 4);
        assert_eq!(summary.products_processed, 4);
        assert_eq!(summary.products_inserted, 3);
        assert_eq!(summary.patents_processed, 6);
        assert_eq!(summary.patents_inserted, 6);
        assert_eq!(summary.rows_skipped, 2);
        assert_eq!(summary.anomalies, 0);
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let repo = seeded().await;
        let before = (
            count(&repo, "drugs").await,
            count(&repo, "products").await,
            count(&repo, "patents").await,
        );

        let summary = repo.import_rows(sample_rows(), 0).await.unwrap();

        assert_eq!(summary.drugs_inserted, 0);
        assert_eq!(summary.products_inserted, 0);
        assert_eq!(summary.patents_inserted, 0);
        let after = (
            count(&repo, "drugs").await,
            count(&repo, "products").await,
            count(&repo, "patents").await,
        );
        assert_eq!(before, after);
        assert_eq!(after, (4, 3, 6));
    }

    #[tokio::test]
    async fn test_first_occurrence_wins() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let mut renamed = row("N1", "FIRST", None, None);
        let first = renamed.clone();
        renamed.brand_name = Some("SECOND".to_string());

        repo.import_rows(vec![first, renamed], 0).await.unwrap();

        let detail = repo.get_drug_detail("N1").await.unwrap().unwrap();
        assert_eq!(detail.drug.brand_name.as_deref(), Some("FIRST"));
    }

    #[tokio::test]
    async fn test_import_failure_rolls_back_everything() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_boom BEFORE INSERT ON patents
                     WHEN NEW.patent_number = 'BOOM'
                     BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                )
                .map_err(wrap_err)
            })
            .await
            .unwrap();

        let mut rows = sample_rows();
        rows.push(row("N5", "LATE", None, Some(("BOOM", Some(5)))));

        let result = repo.import_rows(rows, 0).await;

        assert!(matches!(result, Err(RepositoryError::ImportFailed(_))));
        assert_eq!(count(&repo, "drugs").await, 0);
        assert_eq!(count(&repo, "products").await, 0);
        assert_eq!(count(&repo, "patents").await, 0);
    }

    #[tokio::test]
    async fn test_list_drugs_aggregates() {
        let repo = seeded().await;

        let drugs = repo.list_drugs().await.unwrap();

        let names: Vec<_> = drugs.iter().filter_map(|d| d.brand_name.as_deref()).collect();
        assert_eq!(names, vec!["ELIQUIS", "JANUVIA", "ORPHAN", "XARELTO"]);

        let xarelto = drugs.iter().find(|d| d.app_no == "N202439").unwrap();
        assert_eq!(xarelto.product_count, 2);
        assert_eq!(xarelto.patent_count, 2);

        let eliquis = drugs.iter().find(|d| d.app_no == "N202155").unwrap();
        assert_eq!(eliquis.min_days_until_expiry, Some(-1));

        let orphan = drugs.iter().find(|d| d.app_no == "N999999").unwrap();
        assert_eq!(orphan.product_count, 0);
        assert_eq!(orphan.patent_count, 0);
        assert_eq!(orphan.earliest_expiry, None);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_distinct() {
        let repo = seeded().await;

        let results = repo.search_drugs("xarelto").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].app_no, "N202439");

        let by_generic = repo.search_drugs("JANUVIAINE").await.unwrap();
        assert_eq!(by_generic.len(), 1);

        assert!(repo.search_drugs("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expiring_window_bounds() {
        let repo = seeded().await;

        let within_year = repo.expiring_within(365).await.unwrap();
        let days: Vec<_> = within_year.iter().map(|p| p.days_until_expiry).collect();
        assert_eq!(days, vec![0, 120, 120, 365]);
        assert!(within_year.iter().all(|p| p.patent_number != "6699871"));

        let today = repo.expiring_within(0).await.unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].brand_name.as_deref(), Some("ELIQUIS"));

        assert!(repo.expiring_within(-1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drugs_by_brand_names() {
        let repo = seeded().await;
        let names = vec!["Xarelto".to_string(), "ELIQUIS".to_string(), "NOPE".to_string()];

        let drugs = repo.drugs_by_brand_names(&names).await.unwrap();

        let app_nos: Vec<_> = drugs.iter().map(|d| d.app_no.as_str()).collect();
        assert_eq!(app_nos, vec!["N202155", "N202439"]);
        assert!(repo.drugs_by_brand_names(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drug_detail() {
        let repo = seeded().await;

        let detail = repo.get_drug_detail("N021995").await.unwrap().unwrap();

        assert_eq!(detail.drug.brand_name.as_deref(), Some("JANUVIA"));
        assert!(detail.products.is_empty());
        assert_eq!(detail.patents.len(), 2);
        assert!(detail.patents.iter().all(|p| p.product_no.is_none()));
    }

    #[tokio::test]
    async fn test_unknown_drug_is_none() {
        let repo = seeded().await;

        assert!(repo.get_drug_detail("N000000").await.unwrap().is_none());
        assert!(repo.patent_status("N000000").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognised_expiry_sorts_after_iso_dates() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let iso = row("N1", "MIXED", None, Some(("1000001", Some(10))));
        let mut free_text = row("N1", "MIXED", None, Some(("1000002", None)));
        if let Some(patent) = free_text.patent.as_mut() {
            patent.patent_expiry_date = Some("pending extension".to_string());
        }
        repo.import_rows(vec![iso, free_text], 0).await.unwrap();

        let drugs = repo.list_drugs().await.unwrap();

        // Expiry dates compare as text, and letters sort after digits.
        assert_eq!(drugs[0].earliest_expiry.as_deref(), Some("2027-01-01"));
        assert_eq!(drugs[0].latest_expiry.as_deref(), Some("pending extension"));
    }

    #[tokio::test]
    async fn test_patent_status_labels() {
        let repo = seeded().await;

        let statuses = repo.patent_status("N202155").await.unwrap();

        assert_eq!(statuses.len(), 2);
        let expired = statuses.iter().find(|s| s.patent.patent_number == "9326945").unwrap();
        assert!(expired.is_expired);
        let today = statuses.iter().find(|s| s.patent.patent_number == "6967208").unwrap();
        assert!(!today.is_expired);
        assert_eq!(today.status_label, "expiring today");
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let user = repo
            .create_user(&new_user("ada@example.com", Role::Admin, Utc::now()))
            .await
            .unwrap();

        assert!(user.id > 0);
        let fetched = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "ada@example.com");
        assert_eq!(fetched.role, Role::Admin);

        let creds = repo.get_user_by_email("ADA@example.com").await.unwrap().unwrap();
        assert_eq!(creds.user.id, user.id);
        assert_eq!(creds.password_hash, "$argon2id$hash");

        assert!(repo.get_user(user.id + 1).await.unwrap().is_none());
        assert!(repo.get_user_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_already_exists() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_user(&new_user("ada@example.com", Role::User, Utc::now()))
            .await
            .unwrap();

        let result = repo
            .create_user(&new_user("Ada@Example.com", Role::User, Utc::now()))
            .await;

        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_list_users_newest_first() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let now = Utc::now();
        repo.create_user(&new_user("old@example.com", Role::User, now - Duration::days(2)))
            .await
            .unwrap();
        repo.create_user(&new_user("new@example.com", Role::User, now))
            .await
            .unwrap();

        let users = repo.list_users().await.unwrap();

        let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["new@example.com", "old@example.com"]);
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patents.db");
        let path = path.to_str().unwrap();

        {
            let repo = SqliteRepository::new(path).await.unwrap();
            repo.import_rows(sample_rows(), 0).await.unwrap();
        }

        let reopened = SqliteRepository::new(path).await.unwrap();
        assert_eq!(reopened.list_drugs().await.unwrap().len(), 4);
    }
}
