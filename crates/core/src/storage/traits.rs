use async_trait::async_trait;

use crate::auth::{NewUser, User, UserCredentials};
use crate::drugs::{DrugDetail, DrugSummary, ExpiringPatent, ImportRow, ImportSummary, PatentStatus};

use super::Result;

/// Read-only queries over the drug, product and patent tables.
#[async_trait]
pub trait DrugRepository: Send + Sync {
    /// All drugs with aggregate figures, ordered by brand name.
    async fn list_drugs(&self) -> Result<Vec<DrugSummary>>;

    /// Drugs whose brand or generic name contains `query`, ignoring case.
    async fn search_drugs(&self, query: &str) -> Result<Vec<DrugSummary>>;

    /// Patents expiring within `[0, days]` days, soonest first.
    async fn expiring_within(&self, days: i64) -> Result<Vec<ExpiringPatent>>;

    /// Drugs whose brand name matches any of `brand_names`, ignoring case.
    async fn drugs_by_brand_names(&self, brand_names: &[String]) -> Result<Vec<DrugSummary>>;

    /// A drug with its products and patents, or None if `app_no` is unknown.
    async fn get_drug_detail(&self, app_no: &str) -> Result<Option<DrugDetail>>;

    /// Every patent of a drug with derived expiry status.
    async fn patent_status(&self, app_no: &str) -> Result<Vec<PatentStatus>>;
}

/// Bulk loading of normalised import rows.
#[async_trait]
pub trait ImportRepository: Send + Sync {
    /// Persists `rows` in a single transaction.
    ///
    /// Either every row is applied or none is. `skipped` is the number of
    /// source records that were rejected before reaching the loader and is
    /// folded into the returned summary.
    async fn import_rows(&self, rows: Vec<ImportRow>, skipped: usize) -> Result<ImportSummary>;
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user and returns it with its assigned ID.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user and their password hash by email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// All users, newest first.
    async fn list_users(&self) -> Result<Vec<User>>;
}
