//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Every statement is parameterised.

/// Connection pragmas applied to every connection.
pub const PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// Write-ahead logging for file databases (not supported for `:memory:`).
pub const PRAGMA_WAL: &str = "PRAGMA journal_mode = WAL;";

/// SQL statement to create all tables. Safe to run on every start.
pub const CREATE_TABLES: &str = r#"
-- Drugs, keyed by application number
CREATE TABLE IF NOT EXISTS drugs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    app_no TEXT NOT NULL UNIQUE,
    brand_name TEXT,
    generic_name TEXT,
    app_type TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Products, unique within a drug
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    drug_id INTEGER NOT NULL,
    app_no TEXT NOT NULL,
    product_no TEXT NOT NULL,
    strength TEXT,
    route TEXT,
    approval_date TEXT,
    UNIQUE (app_no, product_no),
    FOREIGN KEY (drug_id) REFERENCES drugs(id) ON DELETE CASCADE
);

-- Patents; product_no is '' when the patent is not tied to a product
CREATE TABLE IF NOT EXISTS patents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    drug_id INTEGER NOT NULL,
    app_no TEXT NOT NULL,
    product_no TEXT NOT NULL DEFAULT '',
    patent_number TEXT NOT NULL,
    patent_expiry_date TEXT,
    days_until_expiry INTEGER,
    UNIQUE (app_no, product_no, patent_number),
    FOREIGN KEY (drug_id) REFERENCES drugs(id) ON DELETE CASCADE
);

-- Users
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    created_at TEXT NOT NULL
);

-- Forecasts per drug; not populated yet
CREATE TABLE IF NOT EXISTS predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    drug_id INTEGER UNIQUE,
    predicted_entry_date TEXT,
    strategy TEXT,
    confidence_score REAL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (drug_id) REFERENCES drugs(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_drugs_brand_name ON drugs(brand_name);
CREATE INDEX IF NOT EXISTS idx_drugs_generic_name ON drugs(generic_name);
CREATE INDEX IF NOT EXISTS idx_products_drug_id ON products(drug_id);
CREATE INDEX IF NOT EXISTS idx_patents_drug_id ON patents(drug_id);
CREATE INDEX IF NOT EXISTS idx_patents_expiry_date ON patents(patent_expiry_date);
CREATE INDEX IF NOT EXISTS idx_patents_days_until_expiry ON patents(days_until_expiry);
"#;

// Import statements

pub const INSERT_DRUG_IF_ABSENT: &str = r#"
INSERT INTO drugs (app_no, brand_name, generic_name, app_type)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (app_no) DO NOTHING
"#;

pub const SELECT_DRUG_ID_BY_APP_NO: &str = r#"
SELECT id FROM drugs WHERE app_no = ?1
"#;

pub const INSERT_PRODUCT_IF_ABSENT: &str = r#"
INSERT INTO products (drug_id, app_no, product_no, strength, route, approval_date)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (app_no, product_no) DO NOTHING
"#;

pub const INSERT_PATENT_IF_ABSENT: &str = r#"
INSERT INTO patents (drug_id, app_no, product_no, patent_number, patent_expiry_date, days_until_expiry)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (app_no, product_no, patent_number) DO NOTHING
"#;

// Drug queries

/// Shared aggregate projection for list, search and by-disease queries.
/// Callers append a WHERE clause (or none) and `SUMMARY_TAIL`.
pub const SELECT_DRUG_SUMMARIES: &str = r#"
SELECT d.app_no, d.brand_name, d.generic_name, d.app_type,
       COUNT(DISTINCT p.id) AS product_count,
       COUNT(DISTINCT pt.id) AS patent_count,
       MIN(pt.patent_expiry_date) AS earliest_expiry,
       MAX(pt.patent_expiry_date) AS latest_expiry,
       MIN(pt.days_until_expiry) AS min_days_until_expiry
FROM drugs d
LEFT JOIN products p ON p.drug_id = d.id
LEFT JOIN patents pt ON pt.drug_id = d.id
"#;

pub const SUMMARY_TAIL: &str = r#"
GROUP BY d.id
ORDER BY d.brand_name ASC, d.app_no ASC
"#;

pub const WHERE_NAME_LIKE: &str = r#"
WHERE d.brand_name LIKE ?1 ESCAPE '\' OR d.generic_name LIKE ?1 ESCAPE '\'
"#;

pub const SELECT_EXPIRING_PATENTS: &str = r#"
SELECT d.app_no, d.brand_name, d.generic_name, pt.product_no, pt.patent_number,
       pt.patent_expiry_date, pt.days_until_expiry
FROM patents pt
INNER JOIN drugs d ON d.id = pt.drug_id
WHERE pt.days_until_expiry BETWEEN 0 AND ?1
ORDER BY pt.days_until_expiry ASC, pt.patent_number ASC
"#;

pub const SELECT_DRUG_BY_APP_NO: &str = r#"
SELECT id, app_no, brand_name, generic_name, app_type
FROM drugs
WHERE app_no = ?1
"#;

pub const SELECT_PRODUCTS_BY_DRUG: &str = r#"
SELECT id, app_no, product_no, strength, route, approval_date
FROM products
WHERE drug_id = ?1
ORDER BY product_no ASC
"#;

pub const SELECT_PATENTS_BY_DRUG: &str = r#"
SELECT id, app_no, product_no, patent_number, patent_expiry_date, days_until_expiry
FROM patents
WHERE drug_id = ?1
ORDER BY patent_expiry_date IS NULL, patent_expiry_date ASC, patent_number ASC, product_no ASC
"#;

pub const SELECT_PATENTS_BY_APP_NO: &str = r#"
SELECT id, app_no, product_no, patent_number, patent_expiry_date, days_until_expiry
FROM patents
WHERE app_no = ?1
ORDER BY patent_expiry_date IS NULL, patent_expiry_date ASC, patent_number ASC, product_no ASC
"#;

// User queries

pub const INSERT_USER: &str = r#"
INSERT INTO users (email, password_hash, name, role, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, email, name, role, created_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_CREDENTIALS_BY_EMAIL: &str = r#"
SELECT id, email, name, role, created_at, password_hash
FROM users
WHERE email = ?1
"#;

pub const SELECT_ALL_USERS: &str = r#"
SELECT id, email, name, role, created_at
FROM users
ORDER BY created_at DESC, id DESC
"#;

/// Builds the by-brand-name summary query with `count` placeholders.
pub fn select_summaries_by_brand_names(count: usize) -> String {
    let placeholders = (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{SELECT_DRUG_SUMMARIES}WHERE UPPER(d.brand_name) IN ({placeholders}){SUMMARY_TAIL}"
    )
}

/// Builds the name search query.
pub fn select_summaries_by_name() -> String {
    format!("{SELECT_DRUG_SUMMARIES}{WHERE_NAME_LIKE}{SUMMARY_TAIL}")
}

/// Builds the unfiltered summary query.
pub fn select_all_summaries() -> String {
    format!("{SELECT_DRUG_SUMMARIES}{SUMMARY_TAIL}")
}

/// Escapes LIKE wildcards so user input matches literally, and wraps it in `%`.
pub fn like_contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
