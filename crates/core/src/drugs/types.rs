use serde::{Deserialize, Serialize};

use super::status::{is_expired, status_label};

/// A drug identified by its regulatory application number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub id: i64,
    pub app_no: String,
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub app_type: Option<String>,
}

/// A marketed product belonging to a drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub app_no: String,
    pub product_no: String,
    pub strength: Option<String>,
    pub route: Option<String>,
    pub approval_date: Option<String>,
}

/// A patent protecting a drug, optionally tied to one of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patent {
    pub id: i64,
    pub app_no: String,
    pub product_no: Option<String>,
    pub patent_number: String,
    pub patent_expiry_date: Option<String>,
    /// Snapshot taken at import time. Negative once the patent has expired.
    pub days_until_expiry: Option<i64>,
}

/// A drug with aggregate product and patent figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugSummary {
    pub app_no: String,
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub app_type: Option<String>,
    pub product_count: i64,
    pub patent_count: i64,
    pub earliest_expiry: Option<String>,
    pub latest_expiry: Option<String>,
    pub min_days_until_expiry: Option<i64>,
}

/// A drug with all of its products and patents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugDetail {
    pub drug: Drug,
    pub products: Vec<Product>,
    pub patents: Vec<Patent>,
}

/// A patent due to expire soon, with the owning drug's names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiringPatent {
    pub app_no: String,
    pub brand_name: Option<String>,
    pub generic_name: Option<String>,
    pub product_no: Option<String>,
    pub patent_number: String,
    pub patent_expiry_date: Option<String>,
    pub days_until_expiry: i64,
}

/// A patent annotated with its derived expiry status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentStatus {
    #[serde(flatten)]
    pub patent: Patent,
    pub is_expired: bool,
    pub status_label: String,
}

impl From<Patent> for PatentStatus {
    fn from(patent: Patent) -> Self {
        Self {
            is_expired: is_expired(patent.days_until_expiry),
            status_label: status_label(patent.days_until_expiry),
            patent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patent(days: Option<i64>) -> Patent {
        Patent {
            id: 1,
            app_no: "N022406".to_string(),
            product_no: Some("001".to_string()),
            patent_number: "7371746".to_string(),
            patent_expiry_date: Some("2027-03-14".to_string()),
            days_until_expiry: days,
        }
    }

    #[test]
    fn test_patent_status_from_expired_patent() {
        let status = PatentStatus::from(patent(Some(-5)));
        assert!(status.is_expired);
        assert!(status.status_label.contains("expired"));
    }

    #[test]
    fn test_patent_status_from_active_patent() {
        let status = PatentStatus::from(patent(Some(30)));
        assert!(!status.is_expired);
        assert!(status.status_label.contains("30"));
    }

    #[test]
    fn test_patent_status_serializes_flat() {
        let status = PatentStatus::from(patent(Some(0)));
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["patent_number"], "7371746");
        assert_eq!(json["days_until_expiry"], 0);
        assert_eq!(json["is_expired"], false);
        assert_eq!(json["status_label"], "expiring today");
    }
}
