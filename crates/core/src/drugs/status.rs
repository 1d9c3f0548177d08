//! Derived patent status.

/// A patent is expired when its days-until-expiry is known and negative.
pub fn is_expired(days_until_expiry: Option<i64>) -> bool {
    matches!(days_until_expiry, Some(days) if days < 0)
}

/// Human-readable expiry label for a days-until-expiry snapshot.
pub fn status_label(days_until_expiry: Option<i64>) -> String {
    match days_until_expiry {
        None => "expiry unknown".to_string(),
        Some(days) if days < 0 => "expired".to_string(),
        Some(0) => "expiring today".to_string(),
        Some(days) => format!("expires in {days} days"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_days_is_expired() {
        assert!(is_expired(Some(-5)));
        assert!(status_label(Some(-5)).contains("expired"));
    }

    #[test]
    fn test_zero_days_is_expiring_today() {
        assert!(!is_expired(Some(0)));
        assert!(status_label(Some(0)).contains("today"));
    }

    #[test]
    fn test_positive_days_reports_count() {
        assert!(!is_expired(Some(30)));
        assert_eq!(status_label(Some(30)), "expires in 30 days");
    }

    #[test]
    fn test_unknown_days_is_not_expired() {
        assert!(!is_expired(None));
        assert_eq!(status_label(None), "expiry unknown");
    }
}
