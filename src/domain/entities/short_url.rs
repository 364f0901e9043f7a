//! Short URL entities: tracking flags, insert payload, persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-visit tracking dimensions before default resolution.
///
/// Each field is tri-state: `None` means "use the process default",
/// `Some(_)` is an explicit caller override. Overrides must survive until
/// [`TrackingOverrides::resolve`] runs at creation time; collapsing them
/// earlier would make overrides indistinguishable from defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingOverrides {
    pub visits: Option<bool>,
    pub ip_address: Option<bool>,
    pub os: Option<bool>,
    pub os_version: Option<bool>,
    pub browser: Option<bool>,
    pub browser_version: Option<bool>,
    pub referer: Option<bool>,
    pub device_type: Option<bool>,
}

impl TrackingOverrides {
    /// Substitutes the process default for every dimension left unset.
    pub fn resolve(&self, defaults: &TrackingFlags) -> TrackingFlags {
        TrackingFlags {
            visits: self.visits.unwrap_or(defaults.visits),
            ip_address: self.ip_address.unwrap_or(defaults.ip_address),
            os: self.os.unwrap_or(defaults.os),
            os_version: self.os_version.unwrap_or(defaults.os_version),
            browser: self.browser.unwrap_or(defaults.browser),
            browser_version: self.browser_version.unwrap_or(defaults.browser_version),
            referer: self.referer.unwrap_or(defaults.referer),
            device_type: self.device_type.unwrap_or(defaults.device_type),
        }
    }
}

/// Fully resolved tracking dimensions stored on a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingFlags {
    pub visits: bool,
    pub ip_address: bool,
    pub os: bool,
    pub os_version: bool,
    pub browser: bool,
    pub browser_version: bool,
    pub referer: bool,
    pub device_type: bool,
}

impl TrackingFlags {
    /// All dimensions enabled.
    pub fn all() -> Self {
        Self {
            visits: true,
            ip_address: true,
            os: true,
            os_version: true,
            browser: true,
            browser_version: true,
            referer: true,
            device_type: true,
        }
    }
}

/// Input data for inserting a new short URL.
///
/// All tri-state options are resolved by the time this is built; the
/// destination scheme is already rewritten when secure transport applies.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortUrl {
    pub key: String,
    pub destination_url: String,
    pub public_url: String,
    pub redirect_status: u16,
    pub single_use: bool,
    pub activate_at: Option<DateTime<Utc>>,
    pub deactivate_at: Option<DateTime<Utc>>,
    pub tracking: TrackingFlags,
}

/// A persisted short URL mapping.
///
/// Immutable once returned; later lifecycle changes (deactivation,
/// deletion) are handled outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortUrlRecord {
    pub id: i64,
    pub key: String,
    pub destination_url: String,
    pub public_url: String,
    pub redirect_status: u16,
    pub single_use: bool,
    pub activate_at: Option<DateTime<Utc>>,
    pub deactivate_at: Option<DateTime<Utc>>,
    pub tracking: TrackingFlags,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlRecord {
    /// Returns true if `now` falls inside the activation window.
    ///
    /// An unset bound is open on that side.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.activate_at.is_some_and(|start| now < start) {
            return false;
        }
        !self.deactivate_at.is_some_and(|end| now >= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_with_window(
        activate_at: Option<DateTime<Utc>>,
        deactivate_at: Option<DateTime<Utc>>,
    ) -> ShortUrlRecord {
        ShortUrlRecord {
            id: 1,
            key: "abc123def456".to_string(),
            destination_url: "https://example.com".to_string(),
            public_url: "https://s.test.com/abc123def456".to_string(),
            redirect_status: 301,
            single_use: false,
            activate_at,
            deactivate_at,
            tracking: TrackingFlags::default(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_unset_takes_defaults() {
        let overrides = TrackingOverrides::default();
        let defaults = TrackingFlags::all();

        assert_eq!(overrides.resolve(&defaults), TrackingFlags::all());
    }

    #[test]
    fn test_resolve_override_wins_over_default() {
        let overrides = TrackingOverrides {
            visits: Some(false),
            ip_address: Some(true),
            ..Default::default()
        };
        let defaults = TrackingFlags {
            visits: true,
            ip_address: false,
            ..Default::default()
        };

        let resolved = overrides.resolve(&defaults);
        assert!(!resolved.visits);
        assert!(resolved.ip_address);
        assert!(!resolved.os);
    }

    #[test]
    fn test_record_active_without_window() {
        let record = record_with_window(None, None);
        assert!(record.is_active(Utc::now()));
    }

    #[test]
    fn test_record_inactive_before_activation() {
        let now = Utc::now();
        let record = record_with_window(Some(now + Duration::hours(1)), None);
        assert!(!record.is_active(now));
    }

    #[test]
    fn test_record_inactive_after_deactivation() {
        let now = Utc::now();
        let record = record_with_window(None, Some(now - Duration::seconds(1)));
        assert!(!record.is_active(now));
    }

    #[test]
    fn test_record_active_inside_window() {
        let now = Utc::now();
        let record = record_with_window(
            Some(now - Duration::hours(1)),
            Some(now + Duration::hours(1)),
        );
        assert!(record.is_active(now));
    }
}
