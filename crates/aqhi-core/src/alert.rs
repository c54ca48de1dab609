//! Alert: a user's threshold subscription for a location.
//!
//! Alerts are only read and created here; evaluation and delivery live
//! elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinate::Coordinate;

/// A persisted alert. `user_id` always references an existing user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
  pub alert_id:      Uuid,
  pub user_id:       Uuid,
  pub alert_name:    String,
  /// AQHI level at or above which the alert fires.
  pub threshold:     i64,
  pub alert_method:  Option<String>,
  pub mobile_number: Option<String>,
  pub is_active:     bool,
  pub created_at:    DateTime<Utc>,
  pub location:      Coordinate,
}

/// Input for [`AlertStore::add_alert`](crate::store::AlertStore::add_alert).
#[derive(Debug, Clone, Deserialize)]
pub struct NewAlert {
  pub user_id:       Uuid,
  pub alert_name:    String,
  pub threshold:     i64,
  #[serde(default)]
  pub alert_method:  Option<String>,
  #[serde(default)]
  pub mobile_number: Option<String>,
  pub location:      Coordinate,
}

impl NewAlert {
  /// Convenience constructor with no delivery method configured.
  pub fn new(
    user_id: Uuid,
    alert_name: impl Into<String>,
    threshold: i64,
    location: Coordinate,
  ) -> Self {
    Self {
      user_id,
      alert_name: alert_name.into(),
      threshold,
      alert_method: None,
      mobile_number: None,
      location,
    }
  }
}
