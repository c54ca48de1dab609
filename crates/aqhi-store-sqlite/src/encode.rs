//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! points EWKT with longitude before latitude.

use aqhi_core::{alert::Alert, coordinate::Coordinate, user::User};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Point ───────────────────────────────────────────────────────────────────

const POINT_PREFIX: &str = "SRID=4326;POINT(";

/// `SRID=4326;POINT(<lon> <lat>)`. The axis order is longitude first.
pub fn encode_point(c: Coordinate) -> String {
  format!("{POINT_PREFIX}{} {})", c.longitude(), c.latitude())
}

pub fn decode_point(s: &str) -> Result<Coordinate> {
  let invalid = || Error::Point(s.to_owned());

  let body = s
    .strip_prefix(POINT_PREFIX)
    .and_then(|rest| rest.strip_suffix(')'))
    .ok_or_else(invalid)?;

  let mut parts = body.split_whitespace();
  let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
    return Err(invalid());
  };
  let longitude: f64 = lon.parse().map_err(|_| invalid())?;
  let latitude: f64 = lat.parse().map_err(|_| invalid())?;

  Ok(Coordinate::new(latitude, longitude)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, username, email, password, location";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:  String,
  pub username: String,
  pub email:    String,
  pub password: String,
  pub location: String,
}

impl RawUser {
  /// Read a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:  row.get(0)?,
      username: row.get(1)?,
      email:    row.get(2)?,
      password: row.get(3)?,
      location: row.get(4)?,
    })
  }

  /// Decode every column; any failure rejects the whole record.
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:  decode_uuid(&self.user_id)?,
      username: self.username,
      email:    self.email,
      password: self.password,
      location: decode_point(&self.location)?,
    })
  }
}

pub const ALERT_COLUMNS: &str = "alert_id, user_id, alert_name, threshold, alert_method, \
                                 mobile_number, is_active, created_at, location";

/// Raw values read directly from an `alerts` row.
pub struct RawAlert {
  pub alert_id:      String,
  pub user_id:       String,
  pub alert_name:    String,
  pub threshold:     i64,
  pub alert_method:  Option<String>,
  pub mobile_number: Option<String>,
  pub is_active:     bool,
  pub created_at:    String,
  pub location:      String,
}

impl RawAlert {
  /// Read a row selected with [`ALERT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      alert_id:      row.get(0)?,
      user_id:       row.get(1)?,
      alert_name:    row.get(2)?,
      threshold:     row.get(3)?,
      alert_method:  row.get(4)?,
      mobile_number: row.get(5)?,
      is_active:     row.get(6)?,
      created_at:    row.get(7)?,
      location:      row.get(8)?,
    })
  }

  pub fn into_alert(self) -> Result<Alert> {
    Ok(Alert {
      alert_id:      decode_uuid(&self.alert_id)?,
      user_id:       decode_uuid(&self.user_id)?,
      alert_name:    self.alert_name,
      threshold:     self.threshold,
      alert_method:  self.alert_method,
      mobile_number: self.mobile_number,
      is_active:     self.is_active,
      created_at:    decode_dt(&self.created_at)?,
      location:      decode_point(&self.location)?,
    })
  }
}
