//! [`SqliteStore`]: the SQLite implementation of the `aqhi-core` store
//! traits.

use std::path::Path;

use aqhi_core::{
  alert::{Alert, NewAlert},
  coordinate::Coordinate,
  store::{AlertStore, LocationStore, UserDirectory},
  user::{NewUser, User},
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, ffi};
use tracing::debug;
use uuid::Uuid;

use crate::{
  encode::{
    ALERT_COLUMNS, RawAlert, RawUser, USER_COLUMNS, encode_dt, encode_point, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user-location store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Every call
/// runs to completion on the connection thread, so dropping a caller's future
/// never leaves a transaction half applied.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection { &self.conn }

  /// Run arbitrary SQL against the connection; tests use it to inject
  /// failures.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// The extended result code of a failed statement, if it was a constraint
/// violation.
fn constraint_code(e: &rusqlite::Error) -> Option<std::ffi::c_int> {
  match e {
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(err.extended_code)
    }
    _ => None,
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for SqliteStore {
  type Error = Error;

  async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            rusqlite::params![username],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:  Uuid::new_v4(),
      username: input.username,
      email:    input.email,
      password: input.password,
      location: input.location,
    };

    let id_str    = encode_uuid(user.user_id);
    let username  = user.username.clone();
    let email     = user.email.clone();
    let password  = user.password.clone();
    let point_str = encode_point(user.location);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO users (user_id, username, email, password, location)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, username, email, password, point_str],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::Conflict(format!(
        "username {:?} or email {:?} is already registered",
        user.username, user.email
      )));
    }

    debug!(user_id = %user.user_id, username = %user.username, "added user");
    Ok(user)
  }
}

// ─── LocationStore impl ──────────────────────────────────────────────────────

impl LocationStore for SqliteStore {
  async fn set_location(&self, user_id: Uuid, location: Coordinate) -> Result<Option<User>> {
    let id_str    = encode_uuid(user_id);
    let point_str = encode_point(location);

    // The update, the read-back and its decoding share one transaction: if any
    // step fails the transaction is rolled back before the error leaves the
    // closure, so the previous location survives.
    let user: Option<User> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = match tx.execute(
          "UPDATE users SET location = ?1 WHERE user_id = ?2",
          rusqlite::params![point_str, id_str],
        ) {
          Ok(n) => n,
          Err(e) => {
            tx.rollback()?;
            return Err(e.into());
          }
        };

        if changed != 1 {
          tx.rollback()?;
          return Ok(None);
        }

        let decoded = tx
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .map_err(tokio_rusqlite::Error::from)
          .and_then(|raw| {
            raw
              .into_user()
              .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
          });

        match decoded {
          Ok(user) => {
            tx.commit()?;
            Ok(Some(user))
          }
          Err(e) => {
            tx.rollback()?;
            Err(e)
          }
        }
      })
      .await?;

    match &user {
      Some(_) => debug!(%user_id, "location updated"),
      None => debug!(%user_id, "location update matched no user"),
    }
    Ok(user)
  }
}

// ─── AlertStore impl ─────────────────────────────────────────────────────────

impl AlertStore for SqliteStore {
  type Error = Error;

  async fn add_alert(&self, input: NewAlert) -> Result<Alert> {
    let alert = Alert {
      alert_id:      Uuid::new_v4(),
      user_id:       input.user_id,
      alert_name:    input.alert_name,
      threshold:     input.threshold,
      alert_method:  input.alert_method,
      mobile_number: input.mobile_number,
      is_active:     true,
      created_at:    Utc::now(),
      location:      input.location,
    };

    let alert_id_str  = encode_uuid(alert.alert_id);
    let user_id_str   = encode_uuid(alert.user_id);
    let alert_name    = alert.alert_name.clone();
    let threshold     = alert.threshold;
    let alert_method  = alert.alert_method.clone();
    let mobile_number = alert.mobile_number.clone();
    let is_active     = alert.is_active;
    let at_str        = encode_dt(alert.created_at);
    let point_str     = encode_point(alert.location);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO alerts (
             alert_id, user_id, alert_name, threshold, alert_method,
             mobile_number, is_active, created_at, location
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            alert_id_str,
            user_id_str,
            alert_name,
            threshold,
            alert_method,
            mobile_number,
            is_active,
            at_str,
            point_str,
          ],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e) if constraint_code(&e) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(Error::UserNotFound(alert.user_id));
    }
    Ok(alert)
  }

  async fn list_alerts(&self, user_id: Uuid) -> Result<Vec<Alert>> {
    let id_str = encode_uuid(user_id);

    let raws: Vec<RawAlert> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ALERT_COLUMNS} FROM alerts WHERE user_id = ?1 ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawAlert::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAlert::into_alert).collect()
  }
}
