//! Integration tests for `SqliteStore` against an in-memory database.

use aqhi_core::{
  alert::NewAlert,
  coordinate::Coordinate,
  store::{AlertStore, LocationStore, UserDirectory},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn coord(lat: f64, lon: f64) -> Coordinate { Coordinate::new(lat, lon).unwrap() }

fn new_user(username: &str, location: Coordinate) -> NewUser {
  NewUser {
    username: username.into(),
    email:    format!("{username}@example.com"),
    password: "$argon2id$opaque".into(),
    location,
  }
}

async fn add(s: &SqliteStore, username: &str, location: Coordinate) -> User {
  s.add_user(new_user(username, location)).await.unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_user() {
  let s = store().await;
  let alice = add(&s, "alice", coord(49.28, -123.12)).await;

  let found = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(found, alice);
  assert_eq!(found.email, "alice@example.com");
  assert_eq!(found.location, coord(49.28, -123.12));
}

#[tokio::test]
async fn find_missing_user_returns_none() {
  let s = store().await;
  add(&s, "alice", coord(0.0, 0.0)).await;

  assert!(s.find_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
  let s = store().await;
  add(&s, "alice", coord(0.0, 0.0)).await;

  let mut dup = new_user("alice", coord(1.0, 1.0));
  dup.email = "other@example.com".into();
  let err = s.add_user(dup).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
  let s = store().await;
  add(&s, "alice", coord(0.0, 0.0)).await;

  let mut dup = new_user("alice2", coord(1.0, 1.0));
  dup.email = "alice@example.com".into();
  let err = s.add_user(dup).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)), "{err:?}");
}

// ─── Locations ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_location_updates_and_returns_user() {
  let s = store().await;
  let alice = add(&s, "alice", coord(0.0, 0.0)).await;

  let updated = s
    .set_location(alice.user_id, coord(37.42, -122.08))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.user_id, alice.user_id);
  assert_eq!(updated.location, coord(37.42, -122.08));

  let found = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(found.location, coord(37.42, -122.08));
}

#[tokio::test]
async fn set_location_only_touches_one_row() {
  let s = store().await;
  let alice = add(&s, "alice", coord(1.0, 1.0)).await;
  add(&s, "bob", coord(2.0, 2.0)).await;

  s.set_location(alice.user_id, coord(3.0, 3.0)).await.unwrap();

  let bob = s.find_by_username("bob").await.unwrap().unwrap();
  assert_eq!(bob.location, coord(2.0, 2.0));
}

#[tokio::test]
async fn set_location_for_unknown_id_returns_none() {
  let s = store().await;
  add(&s, "alice", coord(0.0, 0.0)).await;

  let result = s.set_location(Uuid::new_v4(), coord(5.0, 5.0)).await.unwrap();
  assert!(result.is_none());

  let alice = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(alice.location, coord(0.0, 0.0));
}

#[tokio::test]
async fn set_location_is_idempotent() {
  let s = store().await;
  let bob = add(&s, "bob", coord(0.0, 0.0)).await;
  let target = coord(-33.8688, 151.2093);

  let first = s.set_location(bob.user_id, target).await.unwrap().unwrap();
  let second = s.set_location(bob.user_id, target).await.unwrap().unwrap();
  assert_eq!(first, second);
  assert_eq!(
    s.find_by_username("bob").await.unwrap().unwrap().location,
    target
  );
}

#[tokio::test]
async fn stored_point_is_longitude_first() {
  let s = store().await;
  let alice = add(&s, "alice", coord(0.0, 0.0)).await;
  s.set_location(alice.user_id, coord(37.42, -122.08)).await.unwrap();

  let raw: String = s
    .conn_for_tests()
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT location FROM users WHERE username = 'alice'",
        [],
        |r| r.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(raw, "SRID=4326;POINT(-122.08 37.42)");
}

#[tokio::test]
async fn failed_update_leaves_previous_location() {
  let s = store().await;
  let alice = add(&s, "alice", coord(10.0, 20.0)).await;

  // The UPDATE statement itself fails.
  s.execute_batch(
    "CREATE TEMP TRIGGER fail_location AFTER UPDATE OF location ON users
     BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
  )
  .await
  .unwrap();

  let err = s
    .set_location(alice.user_id, coord(-45.0, 170.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)), "{err:?}");
  assert!(err.to_string().contains("injected failure"), "{err}");

  let found = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(found.location, coord(10.0, 20.0));

  // The connection is still usable once the failure is removed.
  s.execute_batch("DROP TRIGGER fail_location;").await.unwrap();
  s.set_location(alice.user_id, coord(-45.0, 170.0))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(
    s.find_by_username("alice").await.unwrap().unwrap().location,
    coord(-45.0, 170.0)
  );
}

#[tokio::test]
async fn undecodable_read_back_rolls_back_the_update() {
  let s = store().await;
  let alice = add(&s, "alice", coord(10.0, 20.0)).await;

  // The UPDATE succeeds, but the row it leaves behind does not decode. Only
  // rolling back the transaction restores the previous location.
  s.execute_batch(
    "CREATE TEMP TRIGGER corrupt_location AFTER UPDATE OF location ON users
     BEGIN
       UPDATE users SET location = 'SRID=4326;POINT(garbage)' WHERE user_id = NEW.user_id;
     END;",
  )
  .await
  .unwrap();

  let err = s
    .set_location(alice.user_id, coord(-45.0, 170.0))
    .await
    .unwrap_err();
  assert!(err.to_string().contains("invalid stored point"), "{err}");

  s.execute_batch("DROP TRIGGER corrupt_location;").await.unwrap();
  let found = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(found.location, coord(10.0, 20.0));
}

#[tokio::test]
async fn corrupt_stored_point_is_an_error_not_a_partial_user() {
  let s = store().await;
  add(&s, "alice", coord(0.0, 0.0)).await;
  s.execute_batch(
    "UPDATE users SET location = 'SRID=4326;POINT(garbage)' WHERE username = 'alice';",
  )
  .await
  .unwrap();

  let err = s.find_by_username("alice").await.unwrap_err();
  assert!(matches!(err, Error::Point(_)), "{err:?}");
}

#[tokio::test]
async fn concurrent_updates_are_last_writer_wins() {
  let s = store().await;
  let carol_id = add(&s, "carol", coord(0.0, 0.0)).await.user_id;

  let targets: Vec<Coordinate> = (1..=8).map(|i| coord(f64::from(i), -f64::from(i))).collect();
  let tasks: Vec<_> = targets
    .iter()
    .map(|&c| {
      let s = s.clone();
      tokio::spawn(async move { s.set_location(carol_id, c).await })
    })
    .collect();
  for t in tasks {
    t.await.unwrap().unwrap().unwrap();
  }

  // No ordering is promised between the writers; the survivor is whichever
  // committed last, and it is always one complete submitted value.
  let final_loc = s.find_by_username("carol").await.unwrap().unwrap().location;
  assert!(targets.contains(&final_loc), "unexpected final location {final_loc:?}");
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_list_alerts() {
  let s = store().await;
  let alice = add(&s, "alice", coord(43.65, -79.38)).await;

  let mut sms = NewAlert::new(alice.user_id, "Work", 7, coord(43.64, -79.39));
  sms.alert_method = Some("sms".into());
  sms.mobile_number = Some("+15555550100".into());

  let a1 = s
    .add_alert(NewAlert::new(alice.user_id, "Home", 5, coord(43.65, -79.38)))
    .await
    .unwrap();
  let a2 = s.add_alert(sms).await.unwrap();
  assert!(a1.is_active);

  let alerts = s.list_alerts(alice.user_id).await.unwrap();
  assert_eq!(alerts.len(), 2);
  assert_eq!(alerts[0].alert_id, a1.alert_id);
  assert_eq!(alerts[1], a2);
  assert_eq!(alerts[1].mobile_number.as_deref(), Some("+15555550100"));
}

#[tokio::test]
async fn alerts_are_scoped_to_their_user() {
  let s = store().await;
  let alice = add(&s, "alice", coord(0.0, 0.0)).await;
  let bob = add(&s, "bob", coord(0.0, 0.0)).await;
  s.add_alert(NewAlert::new(alice.user_id, "Home", 5, coord(0.0, 0.0)))
    .await
    .unwrap();

  assert!(s.list_alerts(bob.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn alert_for_unknown_user_is_rejected() {
  let s = store().await;
  let ghost = Uuid::new_v4();

  let err = s
    .add_alert(NewAlert::new(ghost, "Nowhere", 3, coord(0.0, 0.0)))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UserNotFound(id) if id == ghost), "{err:?}");
}

#[tokio::test]
async fn alert_location_is_independent_of_user_location() {
  let s = store().await;
  let alice = add(&s, "alice", coord(1.0, 1.0)).await;
  s.add_alert(NewAlert::new(alice.user_id, "Cottage", 4, coord(45.0, -78.0)))
    .await
    .unwrap();

  s.set_location(alice.user_id, coord(2.0, 2.0)).await.unwrap();

  let alerts = s.list_alerts(alice.user_id).await.unwrap();
  assert_eq!(alerts[0].location, coord(45.0, -78.0));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_store_keeps_locations() {
  let path = std::env::temp_dir().join(format!("aqhi-store-{}.db", Uuid::new_v4()));

  {
    let s = SqliteStore::open(&path).await.unwrap();
    let alice = add(&s, "alice", coord(0.0, 0.0)).await;
    s.set_location(alice.user_id, coord(51.05, -114.07)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let alice = s.find_by_username("alice").await.unwrap().unwrap();
  assert_eq!(alice.location, coord(51.05, -114.07));

  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
  }
}
