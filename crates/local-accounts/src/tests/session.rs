use chrono::Duration;
use reader_store::keys;

use super::test_service;
use crate::clock::Clock;
use crate::models::{SESSION_LIFETIME_HOURS, Session};

#[test]
fn test_session_expires_lazily() {
    let (svc, clock) = test_service();
    svc.register("hawa", "sabar123").unwrap();

    let session = svc.session().unwrap();
    assert_eq!(
        session.expires_at - session.created_at,
        Duration::hours(SESSION_LIFETIME_HOURS)
    );

    clock.advance(Duration::hours(23));
    assert!(svc.is_logged_in());

    clock.advance(Duration::hours(1));
    assert!(svc.current_user().is_none());
    assert!(svc.db.get_raw(keys::SESSION).is_none());
    assert!(svc.db.get_raw(keys::CURRENT_USER).is_none());
}

#[test]
fn test_extend_session() {
    let (svc, clock) = test_service();
    svc.register("adam", "sabar123").unwrap();

    clock.advance(Duration::hours(20));
    let extended = svc.extend_session().unwrap();
    assert_eq!(extended.expires_at, clock.now() + Duration::hours(24));

    clock.advance(Duration::hours(20));
    assert!(svc.is_logged_in());
}

#[test]
fn test_invalidated_session_logs_out() {
    let (svc, _) = test_service();
    svc.register("sarah", "sabar123").unwrap();

    let mut session = svc.session().unwrap();
    session.is_valid = false;
    svc.db.set_json(keys::SESSION, &session);

    assert!(svc.current_user().is_none());
    assert!(svc.session().is_none());
}

#[test]
fn test_corrupt_session_logs_out() {
    let (svc, _) = test_service();
    svc.register("hajar", "sabar123").unwrap();
    svc.db.set_raw(keys::SESSION, "{not json");

    assert!(svc.current_user().is_none());
    assert!(svc.db.get_raw(keys::SESSION).is_none());
    assert!(svc.db.get_raw(keys::CURRENT_USER).is_none());
}

#[test]
fn test_current_user_rebuilt_when_cache_missing() {
    let (svc, _) = test_service();
    let user = svc.register("ismail", "sabar123").unwrap();
    svc.db.remove(keys::CURRENT_USER);

    assert_eq!(svc.current_user().unwrap(), user);
    assert!(svc.db.get_raw(keys::CURRENT_USER).is_some());
}

#[test]
fn test_login_replaces_previous_session() {
    let (svc, _) = test_service();
    let first = svc.register("ali", "sabar123").unwrap();
    let second = svc.register("umar", "sabar123").unwrap();
    assert_eq!(svc.current_user().unwrap().id, second.id);

    let old_token = svc.session().unwrap().token;
    let again = svc.login("ali", "sabar123").unwrap();
    assert_eq!(again.id, first.id);

    let session: Session = svc.session().unwrap();
    assert_ne!(session.token, old_token);
    assert_eq!(session.user_id, first.id);
}
