use super::Database;
use crate::error::AppError;
use crate::models::paste::{ListQuery, Paste, UpdatePasteRequest};
use crate::models::user::User;
use chrono::{Duration, Utc};
use std::sync::Arc;

fn setup_test_db() -> (Database, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().to_str().unwrap()).unwrap();
    (db, dir)
}

fn paste(content: &str) -> Paste {
    Paste::new(content.to_string())
}

#[test]
fn create_then_get_round_trips() {
    let (db, _dir) = setup_test_db();
    let mut p = paste("hello world");
    p.title = Some("greeting".to_string());
    p.language = "python".to_string();
    let stored = db.pastes.create(p).unwrap();

    let fetched = db.pastes.get(&stored.id).unwrap().unwrap();
    assert_eq!(fetched.content, "hello world");
    assert_eq!(fetched.title.as_deref(), Some("greeting"));
    assert_eq!(fetched.language, "python");
    assert_eq!(fetched.views, 0);
}

#[test]
fn get_missing_returns_none() {
    let (db, _dir) = setup_test_db();
    assert!(db.pastes.get("absent01").unwrap().is_none());
}

#[test]
fn insert_duplicate_id_is_conflict() {
    let (db, _dir) = setup_test_db();
    let p = db.pastes.create(paste("first")).unwrap();
    let mut dup = paste("second");
    dup.id = p.id.clone();
    assert!(matches!(
        db.pastes.insert(&dup),
        Err(AppError::Conflict(_))
    ));
    // The original row is untouched.
    assert_eq!(db.pastes.get(&p.id).unwrap().unwrap().content, "first");
}

#[test]
fn create_regenerates_id_on_collision() {
    let (db, _dir) = setup_test_db();
    let existing = db.pastes.create(paste("first")).unwrap();
    let mut colliding = paste("second");
    colliding.id = existing.id.clone();
    let stored = db.pastes.create(colliding).unwrap();
    assert_ne!(stored.id, existing.id);
    assert_eq!(db.pastes.get(&stored.id).unwrap().unwrap().content, "second");
}

#[test]
fn concurrent_views_are_not_lost() {
    let (db, _dir) = setup_test_db();
    let id = db.pastes.create(paste("counted")).unwrap().id;

    let db = Arc::new(db);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        let id = id.clone();
        handles.push(std::thread::spawn(move || {
            for _ in 0..5 {
                db.pastes.record_view(&id).unwrap().unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.pastes.get(&id).unwrap().unwrap().views, 40);
}

#[test]
fn update_applies_partial_fields() {
    let (db, _dir) = setup_test_db();
    let stored = db.pastes.create(paste("v1")).unwrap();

    let update = UpdatePasteRequest {
        content: Some("v2".to_string()),
        is_public: Some(false),
        ..Default::default()
    };
    let updated = db.pastes.update(&stored.id, &update).unwrap().unwrap();
    assert_eq!(updated.content, "v2");
    assert!(!updated.is_public);
    // Untouched fields survive.
    assert_eq!(updated.language, stored.language);
    assert_eq!(updated.created_at, stored.created_at);

    assert!(db.pastes.update("absent01", &update).unwrap().is_none());
}

#[test]
fn update_trims_titles_and_clears_blank_ones() {
    let (db, _dir) = setup_test_db();
    let stored = db.pastes.create(paste("x")).unwrap();

    let padded = UpdatePasteRequest {
        title: Some("  spaced out  ".to_string()),
        ..Default::default()
    };
    let updated = db.pastes.update(&stored.id, &padded).unwrap().unwrap();
    assert_eq!(updated.title.as_deref(), Some("spaced out"));

    let blank = UpdatePasteRequest {
        title: Some("   ".to_string()),
        ..Default::default()
    };
    let cleared = db.pastes.update(&stored.id, &blank).unwrap().unwrap();
    assert_eq!(cleared.title, None);
}

#[test]
fn delete_removes_row_and_listing_entry() {
    let (db, _dir) = setup_test_db();
    let stored = db.pastes.create(paste("doomed")).unwrap();
    assert!(db.pastes.delete(&stored.id).unwrap());
    assert!(!db.pastes.delete(&stored.id).unwrap());
    assert!(db.pastes.get(&stored.id).unwrap().is_none());

    let page = db.pastes.list_public(&ListQuery::default()).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn list_excludes_private_and_expired() {
    let (db, _dir) = setup_test_db();
    db.pastes.create(paste("visible")).unwrap();

    let mut private = paste("private");
    private.is_public = false;
    db.pastes.create(private).unwrap();

    let mut expired = paste("expired");
    expired.expires_at = Some(Utc::now() - Duration::minutes(1));
    db.pastes.create(expired).unwrap();

    let page = db.pastes.list_public(&ListQuery::default()).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].content, "visible");
}

#[test]
fn list_is_newest_first_with_pagination_metadata() {
    let (db, _dir) = setup_test_db();
    for n in 0..5 {
        let mut p = paste(&format!("paste {}", n));
        // Force distinct, ordered timestamps.
        p.created_at = Utc::now() - Duration::minutes(10 - n);
        db.pastes.create(p).unwrap();
    }

    let query = ListQuery {
        per_page: Some(2),
        ..Default::default()
    };
    let page1 = db.pastes.list_public(&query).unwrap();
    assert_eq!(page1.total, 5);
    assert_eq!(page1.pages, 3);
    assert_eq!(page1.items[0].content, "paste 4");
    assert_eq!(page1.items[1].content, "paste 3");
    assert!(page1.has_next);
    assert!(!page1.has_prev);

    let query = ListQuery {
        page: Some(3),
        per_page: Some(2),
        ..Default::default()
    };
    let page3 = db.pastes.list_public(&query).unwrap();
    assert_eq!(page3.items.len(), 1);
    assert_eq!(page3.items[0].content, "paste 0");
    assert!(!page3.has_next);
    assert!(page3.has_prev);
}

#[test]
fn list_filters_by_language_and_search() {
    let (db, _dir) = setup_test_db();
    let mut py = paste("print('needle')");
    py.language = "python".to_string();
    db.pastes.create(py).unwrap();

    let mut js = paste("console.log('other')");
    js.language = "javascript".to_string();
    js.title = Some("Needle in title".to_string());
    db.pastes.create(js).unwrap();

    let by_language = db
        .pastes
        .list_public(&ListQuery {
            language: Some("Python".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_language.total, 1);
    assert_eq!(by_language.items[0].language, "python");

    // Search matches content and title, case-insensitively.
    let by_search = db
        .pastes
        .list_public(&ListQuery {
            search: Some("NEEDLE".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_search.total, 2);
}

#[test]
fn by_owner_includes_private_pastes() {
    let (db, _dir) = setup_test_db();
    let mut owned = paste("mine");
    owned.user_id = Some("user-1".to_string());
    owned.is_public = false;
    db.pastes.create(owned).unwrap();
    db.pastes.create(paste("anonymous")).unwrap();

    let owned = db.pastes.by_owner("user-1").unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].content, "mine");
    assert!(db.pastes.by_owner("user-2").unwrap().is_empty());
}

#[test]
fn stats_count_public_languages() {
    let (db, _dir) = setup_test_db();
    for _ in 0..2 {
        let mut p = paste("x");
        p.language = "python".to_string();
        db.pastes.create(p).unwrap();
    }
    let mut private = paste("y");
    private.is_public = false;
    db.pastes.create(private).unwrap();

    let stats = db.pastes.stats().unwrap();
    assert_eq!(stats.total_pastes, 3);
    assert_eq!(stats.public_pastes, 2);
    assert_eq!(stats.top_languages[0].language, "python");
    assert_eq!(stats.top_languages[0].count, 2);
}

#[test]
fn duplicate_username_and_email_are_conflicts() {
    let (db, _dir) = setup_test_db();
    let user = User::new("alice".to_string(), "alice@example.com".to_string(), "pw123456").unwrap();
    db.users.create(&user).unwrap();

    // Case-insensitive on both keys.
    let same_name =
        User::new("ALICE".to_string(), "other@example.com".to_string(), "pw123456").unwrap();
    assert!(matches!(
        db.users.create(&same_name),
        Err(AppError::Conflict(msg)) if msg.contains("Username")
    ));
    let same_email =
        User::new("bob".to_string(), "Alice@Example.com".to_string(), "pw123456").unwrap();
    assert!(matches!(
        db.users.create(&same_email),
        Err(AppError::Conflict(msg)) if msg.contains("Email")
    ));

    assert_eq!(db.users.count().unwrap(), 1);
}

#[test]
fn username_lookup_is_case_insensitive() {
    let (db, _dir) = setup_test_db();
    let user = User::new("Carol".to_string(), "carol@example.com".to_string(), "pw123456").unwrap();
    db.users.create(&user).unwrap();

    let found = db.users.get_by_username("carol").unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.username, "Carol");
    assert!(db.users.get_by_username("dave").unwrap().is_none());
}

#[test]
fn session_lifecycle() {
    let (db, _dir) = setup_test_db();
    let user = User::new("erin".to_string(), "erin@example.com".to_string(), "pw123456").unwrap();
    db.users.create(&user).unwrap();

    let token = db.users.create_session(&user.id).unwrap();
    assert_eq!(token.len(), 32);
    let resolved = db.users.session_user(&token).unwrap().unwrap();
    assert_eq!(resolved.id, user.id);

    assert!(db.users.remove_session(&token).unwrap());
    assert!(!db.users.remove_session(&token).unwrap());
    assert!(db.users.session_user(&token).unwrap().is_none());
}
