//! Session persistence over the sqlite backend.

use inkwell_lib::session::{ACCESS_KEY, EXP_KEY, Session};
use inkwell_lib::storage::{MemoryBackend, SqliteBackend, Storage};

async fn open(path: &std::path::Path) -> (Storage, Session) {
    let storage = Storage::new(SqliteBackend::open(path).await.unwrap());
    let session = Session::open(storage.clone()).await.unwrap();
    (storage, session)
}

#[tokio::test]
async fn test_tokens_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    {
        let (_, session) = open(&path).await;
        session
            .set_access_token(Some("access-1"), Some(4_000_000_000))
            .await
            .unwrap();
        session.set_refresh_token(Some("refresh-1")).await.unwrap();
    }

    let (_, session) = open(&path).await;
    assert_eq!(session.access_token().as_deref(), Some("access-1"));
    assert_eq!(session.token_exp(), Some(4_000_000_000));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
    assert!(session.is_access_token_valid());
}

#[tokio::test]
async fn test_clear_removes_persisted_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    {
        let (_, session) = open(&path).await;
        session.set_access_token(Some("access-1"), Some(1)).await.unwrap();
        session.clear().await.unwrap();
    }

    let (storage, session) = open(&path).await;
    assert!(!session.is_access_token_valid());
    assert_eq!(session.refresh_token(), None);
    assert_eq!(storage.get::<String>(ACCESS_KEY).await.unwrap(), None);
    assert_eq!(storage.get::<i64>(EXP_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_prefix_listing_is_sorted() {
    let storage = Storage::new(SqliteBackend::open_in_memory().await.unwrap());
    storage.set("pref.rows", &10usize).await.unwrap();
    storage.set("pref.env", &"dev".to_string()).await.unwrap();
    storage.set("other", &1u8).await.unwrap();

    assert_eq!(
        storage.keys_with_prefix("pref.").await.unwrap(),
        vec!["pref.env".to_string(), "pref.rows".to_string()]
    );
    assert_eq!(storage.get::<usize>("pref.missing").await.unwrap(), None);
}

#[tokio::test]
async fn test_prefix_is_matched_literally_by_both_backends() {
    let sqlite = Storage::new(SqliteBackend::open_in_memory().await.unwrap());
    let memory = Storage::new(MemoryBackend::new());

    for storage in [&sqlite, &memory] {
        for key in ["ui_a", "uiXa", "UI_b", "50%.off", "500.off"] {
            storage.set(key, &0u8).await.unwrap();
        }
    }

    for storage in [&sqlite, &memory] {
        assert_eq!(storage.keys_with_prefix("ui_").await.unwrap(), vec!["ui_a".to_string()]);
        assert_eq!(storage.keys_with_prefix("50%").await.unwrap(), vec!["50%.off".to_string()]);
    }
}
