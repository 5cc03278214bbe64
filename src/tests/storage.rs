use crate::storage::{StoreError, StoreGateway};

#[tokio::test]
async fn test_list_empty_bucket() {
    let store = StoreGateway::in_memory();
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_put_then_get() {
    let store = StoreGateway::in_memory();

    let result = store.put("ash.json", b"{\"name\":\"ash\"}".to_vec()).await.unwrap();
    assert_eq!(result.status_code, 200);

    assert_eq!(store.get_text("ash.json").await.unwrap(), "{\"name\":\"ash\"}");

    let objects = store.list().await.unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "ash.json");
    assert_eq!(objects[0].size, 14);
}

#[tokio::test]
async fn test_put_overwrites() {
    let store = StoreGateway::in_memory();
    store.put("ash.json", b"first".to_vec()).await.unwrap();
    store.put("ash.json", b"second".to_vec()).await.unwrap();

    assert_eq!(store.get("ash.json").await.unwrap(), b"second".to_vec());
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let store = StoreGateway::in_memory();
    let error = store.get("nobody.json").await.unwrap_err();
    assert!(matches!(error, StoreError::NotFound(key) if key == "nobody.json"));
}

#[tokio::test]
async fn test_get_text_rejects_binary() {
    let store = StoreGateway::in_memory();
    store.put("bad.json", vec![0xff, 0xfe]).await.unwrap();

    let error = store.get_text("bad.json").await.unwrap_err();
    assert!(matches!(error, StoreError::InvalidText(_)));
}

#[tokio::test]
async fn test_delete() {
    let store = StoreGateway::in_memory();
    store.put("ash.json", b"{}".to_vec()).await.unwrap();

    let result = store.delete("ash.json").await.unwrap();
    assert_eq!(result.status_code, 204);
    assert!(matches!(
        store.get("ash.json").await,
        Err(StoreError::NotFound(_))
    ));

    // deleting again still reports success
    let result = store.delete("ash.json").await.unwrap();
    assert_eq!(result.status_code, 204);
}

#[tokio::test]
async fn test_exists_matches_whole_key() {
    let store = StoreGateway::in_memory();
    store.put("ash.json", b"{}".to_vec()).await.unwrap();

    assert!(store.exists("ash.json").await.unwrap());
    assert!(!store.exists("as.json").await.unwrap());
    assert!(!store.exists("ash").await.unwrap());
}

#[tokio::test]
async fn test_list_returns_unescaped_keys() {
    let store = StoreGateway::in_memory();
    store.put("a%b.json", b"{}".to_vec()).await.unwrap();
    store.put("ash ketchum.json", b"{}".to_vec()).await.unwrap();

    let mut keys: Vec<_> = store.list().await.unwrap().into_iter().map(|o| o.key).collect();
    keys.sort();
    assert_eq!(keys, vec!["a%b.json", "ash ketchum.json"]);

    assert!(store.exists("a%b.json").await.unwrap());
    assert_eq!(store.get_text("a%b.json").await.unwrap(), "{}");
}
