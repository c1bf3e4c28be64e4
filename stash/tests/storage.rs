mod common;

use std::sync::Arc;

use http::header::SET_COOKIE;
use http::{HeaderValue, StatusCode};
use stash::{CacheStorage, CacheStorageError};
use stash_backend::{DeleteStatus, ValueFormat};
use stash_http::CachedResponse;
use stash_moka::MokaBackend;

use common::{ErrorBackend, TestBackend, URL, get, network_response};

#[tokio::test]
async fn test_fetch_unknown_fingerprint_is_a_miss() {
    let storage = CacheStorage::new(TestBackend::new());
    assert!(storage.fetch(&get(URL)).await.unwrap().is_none());
    assert!(!storage.contains(&get(URL)).await.unwrap());
}

#[tokio::test]
async fn test_store_then_fetch_returns_a_copy() {
    let storage = CacheStorage::new(TestBackend::new());
    let response = network_response(StatusCode::OK, "first");
    storage.store(&get(URL), &response).await.unwrap();

    let fetched = storage.fetch(&get(URL)).await.unwrap().unwrap();
    assert_eq!(fetched, response);
    assert!(storage.contains(&get(URL)).await.unwrap());
}

#[tokio::test]
async fn test_store_twice_keeps_latest_single_entry() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());

    storage
        .store(&get(URL), &network_response(StatusCode::OK, "first"))
        .await
        .unwrap();
    storage
        .store(&get(URL), &network_response(StatusCode::ACCEPTED, "second"))
        .await
        .unwrap();

    assert_eq!(backend.len(), 1);
    let fetched = storage.fetch(&get(URL)).await.unwrap().unwrap();
    assert_eq!(fetched.status(), StatusCode::ACCEPTED);
    assert_eq!(fetched.body().as_ref(), b"second");
}

#[tokio::test]
async fn test_equivalent_urls_share_an_entry() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());
    storage
        .store(
            &get("http://WWW.example.com:80/search?b=2&a=1"),
            &CachedResponse::new(StatusCode::OK),
        )
        .await
        .unwrap();

    assert!(
        storage
            .fetch(&get("http://www.example.com/search?a=1&b=2"))
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_delete_reports_missing_then_deleted() {
    let storage = CacheStorage::new(TestBackend::new());
    assert_eq!(storage.delete(&get(URL)).await.unwrap(), DeleteStatus::Missing);

    storage
        .store(&get(URL), &CachedResponse::new(StatusCode::OK))
        .await
        .unwrap();
    assert_eq!(
        storage.delete(&get(URL)).await.unwrap(),
        DeleteStatus::Deleted(1)
    );
    assert!(storage.fetch(&get(URL)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupted_entry_is_an_error_not_a_miss() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());
    let key = storage.fingerprint(&get(URL));
    backend.put_raw(&key, b"{\"status\": 200, \"trunc");

    match storage.fetch(&get(URL)).await {
        Err(CacheStorageError::Corrupted { key: corrupted, .. }) => assert_eq!(corrupted, key),
        other => panic!("expected corrupted entry, got {other:?}"),
    }
}

#[tokio::test]
async fn test_backend_failure_propagates() {
    let storage = CacheStorage::new(ErrorBackend);
    assert!(matches!(
        storage.fetch(&get(URL)).await,
        Err(CacheStorageError::Backend(_))
    ));
    assert!(matches!(
        storage
            .store(&get(URL), &CachedResponse::new(StatusCode::OK))
            .await,
        Err(CacheStorageError::Backend(_))
    ));
    assert!(matches!(
        storage.delete(&get(URL)).await,
        Err(CacheStorageError::Backend(_))
    ));
}

#[tokio::test]
async fn test_prefix_and_version_namespace_keys() {
    let backend = Arc::new(TestBackend::new());
    let v1 = CacheStorage::from_shared(Arc::clone(&backend)).with_prefix("app");
    let v2 = v1.clone().with_version(2);

    v1.store(&get(URL), &CachedResponse::new(StatusCode::OK))
        .await
        .unwrap();
    assert!(v2.fetch(&get(URL)).await.unwrap().is_none());
    assert_eq!(
        v2.fingerprint(&get(URL)).to_string(),
        "app:v2:method=GET&url=http://www.example.com/"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stores_leave_one_complete_entry_per_fingerprint() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());
    let urls = ["http://a.example/", "http://b.example/", "http://c.example/"];

    let tasks = (0..60usize).map(|i| {
        let storage = storage.clone();
        let url = urls[i % urls.len()];
        tokio::spawn(async move {
            let body = url.repeat(200);
            storage
                .store(&get(url), &CachedResponse::new(StatusCode::OK).with_body(body))
                .await
                .unwrap();
            storage.fetch(&get(url)).await.unwrap().unwrap()
        })
    });

    for (i, read) in futures::future::join_all(tasks).await.into_iter().enumerate() {
        let read = read.unwrap();
        assert_eq!(read.body().as_ref(), urls[i % urls.len()].repeat(200).as_bytes());
    }
    assert_eq!(backend.len(), urls.len());
}

#[tokio::test]
async fn test_bincode_values_round_trip() {
    let backend = MokaBackend::builder(10)
        .value_format(ValueFormat::Bincode)
        .build();
    let storage = CacheStorage::new(backend);
    let response = network_response(StatusCode::OK, "x")
        .with_header(SET_COOKIE, HeaderValue::from_static("theme=dark"));

    storage.store(&get(URL), &response).await.unwrap();

    let fetched = storage.fetch(&get(URL)).await.unwrap().unwrap();
    assert_eq!(fetched, response);
    let cookies: Vec<_> = fetched.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(cookies, ["session=abc", "theme=dark"]);
}

#[tokio::test]
async fn test_distinct_query_bytes_get_distinct_entries() {
    let storage = CacheStorage::new(TestBackend::new());
    let ff = get("http://example.com/f?id=%FF");
    let fe = get("http://example.com/f?id=%FE");
    assert_ne!(storage.fingerprint(&ff), storage.fingerprint(&fe));

    storage
        .store(&ff, &CachedResponse::new(StatusCode::OK).with_body("file-ff"))
        .await
        .unwrap();
    assert!(storage.fetch(&fe).await.unwrap().is_none());
}
