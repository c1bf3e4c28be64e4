mod common;

use http::StatusCode;
use http::header::SET_COOKIE;
use stash::predicates::ConfigFlag;
use stash::{
    CACHED_RESPONSE_KEY, CacheError, CacheInterceptor, CacheStorage, CacheStorageError,
    Evaluation, Outcome, PredicateError, RequestConfig,
};
use stash_core::{Predicate, from_fn, try_from_fn};
use stash_http::{CachedResponse, ReplayFilter, RequestContext, ResponseContext};

use common::{ErrorBackend, TestBackend, URL, get, get_with, network_response};

/// Drives one request through the interceptor the way a host client does.
///
/// Returns the response handed to the caller and the final request config.
async fn send<C, F>(
    interceptor: &CacheInterceptor<TestBackend, stash_http::extractors::DefaultFingerprint, C, F>,
    mut request: RequestContext,
    network: &mut Vec<&'static str>,
    body: &'static str,
) -> (CachedResponse, RequestConfig)
where
    C: Predicate<Subject = ResponseContext> + Send + Sync,
    F: Predicate<Subject = RequestContext> + Send + Sync,
{
    match interceptor.setup(&mut request).await.unwrap() {
        Outcome::ServeCached(response) => (response, request.into_config()),
        Outcome::Proceed => {
            network.push(body);
            let response = network_response(StatusCode::OK, body);
            let context = ResponseContext::new(request, Some(response));
            interceptor.evaluate(&context).await.unwrap();
            let (request, response) = context.into_parts();
            (response.unwrap(), request.into_config())
        }
    }
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::new(CacheStorage::new(backend.clone()));
    let mut network = Vec::new();

    let (first, config) = send(&interceptor, get(URL), &mut network, "first").await;
    assert!(!config.served_from_cache());
    assert_eq!(first.body().as_ref(), b"first");

    let (second, config) = send(&interceptor, get(URL), &mut network, "second").await;
    assert!(config.served_from_cache());
    assert_eq!(config.get_bool(CACHED_RESPONSE_KEY), Some(true));
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.body().as_ref(), b"first");
    assert_eq!(network, ["first"]);
    assert_eq!(backend.writes(), 1);
}

#[tokio::test]
async fn test_must_be_fresh_deletes_entry_and_goes_to_network() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());
    storage
        .store(&get(URL), &network_response(StatusCode::OK, "stale"))
        .await
        .unwrap();

    let interceptor = CacheInterceptor::builder()
        .storage(storage)
        .must_be_fresh(from_fn(|_: &RequestContext| true))
        .can_cache(from_fn(|_: &ResponseContext| false))
        .build();

    let mut request = get(URL);
    assert_eq!(interceptor.setup(&mut request).await.unwrap(), Outcome::Proceed);
    assert!(!request.config().served_from_cache());
    assert_eq!(backend.len(), 0);
    assert_eq!(backend.removes(), 1);
    assert_eq!(backend.reads(), 0);
}

#[tokio::test]
async fn test_must_be_fresh_without_entry_still_proceeds() {
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(TestBackend::new()))
        .must_be_fresh(from_fn(|_: &RequestContext| true))
        .build();
    let mut request = get(URL);
    assert_eq!(interceptor.setup(&mut request).await.unwrap(), Outcome::Proceed);
}

#[tokio::test]
async fn test_can_cache_false_never_stores() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(backend.clone()))
        .can_cache(from_fn(|_: &ResponseContext| false))
        .build();
    let mut network = Vec::new();

    send(&interceptor, get(URL), &mut network, "one").await;
    send(&interceptor, get(URL), &mut network, "two").await;

    assert_eq!(network, ["one", "two"]);
    assert_eq!(backend.writes(), 0);
    assert_eq!(backend.len(), 0);
}

#[tokio::test]
async fn test_cookies_are_scrubbed_on_hits_only() {
    let interceptor = CacheInterceptor::new(CacheStorage::new(TestBackend::new()));
    let mut network = Vec::new();

    let (fresh, _) = send(&interceptor, get(URL), &mut network, "body").await;
    assert_eq!(fresh.headers()[SET_COOKIE], "session=abc");

    let (cached, config) = send(&interceptor, get(URL), &mut network, "body").await;
    assert!(config.served_from_cache());
    assert!(!cached.headers().contains_key(SET_COOKIE));
    assert_eq!(cached.headers()["content-type"], "text/plain");

    // The stored entry keeps the cookie; only the replayed copy loses it.
    let stored = interceptor.storage().fetch(&get(URL)).await.unwrap().unwrap();
    assert_eq!(stored.headers()[SET_COOKIE], "session=abc");
}

#[tokio::test]
async fn test_custom_replay_filter() {
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(TestBackend::new()))
        .replay_filter(ReplayFilter::empty())
        .build();
    let mut network = Vec::new();

    send(&interceptor, get(URL), &mut network, "body").await;
    let (cached, _) = send(&interceptor, get(URL), &mut network, "body").await;
    assert_eq!(cached.headers()[SET_COOKIE], "session=abc");
}

#[tokio::test]
async fn test_five_request_scenario() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(backend.clone()))
        .must_be_fresh(ConfigFlag::<RequestContext>::new("requestFresh", false))
        .can_cache(ConfigFlag::<ResponseContext>::new("canCacheRequest", true))
        .build();
    let mut network = Vec::new();

    let steps = [
        RequestConfig::new(),
        RequestConfig::new(),
        RequestConfig::new()
            .with("requestFresh", true)
            .with("canCacheRequest", false),
        RequestConfig::new(),
        RequestConfig::new(),
    ];
    let bodies = ["r1", "r2", "r3", "r4", "r5"];

    let mut flags = Vec::new();
    let mut served = Vec::new();
    for (config, body) in steps.into_iter().zip(bodies) {
        let (response, config) = send(&interceptor, get_with(URL, config), &mut network, body).await;
        flags.push(config.served_from_cache());
        served.push(String::from_utf8(response.body().to_vec()).unwrap());
    }

    assert_eq!(flags, [false, true, false, false, true]);
    assert_eq!(network, ["r1", "r3", "r4"]);
    assert_eq!(served, ["r1", "r1", "r3", "r4", "r4"]);
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_evaluate_without_response_is_a_no_op() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(backend.clone()))
        .can_cache(try_from_fn(|_: &ResponseContext| {
            Err(PredicateError::new("must not be called"))
        }))
        .build();

    let context = ResponseContext::new(get(URL), None);
    assert_eq!(
        interceptor.evaluate(&context).await.unwrap(),
        Evaluation::NoResponse
    );
    assert_eq!(backend.reads() + backend.writes(), 0);
}

#[tokio::test]
async fn test_evaluate_skips_replayed_responses() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::new(CacheStorage::new(backend.clone()));
    let config = RequestConfig::new().with(CACHED_RESPONSE_KEY, true);
    let context = ResponseContext::new(
        get_with(URL, config),
        Some(network_response(StatusCode::OK, "cached")),
    );

    assert_eq!(
        interceptor.evaluate(&context).await.unwrap(),
        Evaluation::Replayed
    );
    assert_eq!(backend.reads() + backend.writes(), 0);
}

#[tokio::test]
async fn test_config_reused_from_a_hit_starts_clean() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::new(CacheStorage::new(backend.clone()));
    let mut network = Vec::new();

    send(&interceptor, get(URL), &mut network, "home").await;
    let (_, replayed) = send(&interceptor, get(URL), &mut network, "home").await;
    assert!(replayed.served_from_cache());

    let other = "http://www.example.com/other";
    let (response, config) = send(&interceptor, get_with(other, replayed), &mut network, "other").await;
    assert!(!config.served_from_cache());
    assert_eq!(response.body().as_ref(), b"other");
    assert_eq!(network, ["home", "other"]);
    assert_eq!(backend.writes(), 2);
    assert_eq!(backend.len(), 2);
}

#[tokio::test]
async fn test_evaluate_outcomes() {
    let backend = TestBackend::new();
    let interceptor = CacheInterceptor::new(CacheStorage::new(backend.clone()));
    let context = ResponseContext::new(get(URL), Some(network_response(StatusCode::OK, "a")));

    assert_eq!(interceptor.evaluate(&context).await.unwrap(), Evaluation::Stored);
    assert_eq!(
        interceptor.evaluate(&context).await.unwrap(),
        Evaluation::AlreadyCached
    );
    assert_eq!(backend.writes(), 1);
}

#[tokio::test]
async fn test_predicate_errors_propagate() {
    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(TestBackend::new()))
        .must_be_fresh(try_from_fn(|_: &RequestContext| {
            Err(PredicateError::new("freshness oracle unavailable"))
        }))
        .build();
    let mut request = get(URL);
    let error = interceptor.setup(&mut request).await.unwrap_err();
    assert!(matches!(error, CacheError::Predicate(_)));
    assert!(error.to_string().contains("freshness oracle unavailable"));

    let interceptor = CacheInterceptor::builder()
        .storage(CacheStorage::new(TestBackend::new()))
        .can_cache(try_from_fn(|_: &ResponseContext| {
            Err(PredicateError::new("policy lookup failed"))
        }))
        .build();
    let context = ResponseContext::new(get(URL), Some(network_response(StatusCode::OK, "a")));
    assert!(matches!(
        interceptor.evaluate(&context).await,
        Err(CacheError::Predicate(_))
    ));
}

#[tokio::test]
async fn test_storage_errors_propagate() {
    let interceptor = CacheInterceptor::new(CacheStorage::new(ErrorBackend));
    let mut request = get(URL);
    assert!(matches!(
        interceptor.setup(&mut request).await,
        Err(CacheError::Storage(CacheStorageError::Backend(_)))
    ));
    assert!(!request.config().served_from_cache());
}

#[tokio::test]
async fn test_corrupted_entry_fails_setup() {
    let backend = TestBackend::new();
    let storage = CacheStorage::new(backend.clone());
    backend.put_raw(&storage.fingerprint(&get(URL)), b"not json");
    let interceptor = CacheInterceptor::new(storage);

    let mut request = get(URL);
    assert!(matches!(
        interceptor.setup(&mut request).await,
        Err(CacheError::Storage(CacheStorageError::Corrupted { .. }))
    ));
}
