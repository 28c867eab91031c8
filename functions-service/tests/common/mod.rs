#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use functions_service::services::providers::mock::{
    MockCompletionProvider, MockGeocodingProvider, MockImageProvider,
};
use functions_service::services::{MockDatastore, MockStorage};
use functions_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const DEFAULT_COMPLETION: &str =
    r##"{"content":"Hello LinkedIn","hashtags":["#rust"],"callToAction":"Follow for more"}"##;

/// Router wired to in-memory collaborators, with handles kept for
/// inspection after a request.
pub struct TestApp {
    pub router: Router,
    pub datastore: Arc<MockDatastore>,
    pub completion: Arc<MockCompletionProvider>,
    pub storage: Arc<MockStorage>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn error(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("response has no error field")
            .to_string()
    }
}

pub struct TestAppBuilder {
    datastore: Arc<MockDatastore>,
    completion: Arc<MockCompletionProvider>,
    images: Option<Arc<MockImageProvider>>,
    geocoder: Option<Arc<MockGeocodingProvider>>,
    storage: Arc<MockStorage>,
    with_datastore: bool,
    with_completion: bool,
    with_storage: bool,
}

impl TestAppBuilder {
    pub fn completion(mut self, completion: MockCompletionProvider) -> Self {
        self.completion = Arc::new(completion);
        self
    }

    pub fn images(mut self, images: MockImageProvider) -> Self {
        self.images = Some(Arc::new(images));
        self
    }

    pub fn geocoder(mut self, geocoder: MockGeocodingProvider) -> Self {
        self.geocoder = Some(Arc::new(geocoder));
        self
    }

    pub fn datastore(mut self, datastore: MockDatastore) -> Self {
        self.datastore = Arc::new(datastore);
        self
    }

    pub fn storage(mut self, storage: MockStorage) -> Self {
        self.storage = Arc::new(storage);
        self
    }

    pub fn without_datastore(mut self) -> Self {
        self.with_datastore = false;
        self
    }

    pub fn without_completion(mut self) -> Self {
        self.with_completion = false;
        self
    }

    pub fn without_images(mut self) -> Self {
        self.images = None;
        self
    }

    pub fn without_geocoder(mut self) -> Self {
        self.geocoder = None;
        self
    }

    pub fn without_storage(mut self) -> Self {
        self.with_storage = false;
        self
    }

    pub fn build(self) -> TestApp {
        let mut state = AppState::new("functions-service-test");
        if self.with_datastore {
            state = state.with_datastore(self.datastore.clone());
        }
        if self.with_completion {
            state = state.with_completion(self.completion.clone());
        }
        if let Some(images) = self.images {
            state = state.with_images(images);
        }
        if let Some(geocoder) = self.geocoder {
            state = state.with_geocoder(geocoder);
        }
        if self.with_storage {
            state = state.with_storage(self.storage.clone());
        }

        TestApp {
            router: build_router(state),
            datastore: self.datastore,
            completion: self.completion,
            storage: self.storage,
        }
    }
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            datastore: Arc::new(MockDatastore::new()),
            completion: Arc::new(MockCompletionProvider::replying(DEFAULT_COMPLETION)),
            images: Some(Arc::new(MockImageProvider::new())),
            geocoder: Some(Arc::new(MockGeocodingProvider::with_match(
                52.52,
                13.405,
                "Berlin, Germany",
            ))),
            storage: Arc::new(MockStorage::new()),
            with_datastore: true,
            with_completion: true,
            with_storage: true,
        }
    }

    /// Every collaborator present and succeeding.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn request(&self, method: Method, uri: &str, body: Body) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// POST `body` to `/functions/v1/{function}`.
    pub async fn call(&self, function: &str, body: Value) -> TestResponse {
        self.request(
            Method::POST,
            &format!("/functions/v1/{}", function),
            Body::from(body.to_string()),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, Body::empty()).await
    }
}
