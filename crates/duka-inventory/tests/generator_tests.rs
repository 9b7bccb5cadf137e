//! Functional tests for catalogue generation.
//!
//! The generator is exercised through a mocked content client (failure
//! classes, decoration) and through the real Gemini client pointed at a
//! local fake API (wire format, headers, status handling).

use async_trait::async_trait;
use duka_inventory::{
    ClientError, ContentClient, ContentRequest, GeminiClient, GenerationError, GeneratorConfig,
    InventoryGenerator, InventorySource,
};
use duka_model::{BuildingId, Store, StoreId};
use mockall::mock;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;
use warp::Filter;

mock! {
    pub Client {}

    #[async_trait]
    impl ContentClient for Client {
        async fn generate(&self, request: &ContentRequest) -> Result<String, ClientError>;
    }
}

fn artcaffe() -> Store {
    Store {
        id: StoreId::from("s2"),
        building_id: BuildingId::from("b1"),
        name: "Artcaffe".to_string(),
        category: "Restaurant".to_string(),
        floor: 0,
        description: "Nairobi's favorite spot for coffee and fresh pastries.".to_string(),
        rating: 4.7,
        image: "https://picsum.photos/seed/artcaffe/400/300".to_string(),
    }
}

fn menu_reply() -> String {
    json!([
        {"name": "Masala Chai", "price": "KSh 250", "description": "Spiced tea", "category": "Hot Drinks", "tags": ["chai", "local"]},
        {"name": "Cappuccino", "price": "KSh 380", "description": "Kenyan AA beans", "category": "Hot Drinks", "tags": ["coffee"]},
        {"name": "Mandazi Basket", "price": "KSh 300", "description": "Fresh mandazi", "category": "Pastries", "tags": ["snack"]}
    ])
    .to_string()
}

fn generator_with(mock: MockClient) -> InventoryGenerator {
    InventoryGenerator::new(Arc::new(mock))
}

#[tokio::test]
async fn successful_reply_is_decorated() {
    let mut mock = MockClient::new();
    mock.expect_generate()
        .times(1)
        .withf(|req| req.prompt.contains("\"Artcaffe\"") && req.response_schema["type"] == "ARRAY")
        .returning(|_| Ok(menu_reply()));

    let products = generator_with(mock).generate(&artcaffe()).await;

    let ids: Vec<_> = products.iter().map(|p| p.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["prod-s2-0", "prod-s2-1", "prod-s2-2"]);
    assert!(products.iter().all(|p| p.store_id.as_str() == "s2"));
    assert_eq!(products[2].image, "https://picsum.photos/seed/Artcaffe-2/400/400");
    assert_eq!(products[0].category.as_str(), "Hot Drinks");
}

#[tokio::test]
async fn network_failure_serves_fallback() {
    let mut mock = MockClient::new();
    mock.expect_generate()
        .times(1)
        .returning(|_| Err(ClientError::Http("connection reset".to_string())));

    let products = generator_with(mock).inventory_for(&artcaffe()).await;

    assert_eq!(products.len(), 1);
    assert!(products[0].id.as_str().starts_with("fallback-"));
    assert_eq!(products[0].store_id, artcaffe().id);
    assert_eq!(products[0].price, "KSh 2,500");
}

#[tokio::test]
async fn parse_failure_serves_fallback() {
    let mut mock = MockClient::new();
    mock.expect_generate()
        .returning(|_| Ok("Here is your catalogue: ...".to_string()));

    let generator = generator_with(mock);

    assert!(matches!(
        generator.try_generate(&artcaffe()).await,
        Err(GenerationError::Parse(_))
    ));

    let products = generator.generate(&artcaffe()).await;
    assert_eq!(products.len(), 1);
    assert!(products[0].id.as_str().starts_with("fallback-"));
}

#[tokio::test]
async fn schema_mismatch_serves_fallback() {
    let mut mock = MockClient::new();
    mock.expect_generate()
        .returning(|_| Ok(r#"[{"name": "Chai", "price": "KSh 250"}]"#.to_string()));

    let generator = generator_with(mock);

    assert!(matches!(
        generator.try_generate(&artcaffe()).await,
        Err(GenerationError::SchemaMismatch(_))
    ));
    assert_eq!(generator.generate(&artcaffe()).await.len(), 1);
}

async fn spawn_fake_api(status: StatusCode, body: Value) -> (SocketAddr, Arc<Mutex<Vec<(String, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let route = warp::post()
        .and(warp::path!("v1beta" / "models" / String))
        .and(warp::header::<String>("x-goog-api-key"))
        .and(warp::body::json())
        .map(move |endpoint: String, key: String, request: Value| {
            recorder.lock().unwrap().push((format!("{endpoint}|{key}"), request));
            warp::reply::with_status(warp::reply::json(&body), status)
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    (addr, seen)
}

fn gemini_for(addr: SocketAddr) -> GeminiClient {
    let config = GeneratorConfig::new()
        .with_base_url(format!("http://{addr}/v1beta"))
        .with_model("gemini-test")
        .with_api_key("test-key");
    GeminiClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn gemini_client_round_trip() {
    let body = json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": menu_reply()}]}}]
    });
    let (addr, seen) = spawn_fake_api(StatusCode::OK, body).await;

    let generator = InventoryGenerator::new(Arc::new(gemini_for(addr)));
    let products = generator.try_generate(&artcaffe()).await.unwrap();
    assert_eq!(products.len(), 3);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (target, request) = &seen[0];
    assert_eq!(target, "gemini-test:generateContent|test-key");
    assert_eq!(request["generationConfig"]["responseMimeType"], "application/json");
    assert!(request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Artcaffe"));
}

#[tokio::test]
async fn gemini_client_surfaces_status() {
    let (addr, _) = spawn_fake_api(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "quota exceeded"}}),
    )
    .await;

    let err = gemini_for(addr)
        .generate(&InventoryGenerator::request_for(&artcaffe()))
        .await
        .unwrap_err();

    match err {
        ClientError::HttpStatus { code, message } => {
            assert_eq!(code, 429);
            assert!(message.contains("quota"));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_client_rejects_empty_candidates() {
    let (addr, _) = spawn_fake_api(StatusCode::OK, json!({"candidates": []})).await;

    let generator = InventoryGenerator::new(Arc::new(gemini_for(addr)));
    let err = generator.try_generate(&artcaffe()).await.unwrap_err();
    assert!(matches!(err, GenerationError::Client(ClientError::EmptyCandidate)));

    let products = generator.generate(&artcaffe()).await;
    assert_eq!(products[0].id.as_str(), "fallback-1");
}
