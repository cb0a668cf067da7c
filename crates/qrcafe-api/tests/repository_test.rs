#![allow(clippy::unwrap_used)]
// Integration tests for the typed repositories using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qrcafe_api::{
    CafeCreate, CafeRepository, CategoryRepository, CategoryUpdate, Error, MenuRepository,
    ProductRepository,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Url) {
    let server = MockServer::start().await;
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    (server, base)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn category(id: i64, sort_order: i32) -> serde_json::Value {
    json!({ "id": id, "cafe_id": 7, "name": format!("Category {id}"), "sort_order": sort_order })
}

// ── CRUD ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_cafe_posts_body() {
    let (server, base) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/cafes/create"))
        .and(body_json(json!({ "owner_id": 5, "name": "Blue Door", "slug": "blue-door" })))
        .respond_with(ok(json!({
            "id": 11, "owner_id": 5, "name": "Blue Door", "slug": "blue-door", "sort_order": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = CafeRepository::new(reqwest::Client::new(), &base);
    let cafe = repo
        .create(&CafeCreate {
            owner_id: 5,
            name: "Blue Door".into(),
            slug: "blue-door".into(),
            description: None,
            logo_url: None,
            currency: None,
        })
        .await
        .unwrap();

    assert_eq!(cafe.id, 11);
    assert_eq!(cafe.slug, "blue-door");
}

#[tokio::test]
async fn test_update_category_uses_put_update() {
    let (server, base) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/categories/update"))
        .and(body_json(json!({ "id": 3, "name": "Hot drinks" })))
        .respond_with(ok(json!({ "id": 3, "cafe_id": 7, "name": "Hot drinks", "sort_order": 2 })))
        .expect(1)
        .mount(&server)
        .await;

    let repo = CategoryRepository::new(reqwest::Client::new(), &base);
    let updated = repo
        .update(&CategoryUpdate {
            id: 3,
            name: Some("Hot drinks".into()),
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Hot drinks");
    assert_eq!(updated.sort_order, 2);
}

#[tokio::test]
async fn test_list_products_returns_display_order() {
    let (server, base) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/products/category/4"))
        .respond_with(ok(json!([
            { "id": 30, "category_id": 4, "name": "Mocha", "price": 4.0, "sort_order": 1 },
            { "id": 12, "category_id": 4, "name": "Latte", "price": 3.5, "sort_order": 1 },
            { "id": 40, "category_id": 4, "name": "Espresso", "price": 2.0, "sort_order": 0 }
        ])))
        .mount(&server)
        .await;

    let repo = ProductRepository::new(reqwest::Client::new(), &base);
    let products = repo.list_by_category(4).await.unwrap();
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();

    // sort_order first, id breaks the tie between 30 and 12
    assert_eq!(ids, vec![40, 12, 30]);
}

#[tokio::test]
async fn test_remove_accepts_boolean_data() {
    let (server, base) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/products/9"))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = ProductRepository::new(reqwest::Client::new(), &base);
    repo.remove(9).await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_client_error_carries_status_and_details() {
    let (server, base) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/cafes/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Cafe not found",
            "details": { "id": 99 }
        })))
        .mount(&server)
        .await;

    let repo = CafeRepository::new(reqwest::Client::new(), &base);
    let err = repo.get(99).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Http {
            status,
            message,
            details,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Cafe not found");
            assert_eq!(details, Some(json!({ "id": 99 })));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_false_envelope_is_an_error() {
    let (server, base) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/categories/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "Not allowed" })),
        )
        .mount(&server)
        .await;

    let repo = CategoryRepository::new(reqwest::Client::new(), &base);
    let err = repo.get(3).await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 200, ref message, .. } if message == "Not allowed"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, base) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/cafes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let repo = CafeRepository::new(reqwest::Client::new(), &base);
    let err = repo.get(1).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 9 locally.
    let base = Url::parse("http://127.0.0.1:9/api").unwrap();
    let repo = CafeRepository::new(reqwest::Client::new(), &base);
    let err = repo.get(1).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {err:?}");
    assert!(err.is_connectivity());
}

// ── Reorder ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reorder_categories_then_list_reads_new_order() {
    let (server, base) = setup().await;

    // Before: [3, 1, 2]
    Mock::given(method("GET"))
        .and(path("/api/categories/cafe/7"))
        .respond_with(ok(json!([category(1, 1), category(2, 2), category(3, 0)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/categories/sort-order"))
        .and(body_json(json!({ "cafe_id": 7, "category_ids": [1, 2, 3] })))
        .respond_with(ok(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    // After: [1, 2, 3]
    Mock::given(method("GET"))
        .and(path("/api/categories/cafe/7"))
        .respond_with(ok(json!([category(3, 2), category(1, 0), category(2, 1)])))
        .mount(&server)
        .await;

    let repo = CategoryRepository::new(reqwest::Client::new(), &base);

    let before: Vec<i64> = repo.list_by_cafe(7).await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(before, vec![3, 1, 2]);

    assert!(repo.reorder(7, &[1_i64, 2, 3]).await.unwrap());

    let after: Vec<i64> = repo.list_by_cafe(7).await.unwrap().iter().map(|c| c.id).collect();
    assert_eq!(after, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_rejects_duplicates_without_network() {
    let (server, base) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ok(json!(true)))
        .expect(0)
        .mount(&server)
        .await;

    let repo = ProductRepository::new(reqwest::Client::new(), &base);
    let err = repo.reorder(4, &[5_i64, 6, 5]).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_reorder_cafes_payload() {
    let (server, base) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/cafes/sort-order"))
        .and(body_json(json!({ "user_id": 5, "cafe_ids": [8, 2] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = CafeRepository::new(reqwest::Client::new(), &base);
    assert!(repo.reorder(5, &[8_i64, 2]).await.unwrap());
}

// ── Public menu ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_menu_by_slug_orders_sections_and_products() {
    let (server, base) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/menu/blue-door"))
        .respond_with(ok(json!({
            "cafe": { "id": 7, "owner_id": 5, "name": "Blue Door", "slug": "blue-door" },
            "categories": [
                { "id": 2, "cafe_id": 7, "name": "Cakes", "sort_order": 1, "products": [] },
                { "id": 1, "cafe_id": 7, "name": "Coffee", "sort_order": 0, "products": [
                    { "id": 5, "category_id": 1, "name": "Latte", "price": 3.5, "sort_order": 1 },
                    { "id": 6, "category_id": 1, "name": "Espresso", "price": 2.0, "sort_order": 0 }
                ]}
            ]
        })))
        .mount(&server)
        .await;

    let repo = MenuRepository::new(reqwest::Client::new(), &base);
    let menu = repo.by_slug("blue-door").await.unwrap();

    assert_eq!(menu.cafe.name, "Blue Door");
    assert_eq!(menu.categories[0].category.name, "Coffee");
    assert_eq!(menu.categories[0].products[0].name, "Espresso");
    assert_eq!(menu.categories[1].category.name, "Cakes");
}

#[tokio::test]
async fn test_menu_empty_slug_is_validation_error() {
    let base = Url::parse("http://127.0.0.1:9/api").unwrap();
    let repo = MenuRepository::new(reqwest::Client::new(), &base);
    assert!(matches!(
        repo.by_slug("  ").await,
        Err(Error::Validation { .. })
    ));
}
