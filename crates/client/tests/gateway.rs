mod common;

use std::sync::Arc;

use common::{MockServer, client, client_with_policy, logged_in_storage, ok};
use serde_json::json;
use vitrine_client::storage::REJECTIONS_KEY;
use vitrine_client::vitrine_core::{
    BusinessError, NewCategory, NewPremiumBanner, NewSubcategory, NewThumbnail, Role,
    TopDataInput,
};
use vitrine_client::{
    Body, Error, MemoryStorage, RejectionPolicy, RequestOptions, SessionState, SessionStorage,
    Upload, multipart_form,
};

#[tokio::test]
async fn login_then_list_attaches_bearer_token() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![
        (200, common::LOGIN_OK.to_owned()),
        (200, ok(&json!([{"categoryId": "c1", "name": "Movies"}]))),
    ]);

    let client = client(&base, Arc::new(MemoryStorage::new()));
    assert!(client.session().login("a@b.com", "x").await);
    assert_eq!(client.session().current().unwrap().role, Role::Admin);

    let categories = client.list_main_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Movies");

    let requests = handle.await.unwrap();
    let login = &requests[0];
    assert_eq!(login.method, "POST");
    assert_eq!(login.path, "/admin/login");
    assert_eq!(login.body_json(), json!({"email": "a@b.com", "password": "x"}));
    assert!(login.header("authorization").is_none());

    let list = &requests[1];
    assert_eq!(list.method, "GET");
    assert_eq!(list.path, "/categories/main");
    assert_eq!(list.header("authorization"), Some("Bearer tok123"));
}

#[tokio::test]
async fn logged_out_call_has_no_authorization_header() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, ok(&json!([])))]);

    let client = client(&base, Arc::new(MemoryStorage::new()));
    assert_eq!(client.session().state(), SessionState::LoggedOut);
    client
        .request("/categories/main", RequestOptions::get())
        .await
        .unwrap();

    let requests = handle.await.unwrap();
    assert!(requests[0].header("authorization").is_none());
    assert_eq!(
        requests[0].header("content-type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn json_post_sends_body_and_content_type() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(
        200,
        ok(&json!({"categoryId": "c9", "name": "Series"})),
    )]);

    let client = client(&base, logged_in_storage());
    let created = client
        .create_main_category(&NewCategory {
            name: "Series".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.category_id, "c9");

    let requests = handle.await.unwrap();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].body_json(), json!({"name": "Series"}));
    assert_eq!(
        requests[0].header("content-type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn multipart_call_never_claims_json() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    let sub = NewSubcategory {
        name: "Action".into(),
        title: "Action movies".into(),
        telegram_url: "https://t.me/action".into(),
        is_premium: true,
        parent_category_id: "c1".into(),
    };
    let image = Upload::new("cover.png", "image/png", b"\x89PNG".to_vec());
    client.create_subcategory(&sub, Some(image)).await.unwrap();

    let requests = handle.await.unwrap();
    let req = &requests[0];
    assert_eq!(req.path, "/categories/sub");
    let content_type = req.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(req.header("authorization"), Some("Bearer tok123"));

    let body = req.body_text();
    assert!(body.contains("name=\"isPremium\""));
    assert!(body.contains("name=\"parentCategoryId\""));
    assert!(body.contains("filename=\"cover.png\""));
}

#[tokio::test]
async fn multipart_with_unrelated_override_keeps_boundary_type() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    let form = multipart_form(
        vec![("url", "https://example.com".into())],
        vec![("image", Upload::new("b.jpg", "image/jpeg", vec![0xff, 0xd8]))],
    )
    .unwrap();
    let options = RequestOptions::post()
        .body(Body::Multipart(form))
        .header("X-Requested-With", "vitrine");
    client.request("/banners/premium", options).await.unwrap();

    let requests = handle.await.unwrap();
    let content_type = requests[0].header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert_eq!(requests[0].header("x-requested-with"), Some("vitrine"));
}

#[tokio::test]
async fn override_can_drop_json_content_type() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, Arc::new(MemoryStorage::new()));
    client
        .request(
            "/home",
            RequestOptions::get().without_header("Content-Type"),
        )
        .await
        .unwrap();

    let requests = handle.await.unwrap();
    assert!(requests[0].header("content-type").is_none());
}

#[tokio::test]
async fn non_2xx_is_a_transport_error() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    // Not JSON: the gateway must not try to parse it.
    let handle = server.respond(vec![(500, "<html>oops</html>".to_owned())]);

    let client = client(&base, logged_in_storage());
    let err = client
        .request("/home", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { status: Some(500), .. }));
    handle.await.unwrap();
}

#[tokio::test]
async fn network_failure_is_a_transport_error_without_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client(&base, Arc::new(MemoryStorage::new()));
    let err = client
        .request("/home", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { status: None, .. }));
}

#[tokio::test]
async fn raw_request_returns_unsuccessful_envelope_verbatim() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let body = r#"{"success":false,"message":"Category already exists"}"#;
    let handle = server.respond(vec![(200, body.to_owned()), (200, body.to_owned())]);

    let client = client(&base, logged_in_storage());
    let envelope = client
        .request("/categories/main", RequestOptions::post().json(json!({"name": "x"})))
        .await
        .unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Category already exists"));

    let err = client
        .create_main_category(&NewCategory { name: "x".into() })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Business(BusinessError::Rejected(ref m)) if m == "Category already exists"
    ));
    handle.await.unwrap();
}

#[tokio::test]
async fn repeated_rejections_log_the_session_out() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let denied = r#"{"success":false,"message":"Invalid token"}"#.to_owned();
    let handle = server.respond(vec![(401, denied.clone()), (401, denied)]);

    let storage = logged_in_storage();
    let client = client(&base, Arc::clone(&storage));

    let first = client.home_data().await.unwrap_err();
    assert!(first.is_auth_rejection());
    assert_eq!(client.session().state(), SessionState::LoggedIn);

    client.home_data().await.unwrap_err();
    assert_eq!(client.session().state(), SessionState::LoggedOut);
    assert!(storage.is_empty());
    handle.await.unwrap();
}

#[tokio::test]
async fn raw_requests_do_not_trigger_logout() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(401, "{}".to_owned())]);

    let client = client_with_policy(&base, logged_in_storage(), RejectionPolicy::after(1));
    let err = client
        .request("/home", RequestOptions::get())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(client.session().state(), SessionState::LoggedIn);
    handle.await.unwrap();
}

#[tokio::test]
async fn absent_top_data_is_none() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true,"data":null}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    assert!(client.top_data().await.unwrap().is_none());
    assert_eq!(handle.await.unwrap()[0].path, "/admin/get-top-data");
}

#[tokio::test]
async fn update_top_data_posts_id_with_fields() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true,"message":"updated"}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    let input = TopDataInput {
        title: "Top".into(),
        textdata: "Now streaming".into(),
        ..Default::default()
    };
    let message = client.update_top_data("64f0", &input).await.unwrap();
    assert_eq!(message.as_deref(), Some("updated"));

    let requests = handle.await.unwrap();
    assert_eq!(requests[0].path, "/admin/top-data");
    let body = requests[0].body_json();
    assert_eq!(body["_id"], "64f0");
    assert_eq!(body["textdata"], "Now streaming");
    assert_eq!(body["order"], 1);
}

#[tokio::test]
async fn delete_escapes_identifier() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    client.delete_telegram_link("a/b").await.unwrap();

    let requests = handle.await.unwrap();
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/telegram-links/delete/a%2Fb");
}

#[tokio::test]
async fn thumbnail_upload_uses_thumbnail_field() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    let thumb = NewThumbnail {
        url: "https://example.com/watch".into(),
        searchable_url: "https://example.com/find".into(),
        is_active: false,
    };
    client
        .upload_home_thumbnail(&thumb, Upload::new("t.png", "image/png", vec![1]))
        .await
        .unwrap();

    let body = handle.await.unwrap()[0].body_text();
    assert!(body.contains("name=\"thumbnail\"; filename=\"t.png\""));
    assert!(body.contains("name=\"searchableUrl\""));
}

#[tokio::test]
async fn rejections_accumulate_across_client_instances() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let denied = r#"{"success":false,"message":"Invalid token"}"#.to_owned();
    let handle = server.respond(vec![(401, denied.clone()), (401, denied)]);

    let storage = logged_in_storage();

    // Each run builds a fresh client over the same storage and makes one call.
    let first = client(&base, Arc::clone(&storage));
    assert_eq!(first.list_main_categories().await.unwrap_err().status(), Some(401));
    assert_eq!(first.session().state(), SessionState::LoggedIn);
    assert_eq!(storage.read(REJECTIONS_KEY).unwrap().as_deref(), Some("1"));

    let second = client(&base, Arc::clone(&storage));
    assert_eq!(second.session().state(), SessionState::LoggedIn);
    assert_eq!(second.list_main_categories().await.unwrap_err().status(), Some(401));
    assert_eq!(second.session().state(), SessionState::LoggedOut);
    assert!(storage.is_empty());

    let third = client(&base, storage);
    assert_eq!(third.session().state(), SessionState::LoggedOut);
    handle.await.unwrap();
}

#[tokio::test]
async fn success_in_another_run_resets_persisted_rejections() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let denied = r#"{"success":false}"#.to_owned();
    let handle = server.respond(vec![
        (401, denied.clone()),
        (200, ok(&json!([]))),
        (401, denied),
    ]);

    let storage = logged_in_storage();
    client(&base, Arc::clone(&storage))
        .list_main_categories()
        .await
        .unwrap_err();
    client(&base, Arc::clone(&storage))
        .list_main_categories()
        .await
        .unwrap();
    assert!(storage.read(REJECTIONS_KEY).unwrap().is_none());

    let last = client(&base, Arc::clone(&storage));
    last.list_main_categories().await.unwrap_err();
    assert_eq!(last.session().state(), SessionState::LoggedIn);
    handle.await.unwrap();
}

#[tokio::test]
async fn home_screen_banner_upload_sends_url_part() {
    let server = MockServer::start().await;
    let base = server.base_url.clone();
    let handle = server.respond(vec![(200, r#"{"success":true}"#.to_owned())]);

    let client = client(&base, logged_in_storage());
    let banner = NewPremiumBanner {
        url: Some("https://t.me/promo".into()),
        ..Default::default()
    };
    client
        .create_premium_banner(&banner, Upload::new("p.jpg", "image/jpeg", vec![0xff]))
        .await
        .unwrap();

    let requests = handle.await.unwrap();
    assert_eq!(requests[0].path, "/banners/premium");
    let body = requests[0].body_text();
    assert!(body.contains("name=\"url\""));
    assert!(body.contains("https://t.me/promo"));
    assert!(!body.contains("name=\"linkUrl\""));
    assert!(body.contains("name=\"image\"; filename=\"p.jpg\""));
}
