//! End-to-end turns against a local mock of the provider: token page GET
//! followed by the batched RPC POST, with the real newline framing.

use bardo_client::{ChatBackend, ClientError, Credentials, GeminiClient, SessionReference};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = "/_/BardChatUi/data/assistant.lamda.BardFrontendService/StreamGenerate";

fn client_for(server: &MockServer) -> GeminiClient {
    let credentials = Credentials::new("psid-value".to_string(), "psidts-value".to_string());
    GeminiClient::new(credentials).with_base_url(server.uri())
}

fn token_page(token: &str) -> String {
    format!(r#"<html><script>window.WIZ = {{"SNlM0e":"{token}","other":1}};</script></html>"#)
}

fn framed_body(document: &serde_json::Value) -> String {
    let payload = json!([["wrb.fr", null, document.to_string()]]).to_string();
    format!(")]}}'\n\n123\n{payload}\n25\n[[\"di\",43]]\n")
}

async fn mount_token_page(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token_page(token)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_turn_round_trip() {
    let server = MockServer::start().await;
    mount_token_page(&server, "tokvalue").await;

    let document = json!([
        null,
        ["c_conv", "r_resp"],
        null,
        null,
        [["rc_0", ["first answer"]], ["rc_1", ["second answer"]]],
    ]);
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("rt", "c"))
        .and(query_param("bl", "boq_assistant-bard-web-server_20230718.13_p2"))
        // the scraped token must be echoed back as the `at` form field
        .and(body_string_contains("at=tokvalue"))
        .and(body_string_contains("f.req="))
        .respond_with(ResponseTemplate::new(200).set_body_string(framed_body(&document)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let turn = client
        .ask("hello there", &SessionReference::default())
        .await
        .unwrap();

    assert_eq!(turn.conversation_id, "c_conv");
    assert_eq!(turn.response_id, "r_resp");
    assert_eq!(turn.answer_count(), 2);
    assert_eq!(turn.answers[0].content, "first answer");
    assert_eq!(turn.answers[1].choice_id, "rc_1");
}

#[tokio::test]
async fn rpc_post_sends_a_single_charset_content_type() {
    let server = MockServer::start().await;
    mount_token_page(&server, "tok").await;

    let document = json!([null, ["c", "r"], null, null, [["rc", ["ok"]]]]);
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(framed_body(&document)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .ask("hi", &SessionReference::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|request| request.url.path() == STREAM_PATH)
        .unwrap();
    let content_types: Vec<_> = post
        .headers
        .get_all("content-type")
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect();
    assert_eq!(
        content_types,
        ["application/x-www-form-urlencoded;charset=UTF-8"]
    );
}

#[tokio::test]
async fn login_wall_surfaces_token_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>sign in to continue</html>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .ask("hi", &SessionReference::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::TokenNotFound));
}

#[tokio::test]
async fn non_200_token_page_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .ask("hi", &SessionReference::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus(status) if status.as_u16() == 302));
}

#[tokio::test]
async fn non_200_rpc_response_is_unexpected_status() {
    let server = MockServer::start().await;
    mount_token_page(&server, "tok").await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .ask("hi", &SessionReference::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn zero_candidates_surface_no_answer() {
    let server = MockServer::start().await;
    mount_token_page(&server, "tok").await;

    let document = json!([null, ["c", "r"], null, null, []]);
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(framed_body(&document)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .ask("hi", &SessionReference::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NoAnswer));
}

#[tokio::test]
async fn continued_branch_reference_is_sent_in_the_envelope() {
    let server = MockServer::start().await;
    mount_token_page(&server, "tok").await;

    let document = json!([null, ["c_next", "r_next"], null, null, [["rc", ["ok"]]]]);
    // The doubly-encoded envelope carries the branch ids; after form
    // urlencoding the ids still appear verbatim in the body.
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_string_contains("c_prev"))
        .and(body_string_contains("rc_prev"))
        .respond_with(ResponseTemplate::new(200).set_body_string(framed_body(&document)))
        .expect(1)
        .mount(&server)
        .await;

    let reference = SessionReference::new(
        "c_prev".to_string(),
        "r_prev".to_string(),
        "rc_prev".to_string(),
    );
    let client = client_for(&server);
    let turn = client.ask("continue", &reference).await.unwrap();
    assert_eq!(turn.conversation_id, "c_next");
}
