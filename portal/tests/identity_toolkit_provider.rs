//! `IdentityToolkitProvider` against a loopback server.

mod support;

use std::time::Duration;

use actix_web::{HttpRequest, HttpResponse, web};
use portal::domain::ports::{IdentityProvider, IdentityProviderError};
use portal::domain::{Credentials, EmailAddress, Session, SignUpRequest};
use portal::outbound::identity::IdentityToolkitProvider;
use reqwest::Url;
use serde_json::{Value, json};
use support::{Recorder, serve};

fn provider(base: &str) -> IdentityToolkitProvider {
    let url = Url::parse(&format!("{base}/v1")).expect("base url");
    IdentityToolkitProvider::new(url, "test-key", Duration::from_secs(5)).expect("client builds")
}

fn key_of(request: &HttpRequest) -> Option<String> {
    request
        .query_string()
        .split('&')
        .find_map(|pair| pair.strip_prefix("key="))
        .map(str::to_owned)
}

async fn sign_in_ok(
    recorder: web::Data<Recorder>,
    request: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    recorder.record(&request);
    assert_eq!(key_of(&request).as_deref(), Some("test-key"));
    assert_eq!(body["returnSecureToken"], json!(true));
    HttpResponse::Ok().json(json!({
        "localId": "uid-ada",
        "email": body["email"],
        "idToken": "id-token-1",
        "refreshToken": "refresh-1"
    }))
}

async fn lookup_verified(
    recorder: web::Data<Recorder>,
    request: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    recorder.record(&request);
    if body["idToken"] != json!("id-token-1") {
        return HttpResponse::BadRequest().json(json!({ "error": { "message": "INVALID_ID_TOKEN" } }));
    }
    HttpResponse::Ok().json(json!({
        "users": [{ "localId": "uid-ada", "email": "ada@example.edu", "emailVerified": true }]
    }))
}

#[actix_rt::test]
async fn sign_in_reads_verification_from_lookup() {
    let recorder = Recorder::default();
    let (base, handle) = serve(&recorder, |cfg| {
        cfg.route("/v1/accounts:signInWithPassword", web::post().to(sign_in_ok))
            .route("/v1/accounts:lookup", web::post().to(lookup_verified));
    });
    let credentials =
        Credentials::try_from_parts("ada@example.edu", "correct horse").expect("credentials");

    let session = provider(&base)
        .sign_in(&credentials)
        .await
        .expect("sign-in succeeds");

    assert_eq!(session.uid(), "uid-ada");
    assert!(session.email_verified());
    assert_eq!(session.refresh_token(), Some("refresh-1"));
    assert_eq!(
        recorder.requests(),
        vec![
            "POST /v1/accounts:signInWithPassword".to_owned(),
            "POST /v1/accounts:lookup".to_owned(),
        ]
    );
    handle.stop(true).await;
}

#[actix_rt::test]
async fn bad_passwords_are_invalid_credentials() {
    let recorder = Recorder::default();
    let (base, handle) = serve(&recorder, |cfg| {
        cfg.route(
            "/v1/accounts:signInWithPassword",
            web::post().to(|| async {
                HttpResponse::BadRequest()
                    .json(json!({ "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" } }))
            }),
        );
    });
    let credentials =
        Credentials::try_from_parts("ada@example.edu", "wrong").expect("credentials");

    let error = provider(&base)
        .sign_in(&credentials)
        .await
        .expect_err("rejected");

    assert_eq!(error, IdentityProviderError::invalid_credentials());
    handle.stop(true).await;
}

#[actix_rt::test]
async fn duplicate_sign_ups_report_email_exists() {
    let recorder = Recorder::default();
    let (base, handle) = serve(&recorder, |cfg| {
        cfg.route(
            "/v1/accounts:signUp",
            web::post().to(|| async {
                HttpResponse::BadRequest().json(json!({ "error": { "message": "EMAIL_EXISTS" } }))
            }),
        );
    });
    let request =
        SignUpRequest::try_from_parts("Ada", "ada@example.edu", "correct horse", "correct horse")
            .expect("valid sign-up");

    let error = provider(&base).sign_up(&request).await.expect_err("rejected");

    assert_eq!(error, IdentityProviderError::email_exists());
    handle.stop(true).await;
}

#[actix_rt::test]
async fn lookups_without_users_expire_the_session() {
    let recorder = Recorder::default();
    let (base, handle) = serve(&recorder, |cfg| {
        cfg.route(
            "/v1/accounts:lookup",
            web::post().to(|| async { HttpResponse::Ok().json(json!({ "users": [] })) }),
        );
    });
    let stale = Session::new(
        "uid-ada",
        EmailAddress::new("ada@example.edu").expect("valid email"),
        false,
        "stale-token",
    );

    let error = provider(&base).lookup(&stale).await.expect_err("expired");

    assert_eq!(error, IdentityProviderError::session_expired());
    handle.stop(true).await;
}

#[actix_rt::test]
async fn verification_mail_is_requested_with_the_id_token() {
    let recorder = Recorder::default();
    let (base, handle) = serve(&recorder, |cfg| {
        cfg.route(
            "/v1/accounts:sendOobCode",
            web::post().to(|body: web::Json<Value>| async move {
                assert_eq!(body["requestType"], json!("VERIFY_EMAIL"));
                assert_eq!(body["idToken"], json!("id-token-1"));
                HttpResponse::Ok().json(json!({ "email": "ada@example.edu" }))
            }),
        );
    });
    let session = Session::new(
        "uid-ada",
        EmailAddress::new("ada@example.edu").expect("valid email"),
        false,
        "id-token-1",
    );

    provider(&base)
        .send_verification(&session)
        .await
        .expect("verification requested");

    handle.stop(true).await;
}
