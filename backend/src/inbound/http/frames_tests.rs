//! Tests for the frame handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    CheckOutcome, FixtureOwnershipCheck, GalleryOutcome, MockOwnershipCheck, OwnershipCheck,
};
use crate::domain::{Backgrounds, EvmAddress, FramePresenter, Identity, OwnedToken, OwnershipResult, TokenId, WalletAddress};
use crate::inbound::http::frame_html::FrameLinks;

#[fixture]
fn owner() -> WalletAddress {
    EvmAddress::parse("0xabcabcabcabcabcabcabcabcabcabcabcabcabca").expect("valid")
}

fn state(port: Arc<dyn OwnershipCheck>) -> HttpState {
    HttpState::new(
        port,
        FramePresenter::new(
            "Scary Garys",
            Backgrounds {
                default: "https://img.example/default.png".to_owned(),
                confirm: "https://img.example/confirm.png".to_owned(),
                error: "https://img.example/error.png".to_owned(),
                no_result: "https://img.example/none.png".to_owned(),
            },
        ),
        FrameLinks::new("https://frames.example", "/api"),
    )
}

async fn call(
    port: Arc<dyn OwnershipCheck>,
    request: test::TestRequest,
) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(port)))
            .service(web::scope("/api").configure(configure)),
    )
    .await;
    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

fn cursor(owner: &WalletAddress, page: usize) -> String {
    GalleryCursor {
        owner: owner.clone(),
        page,
    }
    .encode()
    .expect("cursor encodes")
}

#[rstest]
#[case(test::TestRequest::get())]
#[case(test::TestRequest::post())]
#[actix_web::test]
async fn initial_frame_answers_get_and_post(#[case] request: test::TestRequest) {
    let (status, body) = call(Arc::new(FixtureOwnershipCheck), request.uri("/api/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<meta property="fc:frame:button:1" content="Check" />"#));
    assert!(body.contains("fc:frame:input:text"));
}

#[rstest]
#[actix_web::test]
async fn check_passes_identity_and_verified_address(owner: WalletAddress) {
    let mut port = MockOwnershipCheck::new();
    let expected_owner = owner.clone();
    port
        .expect_check()
        .with(eq(CheckRequest {
            identity: Some(Identity::SocialId(3)),
            verified_address: Some(owner.clone()),
        }))
        .times(1)
        .return_once(move |_| CheckOutcome::Owned {
            owner: expected_owner,
            result: OwnershipResult::from_tokens(vec![OwnedToken::bare(TokenId::from_u128(7))]),
        });

    let (status, body) = call(
        Arc::new(port),
        test::TestRequest::post().uri("/api/check").set_json(json!({
            "untrustedData": {
                "fid": 3,
                "buttonIndex": 1,
                "address": owner.as_str(),
            },
            "trustedData": { "messageBytes": "00" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"content="View NFTs""#));
    assert!(body.contains("https://frames.example/api/view-nfts?cursor="));
    assert!(body.contains(r#"content="Check again""#));
}

#[rstest]
#[actix_web::test]
async fn check_with_cursor_uses_the_cursor_owner(owner: WalletAddress) {
    let mut port = MockOwnershipCheck::new();
    let returned = owner.clone();
    port
        .expect_check()
        .with(eq(CheckRequest {
            identity: None,
            verified_address: Some(owner.clone()),
        }))
        .times(1)
        .return_once(move |_| CheckOutcome::NotOwned { owner: returned });

    let (status, body) = call(
        Arc::new(port),
        test::TestRequest::post()
            .uri(&format!("/api/check?cursor={}", cursor(&owner, 2)))
            .set_json(json!({ "untrustedData": { "fid": 99 } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"content="Check again""#));
    assert!(!body.contains("View NFTs"));
}

#[rstest]
#[actix_web::test]
async fn check_without_body_reports_no_identity() {
    let (status, body) = call(
        Arc::new(FixtureOwnershipCheck),
        test::TestRequest::post().uri("/api/check"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("fc:frame:image"));
    assert!(body.contains(r#"content="Check again""#));
}

#[rstest]
#[actix_web::test]
async fn gallery_requests_the_cursor_page(owner: WalletAddress) {
    let mut port = MockOwnershipCheck::new();
    let returned = owner.clone();
    port
        .expect_gallery()
        .with(eq(GalleryRequest {
            owner: owner.clone(),
            page: 1,
        }))
        .times(1)
        .return_once(move |_| GalleryOutcome::Unavailable { owner: returned });

    let (status, body) = call(
        Arc::new(port),
        test::TestRequest::get().uri(&format!("/api/view-nfts?cursor={}", cursor(&owner, 1))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"content="Back""#));
    assert!(body.contains("https://frames.example/api/check?cursor="));
}

#[rstest]
#[case("/api/view-nfts?cursor=not-a-cursor")]
#[case("/api/view-nfts")]
#[actix_web::test]
async fn gallery_rejects_bad_cursors(#[case] uri: &str) {
    let mut port = MockOwnershipCheck::new();
    port.expect_gallery().never();

    let (status, body) = call(Arc::new(port), test::TestRequest::post().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).expect("JSON error body");
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["details"]["field"], "cursor");
}

#[rstest]
#[actix_web::test]
async fn frame_responses_are_not_cached() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(Arc::new(FixtureOwnershipCheck))))
            .service(web::scope("/api").configure(configure)),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri("/api/").to_request()).await;

    assert_eq!(
        res.headers()
            .get("cache-control")
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
    assert_eq!(
        res.headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
}
