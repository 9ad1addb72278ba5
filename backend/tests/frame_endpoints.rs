//! End-to-end scenarios for the frame endpoints over in-memory ports.

mod support;

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use nft_frames::domain::ports::{
    OwnershipSourceError, StaticIdentityResolver, StaticOwnershipSource,
};
use nft_frames::domain::{
    GalleryCursor, Identity, OwnedToken, OwnershipResult, TokenId, WalletAddress,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use support::{CACHE_TTL, ERROR_BACKGROUND, Frame, Harness, Scenario, wallet};

const HOLDER: &str = "0xabcabcabcabcabcabcabcabcabcabcabcabcabca";

#[fixture]
fn holder() -> WalletAddress {
    wallet(HOLDER)
}

fn tokens(ids: impl IntoIterator<Item = u128>) -> Vec<OwnedToken> {
    ids.into_iter()
        .map(|id| OwnedToken::bare(TokenId::from_u128(id)))
        .collect()
}

fn linked_resolver(owner: &WalletAddress) -> Arc<StaticIdentityResolver> {
    Arc::new(
        StaticIdentityResolver::default().with_link(&Identity::SocialId(123), vec![owner.clone()]),
    )
}

fn holding(owner: &WalletAddress, ids: impl IntoIterator<Item = u128>) -> Arc<StaticOwnershipSource> {
    Arc::new(StaticOwnershipSource::default().with_tokens(owner.clone(), tokens(ids)))
}

async fn press_check(harness: &Harness, body: Value) -> Frame {
    let (status, html) = harness
        .send(test::TestRequest::post().uri("/api/check").set_json(body))
        .await;
    assert_eq!(status, StatusCode::OK);
    Frame::parse(html)
}

fn fid_press(fid: u64) -> Value {
    json!({
        "untrustedData": { "fid": fid, "buttonIndex": 1 },
        "trustedData": { "messageBytes": "0a" }
    })
}

#[rstest]
#[actix_web::test]
async fn linked_holder_sees_count_and_pages_through_tokens(holder: WalletAddress) {
    let harness = Scenario::new(linked_resolver(&holder), holding(&holder, [1, 2])).start();

    let result = press_check(&harness, fid_press(123)).await;
    assert!(result.svg.contains("You own 2 Scary Garys"));
    assert!(result.svg.contains("Token IDs: 1, 2"));
    assert_eq!(result.buttons(), ["View NFTs", "Check again"]);

    let first = harness
        .follow(&result.target_path("View NFTs").expect("view action"))
        .await;
    assert_eq!(first.token_labels(), ["#1"]);
    assert_eq!(first.buttons(), ["Next", "Back"]);

    let second = harness
        .follow(&first.target_path("Next").expect("next action"))
        .await;
    assert_eq!(second.token_labels(), ["#2"]);
    assert_eq!(second.buttons(), ["Prev", "Back"]);

    let back = harness
        .follow(&second.target_path("Back").expect("back action"))
        .await;
    assert!(back.svg.contains("You own 2 Scary Garys"));
}

#[rstest]
#[actix_web::test]
async fn balance_only_wallet_keeps_its_count_across_screens(holder: WalletAddress) {
    let source = StaticOwnershipSource::default()
        .with_result(holder.clone(), OwnershipResult::count_only(5));
    let harness = Scenario::new(linked_resolver(&holder), Arc::new(source)).start();

    let result = press_check(&harness, fid_press(123)).await;
    assert!(result.svg.contains("You own 5 Scary Garys"));
    assert!(result.svg.contains("Token listing unavailable"));
    assert_eq!(result.buttons(), ["Check again"]);

    let cursor = GalleryCursor {
        owner: holder,
        page: 0,
    }
    .encode()
    .expect("cursor encodes");
    let gallery = harness
        .follow(&format!("/api/view-nfts?cursor={cursor}"))
        .await;
    assert!(gallery.svg.contains("You own 5 Scary Garys"));
    assert!(gallery.svg.contains("Token listing unavailable"));
    assert_eq!(gallery.buttons(), ["Back"]);
}

#[rstest]
#[actix_web::test]
async fn typed_lookup_wins_over_the_verified_address(holder: WalletAddress) {
    let harness = Scenario::new(
        Arc::new(StaticIdentityResolver::default()),
        holding(&holder, [4]),
    )
    .start();

    let result = press_check(
        &harness,
        json!({
            "untrustedData": {
                "fid": 5,
                "inputText": HOLDER,
                "address": "0x1111111111111111111111111111111111111111"
            }
        }),
    )
    .await;

    assert!(result.svg.contains("You own 1 Scary Garys"));
}

#[rstest]
#[actix_web::test]
async fn unlinked_identity_reports_no_address(holder: WalletAddress) {
    let harness = Scenario::new(
        Arc::new(StaticIdentityResolver::default()),
        holding(&holder, [1]),
    )
    .start();

    let result = press_check(&harness, fid_press(123)).await;

    assert!(result.svg.contains("No connected address found"));
    assert!(!result.buttons().contains(&"View NFTs".to_owned()));
    assert_eq!(result.buttons(), ["Check again"]);
}

#[rstest]
#[actix_web::test]
async fn provider_failure_renders_error_with_zero_count(holder: WalletAddress) {
    let source = StaticOwnershipSource::default()
        .with_failure(holder.clone(), OwnershipSourceError::transport("connection reset"));
    let harness = Scenario::new(linked_resolver(&holder), Arc::new(source)).start();

    let result = press_check(&harness, fid_press(123)).await;

    assert!(result.svg.contains("Error checking ownership"));
    assert!(result.svg.contains("You own 0 Scary Garys"));
    assert!(result.svg.contains(ERROR_BACKGROUND));
    assert!(!result.buttons().contains(&"View NFTs".to_owned()));
}

#[rstest]
#[actix_web::test]
async fn wallet_without_tokens_owns_nothing(holder: WalletAddress) {
    let stranger = wallet("0x1111111111111111111111111111111111111111");
    let harness = Scenario::new(linked_resolver(&stranger), holding(&holder, [1])).start();

    let result = press_check(&harness, fid_press(123)).await;

    assert!(result.svg.contains("You own 0 Scary Garys"));
    assert_eq!(result.buttons(), ["Check again"]);
}

#[rstest]
#[actix_web::test]
async fn verified_address_skips_the_social_graph(holder: WalletAddress) {
    let harness = Scenario::new(
        Arc::new(StaticIdentityResolver::default()),
        holding(&holder, [9]),
    )
    .start();

    let result = press_check(
        &harness,
        json!({ "untrustedData": { "fid": 5, "address": HOLDER } }),
    )
    .await;

    assert!(result.svg.contains("You own 1 Scary Garys"));
}

#[rstest]
#[case(1, 5)]
#[case(2, 5)]
#[case(3, 7)]
#[actix_web::test]
async fn pages_are_disjoint_and_cover_every_token(
    holder: WalletAddress,
    #[case] page_size: usize,
    #[case] total: u128,
) {
    let harness = Scenario::new(linked_resolver(&holder), holding(&holder, 1..=total))
        .with_page_size(page_size)
        .start();
    let result = press_check(&harness, fid_press(123)).await;

    let mut seen = Vec::new();
    let mut next = result.target_path("View NFTs");
    while let Some(path) = next {
        let page = harness.follow(&path).await;
        let labels = page.token_labels();
        let remaining = total as usize - seen.len();
        assert_eq!(labels.len(), page_size.min(remaining));
        seen.extend(labels);
        next = page.target_path("Next");
    }

    let expected: Vec<String> = (1..=total).map(|id| format!("#{id}")).collect();
    assert_eq!(seen, expected);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), seen.len());
}

#[rstest]
#[actix_web::test]
async fn metadata_is_cached_until_the_ttl_expires(holder: WalletAddress) {
    let harness = Scenario::new(linked_resolver(&holder), holding(&holder, [1, 2])).start();
    let result = press_check(&harness, fid_press(123)).await;
    let gallery = result.target_path("View NFTs").expect("view action");

    let page = harness.follow(&gallery).await;
    assert!(page.svg.contains("https://img.example/tokens/1.png"));
    assert_eq!(harness.metadata.calls(), 1);

    harness.follow(&gallery).await;
    assert_eq!(harness.metadata.calls(), 1);

    harness.clock.advance(CACHE_TTL);
    harness.clock.advance_seconds(1);
    harness.follow(&gallery).await;
    assert_eq!(harness.metadata.calls(), 2);
}

#[rstest]
#[actix_web::test]
async fn tampered_cursor_is_a_bad_request(holder: WalletAddress) {
    let harness = Scenario::new(linked_resolver(&holder), holding(&holder, [1])).start();

    let (status, body) = harness
        .send(test::TestRequest::post().uri("/api/view-nfts?cursor=not-a-cursor"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).expect("JSON error");
    assert_eq!(error["code"], "invalid_request");
    assert!(error["traceId"].is_string());
}
