//! In-process harness for the frame endpoints.
//!
//! Wires the real domain services to in-memory ports and a [`MutableClock`],
//! so scenarios exercise the full check and gallery flows without network
//! access.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{TimeZone, Utc};
use nft_frames::Trace;
use nft_frames::domain::ports::{
    IdentityResolver, NoOpLookupMetrics, OwnershipSource, TokenMetadataSource,
    TokenMetadataSourceError,
};
use nft_frames::domain::{
    Backgrounds, EvmAddress, FramePresenter, GallerySettings, IdentityService, MetadataEnricher,
    OwnershipCheckService, OwnershipService, TokenId, TokenMetadata, TtlCache, UrlTemplate,
    WalletAddress,
};
use nft_frames::inbound::http::{FrameLinks, HttpState, frames};
use nft_frames::test_support::MutableClock;
use pagination::{PageSize, PaginationPolicy};
use serde_json::json;

pub const CONTRACT: &str = "0xd652Eeb3431f1113312E5c763CE1d0846Aa4d7BC";
pub const PUBLIC_URL: &str = "https://frames.example";
pub const CACHE_TTL: Duration = Duration::from_secs(300);
pub const ERROR_BACKGROUND: &str = "https://img.example/error.png";

pub fn wallet(raw: &str) -> WalletAddress {
    EvmAddress::parse(raw).expect("valid wallet")
}

/// Metadata source that counts outbound calls.
#[derive(Debug, Default)]
pub struct CountingMetadataSource {
    calls: AtomicUsize,
}

impl CountingMetadataSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenMetadataSource for CountingMetadataSource {
    async fn fetch_metadata(
        &self,
        token_id: &TokenId,
    ) -> Result<TokenMetadata, TokenMetadataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TokenMetadata {
            image_url: Some(format!("https://img.example/tokens/{token_id}.png")),
            ..TokenMetadata::default()
        })
    }
}

/// Ports and settings for one scenario.
pub struct Scenario {
    pub resolver: Arc<dyn IdentityResolver>,
    pub source: Arc<dyn OwnershipSource>,
    pub metadata: Arc<CountingMetadataSource>,
    pub clock: Arc<MutableClock>,
    pub page_size: usize,
    pub policy: PaginationPolicy,
}

impl Scenario {
    pub fn new(resolver: Arc<dyn IdentityResolver>, source: Arc<dyn OwnershipSource>) -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid start time");
        Self {
            resolver,
            source,
            metadata: Arc::new(CountingMetadataSource::default()),
            clock: Arc::new(MutableClock::new(start)),
            page_size: 1,
            policy: PaginationPolicy::Clamp,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Wire the services once; caches persist across requests.
    pub fn start(self) -> Harness {
        let contract = EvmAddress::parse(CONTRACT).expect("valid contract");
        let metrics = Arc::new(NoOpLookupMetrics);
        let check = OwnershipCheckService::new(
            IdentityService::new(self.resolver, metrics.clone()),
            OwnershipService::new(
                self.source,
                contract.clone(),
                TtlCache::new(CACHE_TTL, self.clock.clone()),
                metrics.clone(),
            ),
            MetadataEnricher::new(
                Some(self.metadata.clone() as Arc<dyn TokenMetadataSource>),
                contract,
                UrlTemplate::default(),
                TtlCache::new(CACHE_TTL, self.clock.clone()),
                metrics,
            ),
            GallerySettings {
                page_size: PageSize::new(self.page_size).expect("non-zero page size"),
                policy: self.policy,
            },
        );
        let state = HttpState::new(
            Arc::new(check),
            FramePresenter::new(
                "Scary Garys",
                Backgrounds {
                    default: "https://img.example/default.png".to_owned(),
                    confirm: "https://img.example/confirm.png".to_owned(),
                    error: ERROR_BACKGROUND.to_owned(),
                    no_result: "https://img.example/none.png".to_owned(),
                },
            ),
            FrameLinks::new(PUBLIC_URL, "/api"),
        );
        Harness {
            state: web::Data::new(state),
            metadata: self.metadata,
            clock: self.clock,
        }
    }
}

/// Running scenario.
pub struct Harness {
    state: web::Data<HttpState>,
    pub metadata: Arc<CountingMetadataSource>,
    pub clock: Arc<MutableClock>,
}

impl Harness {
    /// Send `request` through the app mounted under `/api`.
    pub async fn send(&self, request: test::TestRequest) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(Trace)
                .service(web::scope("/api").configure(frames::configure)),
        )
        .await;
        let res = test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    /// Follow a button target path with a POST, as the client would.
    pub async fn follow(&self, path: &str) -> Frame {
        let (status, html) = self
            .send(test::TestRequest::post().uri(path).set_json(json!({})))
            .await;
        assert_eq!(status, StatusCode::OK, "{path}");
        Frame::parse(html)
    }
}

/// A rendered frame document split into the parts assertions care about.
#[derive(Debug)]
pub struct Frame {
    pub html: String,
    pub svg: String,
}

impl Frame {
    pub fn parse(html: String) -> Self {
        let svg = meta_content(&html, "og:image")
            .and_then(|uri| uri.strip_prefix("data:image/svg+xml;base64,").map(str::to_owned))
            .map(|encoded| STANDARD.decode(encoded).expect("card is base64"))
            .map(|bytes| String::from_utf8(bytes).expect("card is utf8"))
            .expect("frame carries a card image");
        Self { html, svg }
    }

    /// Labels of the frame's buttons in order.
    pub fn buttons(&self) -> Vec<String> {
        (1..=4)
            .filter_map(|n| meta_content(&self.html, &format!("fc:frame:button:{n}")))
            .collect()
    }

    /// Target of the button labelled `label`.
    pub fn target(&self, label: &str) -> Option<String> {
        let index = self.buttons().iter().position(|button| button == label)?;
        meta_content(&self.html, &format!("fc:frame:button:{}:target", index + 1))
            .map(|target| target.replace("&amp;", "&"))
    }

    /// Target path relative to the public URL.
    pub fn target_path(&self, label: &str) -> Option<String> {
        self.target(label)
            .and_then(|target| target.strip_prefix(PUBLIC_URL).map(str::to_owned))
    }

    /// Gallery token labels (`#id`) drawn on the card.
    pub fn token_labels(&self) -> Vec<String> {
        self.svg
            .split('>')
            .filter_map(|chunk| chunk.strip_suffix("</text"))
            .filter(|text| text.starts_with('#'))
            .map(str::to_owned)
            .collect()
    }
}

fn meta_content(html: &str, property: &str) -> Option<String> {
    let marker = format!("<meta property=\"{property}\" content=\"");
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_owned())
}
