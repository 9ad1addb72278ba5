//! Frame views for the three screens: initial, result and gallery.
//!
//! Builders here are pure. They decide what a screen says and which buttons
//! it offers; turning a [`FrameView`] into HTML is the HTTP adapter's job.

use pagination::{Cursor, CursorError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ports::{CheckOutcome, GalleryOutcome, GalleryPage};
use super::{OwnedToken, WalletAddress};

/// Most buttons a frame may carry.
pub const MAX_BUTTONS: usize = 4;

/// Token IDs listed on the result card before summarising the rest.
const LISTED_TOKEN_IDS: usize = 10;

/// Shown when the provider reports a balance without token IDs.
const UNLISTED_LINE: &str = "Token listing unavailable";

/// Errors raised while building a view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameViewError {
    /// More buttons than a frame can show.
    #[error("a frame carries at most {max} buttons, got {count}", max = MAX_BUTTONS)]
    TooManyButtons { count: usize },
    /// Gallery cursor could not be encoded.
    #[error("gallery cursor encoding failed: {0}")]
    Cursor(#[from] CursorError),
}

/// Frame sub-path a button posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRoute {
    /// Initial screen.
    Initial,
    /// Ownership result.
    Check,
    /// Paginated gallery.
    ViewNfts,
}

impl FrameRoute {
    /// Path relative to the frame base path.
    pub fn path(self) -> &'static str {
        match self {
            Self::Initial => "/",
            Self::Check => "/check",
            Self::ViewNfts => "/view-nfts",
        }
    }
}

/// Where a button posts, with an optional opaque cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTarget {
    /// Sub-path.
    pub route: FrameRoute,
    /// Encoded [`GalleryCursor`].
    pub cursor: Option<String>,
}

impl FrameTarget {
    /// Target without a cursor.
    pub fn to(route: FrameRoute) -> Self {
        Self {
            route,
            cursor: None,
        }
    }

    /// Target carrying `cursor`.
    pub fn with_cursor(route: FrameRoute, cursor: String) -> Self {
        Self {
            route,
            cursor: Some(cursor),
        }
    }
}

/// One frame button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameButton {
    /// Visible label.
    pub label: String,
    /// Post target.
    pub target: FrameTarget,
}

impl FrameButton {
    fn new(label: impl Into<String>, target: FrameTarget) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// Frame image content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameImage {
    /// A text card drawn over a background image.
    Card {
        /// Background image URL.
        background_url: String,
        /// Large first line.
        headline: String,
        /// Smaller following lines.
        lines: Vec<String>,
        /// Token image URLs shown as a grid.
        thumbnails: Vec<String>,
    },
}

/// A complete frame: image, optional text input and up to four buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    image: FrameImage,
    input: Option<String>,
    buttons: Vec<FrameButton>,
}

impl FrameView {
    /// Assemble a view, rejecting more than [`MAX_BUTTONS`] buttons.
    pub fn new(
        image: FrameImage,
        input: Option<String>,
        buttons: Vec<FrameButton>,
    ) -> Result<Self, FrameViewError> {
        if buttons.len() > MAX_BUTTONS {
            return Err(FrameViewError::TooManyButtons {
                count: buttons.len(),
            });
        }
        Ok(Self {
            image,
            input,
            buttons,
        })
    }

    /// Image content.
    pub fn image(&self) -> &FrameImage {
        &self.image
    }

    /// Text input placeholder, when the frame asks for input.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// Buttons in display order.
    pub fn buttons(&self) -> &[FrameButton] {
        &self.buttons
    }
}

/// Gallery position carried through button targets.
///
/// Only the owner and page travel; the token list is re-derived server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryCursor {
    /// Wallet whose tokens are shown.
    pub owner: WalletAddress,
    /// Zero-based page.
    pub page: usize,
}

impl GalleryCursor {
    /// Opaque URL-safe token.
    pub fn encode(&self) -> Result<String, CursorError> {
        Cursor::new(self.clone()).encode()
    }

    /// Parse a token produced by [`GalleryCursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        Cursor::<Self>::decode(token).map(Cursor::into_inner)
    }
}

/// Background images per outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backgrounds {
    /// Initial and neutral screens.
    pub default: String,
    /// Tokens owned.
    pub confirm: String,
    /// Provider failure.
    pub error: String,
    /// No wallet found.
    pub no_result: String,
}

/// Builds views for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePresenter {
    collection_name: String,
    backgrounds: Backgrounds,
}

impl FramePresenter {
    /// Create a presenter.
    pub fn new(collection_name: impl Into<String>, backgrounds: Backgrounds) -> Self {
        Self {
            collection_name: collection_name.into(),
            backgrounds,
        }
    }

    /// The landing screen with a single Check button.
    pub fn initial(&self) -> Result<FrameView, FrameViewError> {
        FrameView::new(
            self.card(
                &self.backgrounds.default,
                format!("Do you own {}?", self.collection_name),
                vec!["Press Check to look up your wallet".to_owned()],
            ),
            Some("Enter an address, ENS or handle".to_owned()),
            vec![FrameButton::new("Check", FrameTarget::to(FrameRoute::Check))],
        )
    }

    /// The screen after a check.
    pub fn result(&self, outcome: &CheckOutcome) -> Result<FrameView, FrameViewError> {
        let check_again = FrameButton::new("Check again", FrameTarget::to(FrameRoute::Initial));
        let view = match outcome {
            CheckOutcome::Owned { owner, result } => {
                let mut lines = vec![short_wallet(owner)];
                let mut buttons = Vec::with_capacity(2);
                match token_id_summary(result.tokens(), result.total_count()) {
                    Some(summary) => {
                        lines.push(summary);
                        buttons.push(gallery_button("View NFTs", owner, 0)?);
                    }
                    None => lines.push(UNLISTED_LINE.to_owned()),
                }
                buttons.push(check_again);
                FrameView::new(
                    self.card(
                        &self.backgrounds.confirm,
                        self.owned_headline(result.total_count()),
                        lines,
                    ),
                    None,
                    buttons,
                )?
            }
            CheckOutcome::NotOwned { owner } => FrameView::new(
                self.card(
                    &self.backgrounds.default,
                    self.owned_headline(0),
                    vec![short_wallet(owner)],
                ),
                None,
                vec![check_again],
            )?,
            CheckOutcome::NoIdentity => FrameView::new(
                self.card(
                    &self.backgrounds.no_result,
                    "No connected address found".to_owned(),
                    Vec::new(),
                ),
                None,
                vec![check_again],
            )?,
            CheckOutcome::Failed { owner } => FrameView::new(
                self.card(
                    &self.backgrounds.error,
                    "Error checking ownership".to_owned(),
                    vec![short_wallet(owner), self.owned_headline(0)],
                ),
                None,
                vec![check_again],
            )?,
        };
        Ok(view)
    }

    /// One gallery page, or the fallback screens for empty and failed lookups.
    pub fn gallery(&self, outcome: &GalleryOutcome) -> Result<FrameView, FrameViewError> {
        match outcome {
            GalleryOutcome::Page(page) => self.gallery_page(page),
            GalleryOutcome::Empty { owner } => FrameView::new(
                self.card(
                    &self.backgrounds.default,
                    self.owned_headline(0),
                    vec![short_wallet(owner)],
                ),
                None,
                vec![back_button(owner, 0)?],
            ),
            GalleryOutcome::Unlisted { owner, total_count } => FrameView::new(
                self.card(
                    &self.backgrounds.confirm,
                    self.owned_headline(*total_count),
                    vec![short_wallet(owner), UNLISTED_LINE.to_owned()],
                ),
                None,
                vec![back_button(owner, 0)?],
            ),
            GalleryOutcome::Unavailable { owner } => FrameView::new(
                self.card(
                    &self.backgrounds.error,
                    "Error loading NFTs".to_owned(),
                    vec![short_wallet(owner)],
                ),
                None,
                vec![back_button(owner, 0)?],
            ),
        }
    }

    fn gallery_page(&self, page: &GalleryPage) -> Result<FrameView, FrameViewError> {
        let window = &page.window;
        let mut lines = vec![format!(
            "Page {} of {}",
            window.page().saturating_add(1),
            window.page_count()
        )];
        lines.extend(page.tokens.iter().map(token_label));
        let thumbnails = page
            .tokens
            .iter()
            .filter_map(|token| token.image_url.clone())
            .collect();

        let mut buttons = Vec::with_capacity(3);
        if let Some(previous) = window.previous() {
            buttons.push(gallery_button("Prev", &page.owner, previous)?);
        }
        if let Some(next) = window.next() {
            buttons.push(gallery_button("Next", &page.owner, next)?);
        }
        buttons.push(back_button(&page.owner, window.page())?);

        FrameView::new(
            FrameImage::Card {
                background_url: self.backgrounds.default.clone(),
                headline: self.owned_headline(page.total_count),
                lines,
                thumbnails,
            },
            None,
            buttons,
        )
    }

    fn owned_headline(&self, count: u64) -> String {
        format!("You own {count} {}", self.collection_name)
    }

    fn card(&self, background: &str, headline: String, lines: Vec<String>) -> FrameImage {
        FrameImage::Card {
            background_url: background.to_owned(),
            headline,
            lines,
            thumbnails: Vec::new(),
        }
    }
}

fn gallery_button(
    label: &str,
    owner: &WalletAddress,
    page: usize,
) -> Result<FrameButton, FrameViewError> {
    let cursor = GalleryCursor {
        owner: owner.clone(),
        page,
    }
    .encode()?;
    Ok(FrameButton::new(
        label,
        FrameTarget::with_cursor(FrameRoute::ViewNfts, cursor),
    ))
}

fn back_button(owner: &WalletAddress, page: usize) -> Result<FrameButton, FrameViewError> {
    let cursor = GalleryCursor {
        owner: owner.clone(),
        page,
    }
    .encode()?;
    Ok(FrameButton::new(
        "Back",
        FrameTarget::with_cursor(FrameRoute::Check, cursor),
    ))
}

fn short_wallet(owner: &WalletAddress) -> String {
    let digits = owner.hex_digits();
    let head = digits.get(..4).unwrap_or(digits);
    let tail = digits.get(digits.len().saturating_sub(4)..).unwrap_or("");
    format!("Wallet 0x{head}…{tail}")
}

fn token_label(token: &OwnedToken) -> String {
    match token.name.as_deref() {
        Some(name) => name.to_owned(),
        None => format!("#{}", token.token_id),
    }
}

fn token_id_summary(tokens: &[OwnedToken], total: u64) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let listed: Vec<&str> = tokens
        .iter()
        .take(LISTED_TOKEN_IDS)
        .map(|token| token.token_id.as_str())
        .collect();
    let remaining = total.saturating_sub(listed.len() as u64);
    let ids = listed.join(", ");
    Some(if remaining > 0 {
        format!("Token IDs: {ids} and {remaining} more")
    } else {
        format!("Token IDs: {ids}")
    })
}

#[cfg(test)]
#[path = "presentation_tests.rs"]
mod tests;
