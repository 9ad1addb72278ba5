//! Rendering a [`FrameView`] as a frame HTML document.
//!
//! The card image is drawn as SVG and embedded as a base64 `data:` URI, so
//! no image hosting is needed. All text is escaped before it reaches either
//! the SVG or the HTML.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use url::form_urlencoded::byte_serialize;

use crate::domain::{FrameImage, FrameTarget, FrameView};

const CARD_SIZE: usize = 600;
const HEADLINE_Y: usize = 96;
const LINE_START_Y: usize = 156;
const LINE_HEIGHT: usize = 34;
const THUMB_SIZE: usize = 120;
const THUMB_GAP: usize = 16;
const THUMBS_PER_ROW: usize = 4;

/// Absolute URL prefix for button targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLinks {
    public_url: String,
    base_path: String,
}

impl FrameLinks {
    /// `public_url` is the externally visible origin; `base_path` is where the
    /// frame routes are mounted (for example `/api`).
    pub fn new(public_url: &str, base_path: &str) -> Self {
        Self {
            public_url: public_url.trim_end_matches('/').to_owned(),
            base_path: base_path.trim_end_matches('/').to_owned(),
        }
    }

    /// Absolute URL for a button target, with the cursor as a query string.
    pub fn target_url(&self, target: &FrameTarget) -> String {
        let mut url = format!(
            "{}{}{}",
            self.public_url,
            self.base_path,
            target.route.path()
        );
        if let Some(cursor) = target.cursor.as_deref() {
            url.push_str("?cursor=");
            url.extend(byte_serialize(cursor.as_bytes()));
        }
        url
    }
}

/// The full HTML document for `view`.
pub fn render_document(view: &FrameView, links: &FrameLinks) -> String {
    let image = escape(&image_data_uri(view.image()));
    let mut meta = vec![
        meta_tag("fc:frame", "vNext"),
        meta_tag("fc:frame:image", &image),
        meta_tag("fc:frame:image:aspect_ratio", "1:1"),
        meta_tag("og:image", &image),
    ];
    if let Some(input) = view.input() {
        meta.push(meta_tag("fc:frame:input:text", &escape(input)));
    }
    for (index, button) in view.buttons().iter().enumerate() {
        let number = index + 1;
        meta.push(meta_tag(
            &format!("fc:frame:button:{number}"),
            &escape(&button.label),
        ));
        meta.push(meta_tag(&format!("fc:frame:button:{number}:action"), "post"));
        meta.push(meta_tag(
            &format!("fc:frame:button:{number}:target"),
            &escape(&links.target_url(&button.target)),
        ));
    }

    let FrameImage::Card { headline, .. } = view.image();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{}</title>\n{}\n</head>\n<body></body>\n</html>\n",
        escape(headline),
        meta.join("\n")
    )
}

fn meta_tag(property: &str, content: &str) -> String {
    format!("<meta property=\"{property}\" content=\"{content}\" />")
}

fn image_data_uri(image: &FrameImage) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(render_svg(image))
    )
}

pub(crate) fn render_svg(image: &FrameImage) -> String {
    let FrameImage::Card {
        background_url,
        headline,
        lines,
        thumbnails,
    } = image;
    let centre = CARD_SIZE / 2;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CARD_SIZE}\" height=\"{CARD_SIZE}\" viewBox=\"0 0 {CARD_SIZE} {CARD_SIZE}\">"
    );
    svg.push_str(&format!(
        "<rect width=\"{CARD_SIZE}\" height=\"{CARD_SIZE}\" fill=\"#4a5568\"/>"
    ));
    if !background_url.is_empty() {
        svg.push_str(&format!(
            "<image href=\"{}\" width=\"{CARD_SIZE}\" height=\"{CARD_SIZE}\" preserveAspectRatio=\"xMidYMid slice\"/>",
            escape(background_url)
        ));
    }
    svg.push_str(&format!(
        "<rect width=\"{CARD_SIZE}\" height=\"{CARD_SIZE}\" fill=\"#000\" fill-opacity=\"0.45\"/>"
    ));
    svg.push_str(&format!(
        "<text x=\"{centre}\" y=\"{HEADLINE_Y}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"38\" font-weight=\"bold\" fill=\"#fff\">{}</text>",
        escape(headline)
    ));
    for (index, line) in lines.iter().enumerate() {
        let y = LINE_START_Y + index * LINE_HEIGHT;
        svg.push_str(&format!(
            "<text x=\"{centre}\" y=\"{y}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"24\" fill=\"#fff\">{}</text>",
            escape(line)
        ));
    }

    let grid_top = LINE_START_Y + lines.len() * LINE_HEIGHT;
    let row_width = THUMBS_PER_ROW * THUMB_SIZE + (THUMBS_PER_ROW - 1) * THUMB_GAP;
    let left = (CARD_SIZE - row_width) / 2;
    for (index, url) in thumbnails.iter().enumerate() {
        let column = index % THUMBS_PER_ROW;
        let row = index / THUMBS_PER_ROW;
        let x = left + column * (THUMB_SIZE + THUMB_GAP);
        let y = grid_top + row * (THUMB_SIZE + THUMB_GAP);
        svg.push_str(&format!(
            "<image href=\"{}\" x=\"{x}\" y=\"{y}\" width=\"{THUMB_SIZE}\" height=\"{THUMB_SIZE}\" preserveAspectRatio=\"xMidYMid meet\"/>",
            escape(url)
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Escape text for XML and HTML attribute or element content.
pub(crate) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
