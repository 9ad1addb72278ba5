//! ERC-721 metadata JSON document.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct MetadataDocumentDto {
    #[serde(default)]
    pub(super) image: Option<String>,
    #[serde(default)]
    pub(super) image_url: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) description: Option<String>,
}
