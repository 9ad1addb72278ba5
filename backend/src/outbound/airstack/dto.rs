//! GraphQL envelopes for the social-graph `Socials` query.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GraphQlRequestDto<'a> {
    pub(super) query: &'static str,
    pub(super) variables: IdentityVariablesDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct IdentityVariablesDto<'a> {
    pub(super) identity: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponseDto {
    #[serde(default)]
    pub(super) data: Option<SocialsDataDto>,
    #[serde(default)]
    pub(super) errors: Option<Vec<GraphQlErrorDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlErrorDto {
    pub(super) message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct SocialsDataDto {
    #[serde(default)]
    pub(super) socials: Option<SocialsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct SocialsDto {
    #[serde(default)]
    pub(super) social: Option<Vec<SocialDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SocialDto {
    #[serde(default)]
    pub(super) user_associated_addresses: Option<Vec<String>>,
}
