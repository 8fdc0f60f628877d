//! User-detail fetch and profile normalization.
//!
//! The profile fetch authenticates with a bearer Authorization header, never
//! with query parameters. Normalization is pure: raw payload in, canonical
//! profile out, with no network or storage access.

use serde_json::Value;

use crate::provider::ProviderDescriptor;

use super::errors::OAuth2Error;
use super::nickname;
use super::types::NormalizedProfile;

/// Separator used when flattening tenant memberships into one label. The
/// provider reports Chinese-language tenant names, hence the full-width comma.
const TENANT_SEPARATOR: &str = "\u{ff0c}";

pub(crate) async fn fetch_profile(
    client: &reqwest::Client,
    descriptor: &ProviderDescriptor,
    access_token: &str,
) -> Result<Value, OAuth2Error> {
    let response = client
        .get(descriptor.profile_url.as_str())
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| OAuth2Error::FetchProfile(e.to_string()))?;

    let body = response
        .text()
        .await
        .map_err(|e| OAuth2Error::FetchProfile(e.to_string()))?;

    tracing::debug!("Profile response body: {:#?}", body);
    serde_json::from_str(&body)
        .map_err(|e| OAuth2Error::MalformedProfile(format!("failed to parse profile body: {e}")))
}

/// Convert the provider's user-detail payload into a [`NormalizedProfile`].
///
/// The external id lives at `data.user_base_info.user_id` and is the only
/// mandatory field. The display name is a generated placeholder nickname.
pub fn normalize_profile(raw: &Value) -> Result<NormalizedProfile, OAuth2Error> {
    let external_id = match raw.pointer("/data/user_base_info/user_id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(OAuth2Error::MalformedProfile(
                "data.user_base_info.user_id missing".to_string(),
            ));
        }
    };

    let mobile = raw
        .pointer("/data/mobile")
        .and_then(Value::as_str)
        .map(str::to_string);

    let tenant_label = tenant_label(raw);
    let derived_email = tenant_label.as_ref().map(|label| format!("@{label}"));

    Ok(NormalizedProfile {
        external_id,
        display_name: nickname::generate(),
        mobile,
        tenant_label,
        derived_email,
    })
}

fn tenant_label(raw: &Value) -> Option<String> {
    let tenants = raw.pointer("/data/tenant_list")?.as_array()?;
    let label = tenants
        .iter()
        .filter_map(|tenant| tenant.get("tenant_name").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join(TENANT_SEPARATOR);

    (!label.is_empty()).then_some(label)
}
