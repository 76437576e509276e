//! Wire types for the versioned release API.

use relpub_engine::{ReleaseSpec, RemoteAsset};
use serde::{Deserialize, Serialize};

/// JSON payload for `POST {api_base}/releases`.
#[derive(Debug, Serialize)]
pub struct ReleasePayload {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleasePayload {
    pub fn from_spec(spec: &ReleaseSpec) -> Self {
        Self {
            tag_name: spec.tag.clone(),
            target_commitish: spec.target.clone(),
            // The release's display name mirrors the tag.
            name: spec.tag.clone(),
            body: spec.body.clone(),
            draft: spec.draft,
            prerelease: spec.prerelease,
        }
    }
}

/// Release object as returned by the API.
#[derive(Debug, Deserialize)]
pub struct WireRelease {
    pub id: u64,
    pub tag_name: String,
    /// Arrives as an RFC 6570 template: `https://.../assets{?name,label}`.
    #[serde(default)]
    pub upload_url: String,
    #[serde(default)]
    pub assets: Vec<WireAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub state: String,
}

impl From<WireAsset> for RemoteAsset {
    fn from(a: WireAsset) -> Self {
        RemoteAsset {
            id: a.id,
            name: a.name,
            size: a.size,
            state: a.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_name_mirrors_tag() {
        let spec = ReleaseSpec {
            tag: "v2.1.0".into(),
            target: "main".into(),
            body: "changelog".into(),
            draft: true,
            prerelease: false,
        };
        let payload = ReleasePayload::from_spec(&spec);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["tag_name"], "v2.1.0");
        assert_eq!(json["name"], "v2.1.0");
        assert_eq!(json["target_commitish"], "main");
        assert_eq!(json["body"], "changelog");
        assert_eq!(json["draft"], true);
        assert_eq!(json["prerelease"], false);
    }

    #[test]
    fn test_release_parses_without_optional_fields() {
        // Fetch-by-tag responses may omit upload_url templates on some
        // deployments; assets may be absent on a fresh release.
        let json = r#"{"id": 7, "tag_name": "v1.0.0"}"#;
        let release: WireRelease = serde_json::from_str(json).unwrap();
        assert_eq!(release.id, 7);
        assert_eq!(release.tag_name, "v1.0.0");
        assert!(release.upload_url.is_empty());
        assert!(release.assets.is_empty());
    }

    #[test]
    fn test_asset_state_defaults_to_empty() {
        let json = r#"{"id": 3, "name": "tool.tar.gz", "size": 1024}"#;
        let asset: WireAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.state, "");

        let remote: RemoteAsset = asset.into();
        assert_eq!(remote.name, "tool.tar.gz");
        assert_eq!(remote.size, 1024);
    }
}
