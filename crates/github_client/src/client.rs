use std::fs::File;
use std::path::Path;
use std::time::Duration;

use relpub_engine::{HostError, ReleaseHost, ReleaseSpec, RemoteAsset, ResolvedRelease};

use crate::wire::{ReleasePayload, WireRelease};

/// Public API endpoint, used when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Pins the response format to the v3 API.
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("relpub/", env!("CARGO_PKG_VERSION"));

/// Uploads stream whole artifacts, so the timeout is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings, resolved by the caller and passed in once.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: String,
    /// Repo-scoped API base, e.g. `https://api.github.com/repos/acme/tool`.
    pub api_base: String,
    /// Dump request/response traffic to stderr.
    pub debug: bool,
}

/// Release API client (blocking).
pub struct GithubClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl GithubClient {
    pub fn new(config: ClientConfig) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { http, config }
    }

    /// Create the release, or adopt the existing one when the tag is
    /// already taken. Any other creation failure is fatal. Normalizes
    /// the upload URL template for subsequent upload calls.
    pub fn ensure_release(&self, spec: &ReleaseSpec) -> Result<ResolvedRelease, HostError> {
        let (release, adopted) = match self.create_release(spec) {
            Ok(r) => (r, false),
            Err(HostError::Status { status, body }) if is_tag_conflict(status, &body) => {
                (self.release_by_tag(&spec.tag)?, true)
            }
            Err(e) => return Err(e),
        };

        Ok(ResolvedRelease {
            id: release.id,
            tag: release.tag_name,
            upload_base: strip_template(&release.upload_url),
            adopted,
        })
    }

    /// `POST {api_base}/releases`.
    pub fn create_release(&self, spec: &ReleaseSpec) -> Result<WireRelease, HostError> {
        let url = format!("{}/releases", self.config.api_base);
        let payload = ReleasePayload::from_spec(spec);
        let body = self.send(self.http.post(&url).json(&payload), "create release")?;
        parse_release(&body)
    }

    /// `GET {api_base}/releases/tags/{tag}`. This is the authoritative
    /// read used for every asset lookup; cached copies are never trusted
    /// for asset presence.
    pub fn release_by_tag(&self, tag: &str) -> Result<WireRelease, HostError> {
        let url = format!("{}/releases/tags/{}", self.config.api_base, tag);
        let body = self.send(self.http.get(&url), "fetch release")?;
        parse_release(&body)
    }

    /// `DELETE {api_base}/releases/assets/{id}`.
    pub fn delete_asset_by_id(&self, asset_id: u64) -> Result<(), HostError> {
        let url = format!("{}/releases/assets/{}", self.config.api_base, asset_id);
        self.send(self.http.delete(&url), "delete asset").map(|_| ())
    }

    /// `POST {upload_base}?name={filename}`, streaming the open file.
    /// The body is a file handle, so the content length must be declared
    /// up front from the file's metadata.
    pub fn upload_file(&self, upload_base: &str, name: &str, path: &Path) -> Result<(), HostError> {
        let file = File::open(path)
            .map_err(|e| HostError::Io(format!("{}: {}", path.display(), e)))?;
        let len = file
            .metadata()
            .map_err(|e| HostError::Io(format!("{}: {}", path.display(), e)))?
            .len();

        let req = self
            .http
            .post(upload_base)
            .query(&[("name", name)])
            .header("Content-Type", "application/octet-stream")
            .body(reqwest::blocking::Body::sized(file, len));
        self.send(req, "upload asset").map(|_| ())
    }

    /// Send a prepared request and classify the status. 200/201/204 are
    /// success; anything else comes back as `HostError::Status` carrying
    /// the code and the raw body, since callers branch on both (conflict
    /// detection, 5xx classification).
    fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
        what: &str,
    ) -> Result<String, HostError> {
        let req = req
            .bearer_auth(&self.config.token)
            .header("Accept", ACCEPT_HEADER)
            .build()
            .map_err(|e| HostError::Network(e.to_string()))?;

        if self.config.debug {
            eprint!("{}", dump_request(&req));
        }

        let resp = self
            .http
            .execute(req)
            .map_err(|e| HostError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| HostError::Network(e.to_string()))?;

        if self.config.debug {
            eprintln!("<== {status} ({what})");
            eprintln!("{body}");
        }

        match status {
            200 | 201 | 204 => Ok(body),
            _ => Err(HostError::Status { status, body }),
        }
    }
}

impl ReleaseHost for GithubClient {
    fn ensure_release(&self, spec: &ReleaseSpec) -> Result<ResolvedRelease, HostError> {
        GithubClient::ensure_release(self, spec)
    }

    fn find_asset(&self, tag: &str, name: &str) -> Result<Option<RemoteAsset>, HostError> {
        let release = self.release_by_tag(tag)?;
        Ok(release
            .assets
            .into_iter()
            .find(|a| a.name == name)
            .map(RemoteAsset::from))
    }

    fn delete_asset(&self, asset_id: u64) -> Result<(), HostError> {
        self.delete_asset_by_id(asset_id)
    }

    fn upload_asset(&self, upload_base: &str, name: &str, file: &Path) -> Result<(), HostError> {
        self.upload_file(upload_base, name, file)
    }
}

/// Detect the "a release with this tag already exists" creation failure.
///
/// The API signals it as a 4xx whose body carries an `already_exists`
/// error code. Matching a body substring is brittle, so the heuristic
/// lives here and nowhere else.
pub fn is_tag_conflict(status: u16, body: &str) -> bool {
    (400..500).contains(&status) && body.contains("already_exists")
}

/// Upload URLs arrive as a template, e.g.
/// `https://uploads.github.com/repos/acme/tool/releases/1/assets{?name,label}`.
/// Everything from the first `{` is dropped.
fn strip_template(upload_url: &str) -> String {
    match upload_url.find('{') {
        Some(idx) => upload_url[..idx].to_string(),
        None => upload_url.to_string(),
    }
}

fn parse_release(body: &str) -> Result<WireRelease, HostError> {
    serde_json::from_str(body).map_err(|e| HostError::Parse(format!("release JSON: {e}")))
}

/// Debug dump of an outgoing request: method, URL, and headers. The
/// Authorization value is redacted so tokens never land in logs.
fn dump_request(req: &reqwest::blocking::Request) -> String {
    use std::fmt::Write;

    let mut out = format!("==> {} {}\n", req.method(), req.url());
    for (name, value) in req.headers() {
        if name == reqwest::header::AUTHORIZATION {
            let _ = writeln!(out, "    {name}: <redacted>");
        } else {
            let _ = writeln!(out, "    {name}: {}", value.to_str().unwrap_or("<non-ascii>"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_template() {
        assert_eq!(
            strip_template("https://up.example.com/releases/1/assets{?name,label}"),
            "https://up.example.com/releases/1/assets"
        );
        assert_eq!(
            strip_template("https://up.example.com/releases/1/assets"),
            "https://up.example.com/releases/1/assets"
        );
        assert_eq!(strip_template(""), "");
    }

    #[test]
    fn test_tag_conflict_detection() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"Release","code":"already_exists","field":"tag_name"}]}"#;
        assert!(is_tag_conflict(422, body));
        assert!(is_tag_conflict(409, body));

        // 5xx with a coincidental body match is not a conflict.
        assert!(!is_tag_conflict(500, body));
        // Same status, different failure.
        assert!(!is_tag_conflict(422, r#"{"message":"body too long"}"#));
    }

    #[test]
    fn test_parse_release_error_is_parse_variant() {
        let err = parse_release("not json").unwrap_err();
        assert!(matches!(err, HostError::Parse(_)));
    }

    #[test]
    fn test_request_dump_shows_headers_and_redacts_token() {
        let client = GithubClient::new(ClientConfig {
            token: "s3cret".into(),
            api_base: "http://example.invalid/repos/acme/tool".into(),
            debug: true,
        });
        let req = client
            .http
            .post("http://example.invalid/repos/acme/tool/releases")
            .bearer_auth("s3cret")
            .header("Accept", ACCEPT_HEADER)
            .build()
            .unwrap();

        let dump = dump_request(&req);
        assert!(dump.contains("POST http://example.invalid/repos/acme/tool/releases"));
        assert!(dump.contains("accept: application/vnd.github.v3+json"));
        assert!(dump.contains("authorization: <redacted>"));
        assert!(!dump.contains("s3cret"));
    }
}
