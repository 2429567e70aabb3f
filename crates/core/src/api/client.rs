use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use rustls::RootCertStore;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::{AncestorLookup, BranchScope, Location, LookupError};

/// Timeout for each lookup request in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client resolving ancestor chains from the dashboard server.
///
/// # Security
///
/// The optional API token is wrapped in `SecretString` from the `secrecy`
/// crate so it never shows up in logs or debug output; it is exposed only
/// when the `Authorization` header is built.
pub struct LookupClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct ShowResponse {
    component: ComponentBody,
    #[serde(default)]
    ancestors: Vec<ComponentBody>,
}

#[derive(Debug, Deserialize)]
struct ComponentBody {
    key: String,
    name: String,
}

impl From<ComponentBody> for Location {
    fn from(body: ComponentBody) -> Location {
        Location::new(body.key, body.name)
    }
}

impl LookupClient {
    /// Creates a new lookup client for the given server.
    ///
    /// TLS is configured with the webpki-roots certificate bundle.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::TlsConfig` if the HTTP client fails to
    /// initialize with the provided TLS configuration.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<SecretString>,
    ) -> Result<Self, LookupError> {
        let root_store = create_webpki_root_store();
        tracing::debug!(
            certificate_count = root_store.len(),
            "Created root certificate store"
        );

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let client = Client::builder()
            .use_preconfigured_tls(tls_config)
            .user_agent("plumb-core")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LookupError::TlsConfig(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn show_url(&self, key: &str, branch: Option<&BranchScope>) -> String {
        let mut url = format!(
            "{}/api/components/show?component={}",
            self.base_url,
            utf8_percent_encode(key, NON_ALPHANUMERIC)
        );

        if let Some((param, value)) = branch.and_then(BranchScope::query_param) {
            url.push_str(&format!(
                "&{}={}",
                param,
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            ));
        }

        url
    }
}

impl AncestorLookup for LookupClient {
    fn fetch_ancestors(
        &self,
        key: &str,
        branch: Option<&BranchScope>,
    ) -> Result<Vec<Location>, LookupError> {
        let url = self.show_url(key, branch);
        tracing::debug!(url = %url, "Fetching ancestor chain");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request.send()?;
        tracing::debug!(status = %response.status(), "Ancestor chain response");

        let response = response.error_for_status().map_err(|e| {
            tracing::error!(
                component = %key,
                status = ?e.status(),
                error = %e,
                "Ancestor chain fetch failed"
            );
            LookupError::Api(format!("Failed to fetch ancestors: {}", e))
        })?;

        let show: ShowResponse = response.json()?;

        // The server reports ancestors nearest-first; the trail wants
        // root-to-target order with the target itself at the end.
        let mut path: Vec<Location> = show
            .ancestors
            .into_iter()
            .rev()
            .map(Location::from)
            .collect();
        path.push(show.component.into());

        tracing::debug!(component = %key, depth = path.len(), "Resolved ancestor chain");

        Ok(path)
    }
}

/// Creates a root certificate store with Mozilla's trusted CA certificates.
fn create_webpki_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    root_store
}
