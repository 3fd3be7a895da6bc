use std::time::Duration;

use infura_rpc_client::CacheConfig;

use crate::network::Network;

/// Construction-time options for an
/// [`InfuraRpcClient`](crate::client::InfuraRpcClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// The Infura project id, embedded in the derived endpoint URL.
    pub project_id: String,
    /// The project secret. Stored for forward compatibility; requests do not
    /// use it.
    pub project_secret: Option<String>,
    /// The network to target.
    pub network: Network,
    /// The response cache policy.
    pub cache: CacheConfig,
    /// Timeout applied to every request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Overrides the derived endpoint URL. Intended for tests and local
    /// nodes; when set, `network` and `project_id` do not affect routing.
    pub url_override: Option<String>,
}

impl ClientConfig {
    /// Creates a configuration with the source's defaults: mainnet, a disk
    /// cache in the default location expiring after 5 seconds, no timeout.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            project_secret: None,
            network: Network::default(),
            cache: CacheConfig::default(),
            timeout: None,
            url_override: None,
        }
    }

    /// Returns the endpoint URL requests will be sent to.
    pub fn endpoint_url(&self) -> String {
        self.url_override
            .clone()
            .unwrap_or_else(|| self.network.endpoint_url(&self.project_id))
    }
}
