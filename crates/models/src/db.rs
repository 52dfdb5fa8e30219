use std::time::Duration;

use configs::DatabaseConfig;
use mongodb::{
    options::{ClientOptions, Credential, ServerApi, ServerApiVersion},
    Client, Database,
};

/// Build client options: stable API v1 (strict), connect timeouts and,
/// when the URI was assembled from parts, explicit credentials.
pub async fn client_options(cfg: &DatabaseConfig) -> anyhow::Result<ClientOptions> {
    let mut options = ClientOptions::parse(cfg.connection_uri()).await?;
    let timeout = Duration::from_secs(cfg.connect_timeout_secs);
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );
    if let Some((user, password)) = cfg.credentials() {
        options.credential = Some(Credential::builder().username(user).password(password).build());
    }
    Ok(options)
}

/// Client handle for the configured database. No round trip happens here;
/// readiness is checked by the caller with a ping.
pub async fn open(cfg: &DatabaseConfig) -> anyhow::Result<Database> {
    let options = client_options(cfg).await?;
    let client = Client::with_options(options)?;
    Ok(client.database(&cfg.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_uri_gets_stable_api_and_timeouts() {
        let cfg = DatabaseConfig {
            uri: "mongodb://localhost:27017".into(),
            user: "ignored".into(),
            password: "ignored".into(),
            connect_timeout_secs: 4,
            ..DatabaseConfig::default()
        };
        let options = client_options(&cfg).await.unwrap();
        assert!(options.server_api.is_some());
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(4)));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(4)));
        assert!(options.credential.is_none());
    }
}
