use anyhow::Result;
use convhub_config::Config;
use convhub_server::HubServer;

pub async fn handle(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("Starting ConversationHub server on {}:{}", host, port);
    HubServer::new(config).serve(&host, port).await?;

    Ok(())
}
