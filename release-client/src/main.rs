use dotenvy::dotenv;
use release_client::config::get_configuration;
use release_client::{endpoints, Access, AppContext, AppOptions, AuthGuard, Guardage, QueryClient};
use release_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "release-client",
        &configuration.logging.level,
        configuration.logging.otlp_endpoint.as_deref(),
    )?;

    let context = AppContext::builder(configuration).build();
    context.session.load();

    let client = QueryClient::new(context.clone())
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    let guard = AuthGuard::new(context.clone());

    let command = std::env::args().nth(1).unwrap_or_else(|| "ping".to_string());
    tracing::info!(command = %command, api = %client.transport().base_url(), "Starting release-client");

    match command.as_str() {
        "ping" => {
            guard.enter(Some(Access::Public));
            let ping = client.query(endpoints::APP_API_PUBLIC_PING_DETAILS, (), AppOptions::new());
            if let Ok(envelope) = ping.fetch().await {
                if let Some(result) = envelope.result() {
                    println!("backend time: {}", result.time);
                }
            }
        }
        "me" | "releases" => {
            if guard.enter(Some(Access::User)) != Guardage::Allowed {
                anyhow::bail!("Log in first");
            }

            if command == "me" {
                let me = client.query(endpoints::ACCOUNTS_API_ME, (), AppOptions::new());
                if let Ok(envelope) = me.fetch().await {
                    if let Some(result) = envelope.result() {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                }
            } else {
                let releases = client.query(endpoints::RELEASES_API_GET_ALL_RELEASES, (), AppOptions::new());
                if let Ok(envelope) = releases.fetch().await {
                    if let Some(result) = envelope.result() {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                }
            }
        }
        other => anyhow::bail!("Unknown command: {}", other),
    }

    Ok(())
}
