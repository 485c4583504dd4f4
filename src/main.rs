// Smoke client for the draft-league backend.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep stdout for output)
// 2. Load config
// 3. Build the API client and session context
// 4. Log in when credentials are configured, otherwise probe the session
// 5. Fetch the first Pokemon browser page through a fetch controller
// 6. Print a derived summary (speed tiers, stat colors) and exit

use pokedraft::api::ApiClient;
use pokedraft::config;
use pokedraft::derive::color::stat_color;
use pokedraft::derive::speed::calculate_speed_tiers;
use pokedraft::models::{LoginRequest, PaginatedResponse, Pokemon};
use pokedraft::query::PokemonFilter;
use pokedraft::session::Session;
use pokedraft::transport::RequestOptions;

use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config first; tracing needs the configured log path.
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing.
    init_tracing(&config.log)?;
    info!("pokedraft smoke client starting up");
    info!("Backend: {}", config.server.base_url);

    // 3. Build the API client and session context.
    let client = ApiClient::new(&config).context("failed to build API client")?;
    let session = Session::new();

    // 4. Authenticate.
    if config.credentials.is_complete() {
        let request = LoginRequest {
            username: config.credentials.username.clone().unwrap_or_default(),
            password: config.credentials.password.clone().unwrap_or_default(),
        };
        let user = client
            .login(&request, &session)
            .await
            .context("login failed")?;
        println!("Logged in as {}", user.username);
    } else {
        match client.me(&session).await {
            Ok(Some(user)) => println!("Existing session: {}", user.username),
            Ok(None) => println!("Not logged in (browsing anonymously)"),
            Err(e) => warn!("session probe failed: {e}"),
        }
    }

    // 5. Fetch the first browser page.
    let query = config.browser.list_query(1);
    let filter = PokemonFilter::default();
    let url = client.pokemon_list_url(&query, &filter);
    info!("Fetching {url}");

    let mut controller = client.fetcher::<PaginatedResponse<Pokemon>>();
    let mut rx = controller.subscribe();
    controller.fetch(Some(url), RequestOptions::default());

    let state = rx
        .wait_for(|s| !s.loading && (s.data.is_some() || s.error.is_some()))
        .await
        .context("fetch controller channel closed")?
        .clone();

    if let Some(error) = state.error {
        anyhow::bail!("failed to fetch Pokemon list: {error}");
    }
    let page = state.data.context("fetch resolved without a payload")?;

    // 6. Print the derived summary.
    println!(
        "Page {}/{} — {} of {} Pokemon",
        page.page,
        page.total_pages,
        page.data.len(),
        page.total
    );
    for pokemon in &page.data {
        let tiers = calculate_speed_tiers(pokemon.stats.speed);
        println!(
            "  {:<14} {:<16} speed {:>3} [{}] tiers {}/{}/{}",
            pokemon.name,
            pokemon.types.join("/"),
            pokemon.stats.speed,
            stat_color(pokemon.stats.speed),
            tiers.max_neutral,
            tiers.max_positive,
            tiers.max_positive_plus1,
        );
    }

    controller.dispose();
    info!("pokedraft smoke client done");
    Ok(())
}

/// Initialize tracing to log to the configured file (stdout is reserved for
/// the printed summary).
fn init_tracing(log: &pokedraft::config::LogConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let path = std::path::Path::new(&log.file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(path)?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log.filter.clone())),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
