use std::{
    env::{self},
    fs::OpenOptions,
    net::SocketAddr,
    str::FromStr,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use axum::middleware;
#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use shop_book::{
    AppState, PasswordAuthenticator, PasswordHash, build_router, graceful_shutdown,
};

#[cfg(debug_assertions)]
use shop_book::logging_middleware;

/// The web server for Shop Book.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Namespaces the shop's data in the document store.
    #[arg(long, default_value = "default-app-id")]
    app_id: String,

    /// The canonical name of the shop's timezone, e.g. "Asia/Kolkata".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");
    let username = env::var("SHOP_BOOK_USERNAME")
        .expect("The environment variable 'SHOP_BOOK_USERNAME' must be set");
    let password_hash = env::var("SHOP_BOOK_PASSWORD_HASH")
        .expect("The environment variable 'SHOP_BOOK_PASSWORD_HASH' must be set");
    let password_hash = PasswordHash::from_str(&password_hash)
        .expect("'SHOP_BOOK_PASSWORD_HASH' must be a bcrypt hash, see the hash_password binary");
    // Registered with the register_token binary.
    let bootstrap_token = env::var("BOOTSTRAP_TOKEN").ok();

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let app_state = AppState::new(
        conn,
        &secret,
        &args.timezone,
        &args.app_id,
        Arc::new(PasswordAuthenticator::new(username, password_hash)),
        bootstrap_token,
    )
    .expect("Could not create the app state");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    #[cfg(debug_assertions)]
    let router = router
        .layer(middleware::from_fn(logging_middleware))
        .layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled, so skip the 5xx logging.
        .on_failure(());

    router.layer(tracing_layer)
}
