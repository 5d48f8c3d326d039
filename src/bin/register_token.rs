use std::{
    process::exit,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use uuid::Uuid;

use shop_book::{LocalIdentityProvider, initialize_db};

/// A utility for registering the token the server signs in with.
///
/// Set the printed token as `BOOTSTRAP_TOKEN` when starting the server so the
/// shop keeps the same identity however the database is moved around.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The token to register, a random one is generated if not given.
    #[arg(long)]
    token: Option<String>,
}

fn main() {
    let args = Args::parse();

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            print_error(format!("Could not open database: {error}"));
            exit(1);
        }
    };

    if let Err(error) = initialize_db(&conn) {
        print_error(format!("Could not set up database: {error}"));
        exit(1);
    }

    let token = args
        .token
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let provider = LocalIdentityProvider::new(Arc::new(Mutex::new(conn)));
    let user_id = match provider.register_custom_token(&token) {
        Ok(user_id) => user_id,
        Err(error) => {
            print_error(format!("Could not register token: {error}"));
            exit(1);
        }
    };

    println!("Registered token for user {user_id}");
    println!();
    println!("BOOTSTRAP_TOKEN='{token}'");
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
