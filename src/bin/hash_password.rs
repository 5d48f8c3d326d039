use std::{
    io::{self},
    process::exit,
};

use clap::Parser;

use shop_book::{PasswordHash, ValidatedPassword};

/// A utility for creating the password hash the server logs in with.
///
/// Set the printed hash as `SHOP_BOOK_PASSWORD_HASH` when starting the server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The bcrypt cost, higher is slower to hash and to guess.
    #[arg(long, default_value_t = PasswordHash::DEFAULT_COST)]
    cost: u32,
}

fn main() {
    let args = Args::parse();

    let Some(password_hash) = get_new_password_hash(args.cost) else {
        exit(1);
    };

    println!();
    println!("SHOP_BOOK_PASSWORD_HASH='{password_hash}'");
}

fn get_new_password_hash(cost: u32) -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        let validated_password = match ValidatedPassword::new(&first_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::new(validated_password, cost) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

/// Read a password without echoing it, `None` if stdin closed or failed.
fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
