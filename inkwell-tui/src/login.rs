//! Line-mode login prompt, run before the table screen.

use std::io::Write;

use inkwell_lib::api::{DEMO_EMAIL, DEMO_PASSWORD};
use inkwell_lib::auth::AuthService;
use inkwell_lib::model::LoginRequest;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::error::AppError;

const MAX_ATTEMPTS: usize = 3;

/// Ask for credentials until a login succeeds.
///
/// Fails with [`AppError::NotSignedIn`] after [`MAX_ATTEMPTS`] failures or
/// when stdin closes.
pub async fn prompt(auth: &AuthService, show_demo_hint: bool) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Sign in to Inkwell");
    if show_demo_hint {
        println!("(demo account: {} / {})", DEMO_EMAIL, DEMO_PASSWORD);
    }

    for attempt in 1..=MAX_ATTEMPTS {
        let Some(email) = ask(&mut lines, "Email: ").await? else {
            return Err(AppError::NotSignedIn);
        };
        let Some(password) = ask(&mut lines, "Password: ").await? else {
            return Err(AppError::NotSignedIn);
        };

        let result = auth.login(&LoginRequest::new(email.trim(), password)).await;
        match result.error() {
            None => return Ok(()),
            Some(message) => {
                log::info!("[login] attempt {} failed", attempt);
                println!("{}", message);
            }
        }
    }

    Err(AppError::NotSignedIn)
}

async fn ask(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>, AppError> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
