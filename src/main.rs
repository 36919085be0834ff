//! Demo entrypoint: log in (remembering the session across runs), show who we
//! are and list the next two weeks of shifts.

use std::io;

use anyhow::{Context, Result};
use chrono::{Days, Local};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use humanforce::{Credentials, HumanforceClient};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let credentials =
        Credentials::load("credentials.json").context("Failed to read credentials.json")?;

    let client = HumanforceClient::new()?;
    client
        .login(&credentials.email, &credentials.password, true)
        .await
        .context("Login failed")?;
    info!("login complete");

    let profile = client
        .get_profile()
        .await
        .context("Failed to fetch profile")?;
    println!(
        "Logged into {} as {} ({})!",
        client.company_name().await?,
        profile.full_name(),
        profile.employee_code
    );

    let today = Local::now().date_naive();
    let end = today.checked_add_days(Days::new(14)).unwrap_or(today);
    let shifts = client
        .get_calendar(Some(today), Some(end))
        .await
        .context("Failed to fetch calendar")?;

    println!("Next 14 days...");
    for shift in &shifts {
        println!(
            " - {} - {} {}",
            shift.start_time.format("%a %Y-%m-%d %H:%M"),
            shift.end_time.format("%H:%M"),
            shift.role.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
