//! Basic session example
//!
//! Usage:
//!   AAROGYA_EMAIL=you@example.com AAROGYA_PASSWORD=... cargo run --example basic_session

use aarogya_rs_client::{ApiClient, ClientConfig, NavigatorNoop};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Configuration
    let config = ClientConfig::from_env()?;
    let email = std::env::var("AAROGYA_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password = std::env::var("AAROGYA_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    println!("=== Aarogya Rust Client Example ===");
    println!("API root: {}", config.api_root);
    println!();

    let client = ApiClient::from_config(config, NavigatorNoop::new())?;

    if client.is_authenticated() {
        println!("✓ Restored stored session");
    } else {
        println!("Logging in as {}...", email);
        client.login(&email, &password).await?;
        println!("✓ Logged in");
    }
    if let Some(claims) = client.current_claims() {
        println!("  User id: {:?}, expires at: {:?}", claims.user_id, claims.exp);
    }
    println!();

    // Expired access tokens are refreshed behind this call
    let profile = client.get_profile().await?;
    println!("Profile: {} <{}>", profile.username, profile.email);
    match profile.bmi() {
        Some(bmi) => println!("  BMI: {} ({})", bmi.rounded(), bmi.category),
        None => println!("  Complete your profile to see BMI and BMR"),
    }
    println!();

    let dashboard = client.dashboard_data().await?;
    let trend = dashboard.weight_trend();
    println!("Weight entries in the last 30 days: {}", trend.days_logged());
    if let Some(latest) = trend.latest() {
        println!("  Latest: {} kg on {}", latest.weight_kg, latest.timestamp);
    }
    if let Some(change) = trend.net_change() {
        println!("  Net change: {:+.1} kg", change);
    }
    println!("  Logging adherence: {}%", trend.adherence_percent());
    for entry in &dashboard.symptom_history {
        println!("  Symptom check: {} at {}", entry.predicted_disease, entry.timestamp);
    }
    println!();

    println!("Done!");
    Ok(())
}
