//! Health command handler.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::output::{format_health, print_banner, print_failure, BannerColor};
use crate::record::HealthStatus;

/// Query `/health` and print the server's answer.
///
/// An unreachable server is reported and still returns `Ok(())`.
pub fn health_command(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    match client.health() {
        Ok(health) => {
            print_banner("HEALTH", banner_color(&health));
            println!("{} {}", client.base_url(), format_health(&health));
        }
        Err(e) => {
            print_banner("HEALTH", BannerColor::Red);
            print_failure(&format!("API unreachable: {}", e));
        }
    }
    Ok(())
}

fn banner_color(health: &HealthStatus) -> BannerColor {
    if health.is_healthy() {
        BannerColor::Green
    } else {
        BannerColor::Yellow
    }
}
