//! System command handler.
//!
//! Shows host-wide figures reported by the API.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::output::{format_system_info, print_banner, print_failure, BannerColor};

/// Print the `/system` report.
///
/// A failed request is reported and still returns `Ok(())`.
pub fn system_command(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;

    match client.fetch_system_info() {
        Ok(info) => {
            print_banner("SYSTEM", BannerColor::Cyan);
            println!("{}", format_system_info(&info));
        }
        Err(e) => print_failure(&format!("Error fetching system info: {}", e)),
    }
    Ok(())
}
