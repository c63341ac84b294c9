use anyhow::Result;

use super::Context;
use crate::config::Service;

/// Prints the base URL each service would use for a request made now.
/// `only` restricts the report to one service.
pub fn endpoints(ctx: &Context, only: Option<Service>) -> Result<()> {
    let services = match only {
        Some(service) => vec![service],
        None => Service::ALL.to_vec(),
    };

    for service in services {
        let url = ctx.api.client(service).current_base_url();
        println!(
            "{:<8} {:<12} {}",
            service.name(),
            service.env_key(),
            url.as_deref().unwrap_or("(unset)")
        );
    }
    Ok(())
}
