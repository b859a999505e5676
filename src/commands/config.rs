//! Config command handler: show effective configuration.

use anyhow::Result;

use super::ResolvedConfig;

pub fn run_config_command(resolved: &ResolvedConfig) -> Result<()> {
    let loaded = &resolved.loaded;
    let config = &resolved.config;
    let extra = &config.extra_storage;
    let attributes = &config.attributes;

    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("session_cookie_name = {}", config.session_cookie_name);
    println!("primary_budget = {}", config.primary_budget);
    println!("cookie_prefix = {}", extra.cookie_prefix);
    println!("additional_cookies = {}", extra.additional_cookies);
    println!("chunk_size = {}", extra.chunk_size);
    println!("path = {}", attributes.path);
    println!(
        "domain = {}",
        attributes.domain.as_deref().unwrap_or("<host-only>")
    );
    println!("secure = {}", attributes.secure);
    println!("http_only = {}", attributes.http_only);
    println!(
        "same_site = {}",
        attributes
            .same_site
            .map_or_else(|| "<unset>".to_string(), |same_site| same_site.to_string())
    );

    Ok(())
}
