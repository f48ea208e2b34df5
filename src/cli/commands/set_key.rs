//! Set-key command handler

use super::{open_state, resolve_user};
use crate::config::Config;
use crate::domain::Provider;

pub async fn cmd_set_key(
    config: &Config,
    username: &str,
    provider: Provider,
    key: &str,
) -> anyhow::Result<()> {
    let state = open_state(config).await?;
    let user = resolve_user(&state, username).await?;

    state.credentials.save(user, provider, key).await?;
    println!("✓ Saved {} API key", provider.display_name());

    let check = state.llm.test_connection(provider, key.trim()).await;
    if check.success {
        println!("  Connection test: {}", check.message);
    } else {
        println!("  Connection test failed: {}", check.message);
    }

    Ok(())
}
