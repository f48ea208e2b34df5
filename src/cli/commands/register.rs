//! Register command handler

use std::io::BufRead;

use super::open_state;
use crate::config::Config;

pub async fn cmd_register(
    config: &Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            println!("Password for {username}:");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let state = open_state(config).await?;
    let user = state.auth_service.register(username, &password).await?;

    println!("✓ Created user {} (ID: {})", user.username, user.id);
    Ok(())
}
