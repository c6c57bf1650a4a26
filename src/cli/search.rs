use anyhow::Result;

use memchat::config::MemchatConfig;
use memchat::memory::client::HostedMemoryClient;
use memchat::memory::MemoryStore;

/// Run a memory search from the terminal.
pub async fn search(
    config: &MemchatConfig,
    query: &str,
    user: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let user_id = super::resolve_user(config, user);
    let limit = limit.unwrap_or(config.memory.search_limit);
    let client = HostedMemoryClient::new(&config.memory)?;

    let results = client.search(query, user_id, limit).await?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());

    for (i, record) in results.iter().enumerate() {
        let score = record
            .score
            .map(|s| format!(" (score: {s:.4})"))
            .unwrap_or_default();
        println!(
            "  {}. {}{}",
            i + 1,
            record.id.as_deref().unwrap_or("-"),
            score
        );
        println!("     {}", super::preview(&record.memory, 120));
        println!();
    }

    Ok(())
}
