//! CLI `memories` command — dump every stored memory of a user.

use anyhow::Result;

use memchat::config::MemchatConfig;
use memchat::memory::client::HostedMemoryClient;
use memchat::memory::MemoryStore;

pub async fn memories(
    config: &MemchatConfig,
    user: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let user_id = super::resolve_user(config, user);
    let cap = limit.unwrap_or(config.memory.audit_max_memories);
    let client = HostedMemoryClient::new(&config.memory)?;

    let pb = super::spinner("Reading memories...");
    let listing = client.list_all(user_id, cap).await;
    pb.finish_and_clear();
    let listing = listing?;

    if listing.records.is_empty() {
        println!("No memories stored for {user_id}.");
        return Ok(());
    }

    println!("Memories for {user_id}");
    println!("{}", "=".repeat(40));
    for (i, record) in listing.records.iter().enumerate() {
        let created = record.created_at.as_deref().unwrap_or("-");
        println!("  {:>3}. {}  [{}]", i + 1, record.memory, created);
    }
    println!();
    if listing.truncated {
        println!(
            "Showing the first {} memories; pass --limit to read more.",
            listing.records.len()
        );
    } else {
        println!("{} memories.", listing.records.len());
    }

    Ok(())
}
