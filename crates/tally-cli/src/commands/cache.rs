//! Cache command implementations

use anyhow::Result;

use super::Session;

pub fn cmd_cache_list(session: &Session) -> Result<()> {
    let entries = session.cache.entries()?;

    println!();
    println!("🗄️  Cache at {}", session.cache.path());
    if entries.is_empty() {
        println!("   Empty.");
        return Ok(());
    }

    for entry in &entries {
        println!(
            "   {:80} │ {:>10} bytes │ {}",
            entry.key,
            entry.size,
            entry.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!("   {} entries", entries.len());
    Ok(())
}

pub fn cmd_cache_clear(session: &Session) -> Result<()> {
    let removed = session.cache.clear()?;
    println!("✅ Removed {} cache entries", removed);
    Ok(())
}
