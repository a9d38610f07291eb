//! Staged Collection Demonstration
//!
//! This example demonstrates embedding a `Snapshot` inside an aggregate
//! root to stage membership changes against a lazily loaded roster.
//!
//! Key concepts illustrated:
//! 1. Lazy, load-once materialization of the base set
//! 2. Immutable snapshots (every add/remove derives a new one)
//! 3. Cancellation of pending changes
//! 4. Inspecting exactly what was staged via added/removed deltas

use stageset_core::logging::{self, Profile};
use stageset_core::{Identifiable, Identity, Snapshot};

#[derive(Debug, Clone)]
struct Player {
    id: String,
    display_name: String,
}

impl Player {
    fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl Identifiable for Player {
    fn identity(&self) -> Identity {
        Identity::new(self.id.clone())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(Profile::Development);

    println!("=== StageSet Staging Demo ===\n");

    // ===== Part 1: Lazy base set =====
    println!("## Part 1: Lazy Loading\n");

    // Stands in for a repository query; invoked at most once per lineage
    let roster = Snapshot::new(|| {
        println!("(loader invoked)");
        vec![
            Ok(Player::new("p-1", "Ada")),
            Ok(Player::new("p-2", "Brendan")),
        ]
        .into_iter()
    });

    println!("Roster created, loader not yet invoked");
    println!("Roster size: {}\n", roster.count()?);

    // ===== Part 2: Staging changes =====
    println!("## Part 2: Staging\n");

    let with_recruit = roster.add([Player::new("p-3", "Grace")]);
    let after_transfer = with_recruit.remove([Player::new("p-1", "Ada")]);

    println!("Pending additions:");
    for player in after_transfer.added_items() {
        println!("  + {} ({})", player.display_name, player.id);
    }
    println!("Pending removals:");
    for player in after_transfer.removed_items() {
        println!("  - {} ({})", player.display_name, player.id);
    }

    println!("\nReconciled roster ({} players):", after_transfer.count()?);
    for player in after_transfer.to_vec()? {
        println!("  {} ({})", player.display_name, player.id);
    }

    // The original snapshot is untouched
    println!("\nOriginal roster still has {} players", roster.count()?);

    // ===== Part 3: Cancellation =====
    println!("\n## Part 3: Cancellation\n");

    let reverted = after_transfer.add([Player::new("p-1", "Ada")]);
    println!(
        "Re-adding Ada cancels her pending removal: {} removals left",
        reverted.removed_items().count()
    );
    println!("Reverted roster size: {}", reverted.count()?);

    Ok(())
}
