use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use varr_common::collections::DynArray;
use varr_store::{read_snapshot, write_snapshot};

/// Console shell around the dynamic array container.
///
/// Seeds a small roster, exercises the container's operations, round-trips a snapshot file, and
/// renders the restored sequence through length plus indexed access only.
#[derive(Parser)]
#[command(name = "varr", about = "Dynamic array container demo shell")]
struct Args {
    /// Base name (without extension) for the snapshot file.
    #[arg(long, default_value = "roster")]
    snapshot: String,

    /// Drop roster entries older than this when filtering.
    #[arg(long, default_value_t = 40)]
    max_age: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Friend {
    name: String,
    age: u32,
}

impl Friend {
    fn new(name: &str, age: u32) -> Self {
        Self { name: name.to_string(), age }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut roster: DynArray<Friend> = DynArray::new();
    roster.push(Friend::new("Marta", 27));
    roster.push(Friend::new("Oleh", 44));
    roster.push(Friend::new("Iryna", 31));
    roster.push(Friend::new("Marta", 58));
    roster.push(Friend::new("Petro", 23));

    let probe = Friend::new("Marta", 27);
    if let Some(index) = roster.first_index_of(&probe) {
        info!(index, "first matching entry located");
    }

    roster.sort_by(|a, b| a.name.cmp(&b.name));
    info!(len = roster.len(), "roster sorted by name");

    roster.retain(|friend| friend.age <= args.max_age);
    info!(len = roster.len(), max_age = args.max_age, "roster filtered");

    let path = write_snapshot(&roster, &args.snapshot)?;
    info!(path = %path.display(), "snapshot saved");

    let restored: DynArray<Friend> = read_snapshot(&args.snapshot)?;

    println!("roster ({} entries):", restored.len());
    for i in 0..restored.len() {
        println!("{:>3}: {} ({})", i, restored[i].name, restored[i].age);
    }

    Ok(())
}
