//! Blocks command - prints the block palette

use crate::domain::BlockKind;

pub fn run() -> anyhow::Result<()> {
    for entry in BlockKind::palette() {
        println!("{:<12} {:<14} {}", entry.kind.as_str(), entry.label, entry.description);
    }

    Ok(())
}
