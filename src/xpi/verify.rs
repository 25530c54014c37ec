use crate::context::Context;
use crate::result::Result;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
}

/// Read the central directory of a finished archive, in archive order.
/// Opens its own handle; nothing from the write phase is reused.
pub fn list_entries(path: &Path) -> Result<Vec<EntryInfo>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        entries.push(EntryInfo {
            name: entry.name().to_string(),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
        });
    }

    Ok(entries)
}

pub fn print_contents(ctx: &Context, entries: &[EntryInfo]) {
    println!();
    println!("XPI contents (in order):");
    for entry in entries {
        if ctx.verbose {
            println!(
                "  {} ({} bytes, {} compressed)",
                entry.name, entry.size, entry.compressed_size
            );
        } else {
            println!("  {} ({} bytes)", entry.name, entry.size);
        }
    }
}
