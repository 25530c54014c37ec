pub mod archive;
pub mod verify;

use crate::context::Context;
use crate::manifest::Manifest;
use crate::result::Result;

/// Write the archive, then read it back and print its listing
pub fn build(ctx: &Context, manifest: &Manifest) -> Result<archive::BuildReport> {
    let report = archive::create_xpi(ctx, manifest)?;
    let contents = verify::list_entries(&report.archive_path)?;
    verify::print_contents(ctx, &contents);
    Ok(report)
}
