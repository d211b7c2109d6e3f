//! Build script for quickhook-cli.
//!
//! Emits the metadata printed by `quickhook --verbose` at startup:
//! - Build timestamp
//! - Rustc version
//! - Commit the binary was built from

use vergen_git2::{Emitter, Git2Builder};

fn main() -> anyhow::Result<()> {
    let build = vergen::BuildBuilder::default().build_timestamp(true).build()?;
    let rustc = vergen::RustcBuilder::default().semver(true).build()?;

    vergen::Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&rustc)?
        .emit()?;

    // Builds from a source tarball have no repository; vergen falls back to defaults
    let git2 = Git2Builder::default().sha(true).build()?;
    Emitter::default().add_instructions(&git2)?.emit()?;

    Ok(())
}
