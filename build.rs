// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Builds from a source tarball have no .git; fall back to the plain version.
    EmitBuilder::builder()
        .fail_on_error()
        .git_sha(true)
        .git_commit_date()
        .emit()
        .or_else(|_| EmitBuilder::builder().emit())?;
    Ok(())
}
