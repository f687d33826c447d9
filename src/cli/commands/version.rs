//! Version command implementation

use crate::cli::Output;
use crate::{PKG_DESCRIPTION, PKG_NAME, VERSION};
use anyhow::Result;

pub fn execute(output: &Output) -> Result<()> {
    output.header(&format!("{PKG_NAME} v{VERSION}"));
    output.key_value("Description:", PKG_DESCRIPTION);
    output.key_value("Authors:", env!("CARGO_PKG_AUTHORS"));
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );
    Ok(())
}
