//! `gamecp dev`：完整校验后进入监听构建。

use std::path::Path;

use anyhow::Result;
use gamecp_core::paths;

use super::build::{self, BuildOptions};
use super::validate;

pub fn run(extension_dir: &Path) -> Result<()> {
    println!("\n🚀 Starting GameCP Extension Development Mode\n");
    validate::run(&paths::manifest_path(extension_dir))?;

    println!("Starting build in watch mode...\n");
    build::run(
        extension_dir,
        &BuildOptions {
            watch: true,
            out_dir: paths::DEFAULT_OUT_DIR.to_string(),
        },
    )
}
