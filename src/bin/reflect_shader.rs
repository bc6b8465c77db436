use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ash_exhaustive_shader::shaders::reflection::{read_spirv, reflect_shader};

/// Prints the reflection json for a compiled spirv shader
/// the output can be checked in under shaders/reflected as a test fixture
#[derive(Parser, Debug)]
struct Args {
    shader_path: PathBuf,
}

pub fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    let source_file_name = args
        .shader_path
        .file_name()
        .and_then(|os_str| os_str.to_str())
        .context("shader path has no file name")?;

    let spirv = read_spirv(&args.shader_path)?;
    let reflected = reflect_shader(source_file_name, &spirv)?;

    println!("{}", serde_json::to_string_pretty(&reflected)?);

    Ok(())
}
