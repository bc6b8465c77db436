use std::path::PathBuf;

use clap::Parser;
use log::*;

use ash_exhaustive_shader::build_tasks::{self, Config};
use ash_exhaustive_shader::{shader_watcher, util};

/// Generates the pass-through stages needed to build a pipeline around one compiled shader
#[derive(Parser, Debug)]
struct Args {
    /// The compiled spirv shader to build a pipeline around
    #[arg(env = "EXHAUSTIVE_SHADER_PATH")]
    shader_path: PathBuf,

    /// Directory for generated files (defaults to 'passthrough' next to the shader)
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Compile generated stages to spirv with glslc
    #[arg(short = 'c', long = "compile")]
    compile: bool,

    /// The glslc executable to compile with
    #[arg(long = "glslc", env = "GLSLC", default_value = "glslc")]
    glslc: PathBuf,

    /// Also write the reflected interface and pipeline layout as json
    #[arg(long = "reflection-json")]
    reflection_json: bool,

    /// Regenerate whenever the shader file changes
    #[arg(short = 'w', long = "watch")]
    watch: bool,
}

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args = Args::parse();

    let config = Config {
        output_dir: args
            .out_dir
            .unwrap_or_else(|| util::default_output_dir(&args.shader_path)),
        shader_path: args.shader_path,
        compile: args.compile,
        glslc: args.glslc,
        write_reflection_json: args.reflection_json,
    };

    run(&config)?;

    if !args.watch {
        return Ok(());
    }

    let mut changes = shader_watcher::watch(&config.shader_path)?;
    info!("watching {}", config.shader_path.display());

    loop {
        let events = changes.wait()?;
        if !shader_watcher::touches(&events, &config.shader_path) {
            continue;
        }

        // keep watching after a failed run
        if let Err(err) = run(&config) {
            error!("{err:?}");
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let written = build_tasks::write_passthrough_shaders(config)?;
    for path in &written {
        println!("{}", path.display());
    }

    Ok(())
}
