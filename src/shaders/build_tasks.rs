use std::path::PathBuf;

use anyhow::Context;
use log::*;

use crate::util::shader_name;

use super::compile::{Glslc, ShaderCompiler};
use super::json::ReflectedShader;
use super::reflection::{read_spirv, reflect_shader};
use super::{ExhaustiveShader, Outcome};

pub struct Config {
    /// the compiled spirv module to build a pipeline around
    pub shader_path: PathBuf,
    /// the directory to write generated glsl, spirv & json to
    pub output_dir: PathBuf,
    /// whether to compile generated stages to spirv (or only write glsl)
    pub compile: bool,
    /// the glslc executable to compile with
    pub glslc: PathBuf,
    /// whether to write the reflected interface & layout json
    pub write_reflection_json: bool,
}

/// reflects the shader at `config.shader_path` and writes pass-through stages for it
///
/// Returns the paths written, which is empty when the shader is skipped.
pub fn write_passthrough_shaders(config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let spirv = read_spirv(&config.shader_path)
        .with_context(|| format!("failed to read {}", config.shader_path.display()))?;

    let source_file_name = config
        .shader_path
        .file_name()
        .and_then(|os_str| os_str.to_str())
        .context("shader path has no file name")?;

    let shader = reflect_shader(source_file_name, &spirv)?;
    let glslc = Glslc::new(&config.glslc);

    write_reflected_passthrough_shaders(config, &shader, &glslc)
}

pub fn write_reflected_passthrough_shaders(
    config: &Config,
    shader: &ReflectedShader,
    compiler: &impl ShaderCompiler,
) -> anyhow::Result<Vec<PathBuf>> {
    let exhaustive = match ExhaustiveShader::from_reflection(shader)? {
        Outcome::Generated(exhaustive) => exhaustive,
        Outcome::Skipped(_) => return Ok(vec![]),
    };

    let shader_name = shader_name(&exhaustive.source_file_name);
    let work_dir = config.output_dir.join(format!("{shader_name}.work"));

    let mut generated_files = vec![];
    for generated in &exhaustive.generated {
        let extension = generated.stage.file_extension();

        generated_files.push(GeneratedFile {
            relative_path: PathBuf::from(format!("{shader_name}.{extension}.glsl")),
            content: generated.source.clone().into_bytes(),
        });

        if config.compile {
            let words = compiler.compile(generated.stage, &generated.source, &work_dir)?;
            generated_files.push(GeneratedFile {
                relative_path: PathBuf::from(format!("{shader_name}.{extension}.spv")),
                content: words.iter().flat_map(|word| word.to_le_bytes()).collect(),
            });
        }
    }

    if config.write_reflection_json {
        let reflection_json = serde_json::to_string_pretty(&exhaustive.reflection_json())?;
        generated_files.push(GeneratedFile {
            relative_path: PathBuf::from(format!("{shader_name}.json")),
            content: reflection_json.into_bytes(),
        });
    }

    let mut written = vec![];
    for generated_file in &generated_files {
        written.push(write_generated_file(config, generated_file)?);
    }

    info!(
        "wrote {} files for {} to {}",
        written.len(),
        exhaustive.source_file_name,
        config.output_dir.display()
    );

    Ok(written)
}

struct GeneratedFile {
    /// the path relative to the output dir
    relative_path: PathBuf,
    content: Vec<u8>,
}

fn write_generated_file(
    config: &Config,
    generated_file: &GeneratedFile,
) -> anyhow::Result<PathBuf> {
    let absolute_path = config.output_dir.join(&generated_file.relative_path);

    std::fs::create_dir_all(&config.output_dir)?;
    std::fs::write(&absolute_path, &generated_file.content)
        .with_context(|| format!("failed to write {}", absolute_path.display()))?;

    debug!("wrote {}", absolute_path.display());

    Ok(absolute_path)
}
