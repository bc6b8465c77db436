use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use log::*;

use super::json::ShaderStage;

/// turns generated glsl into spirv
pub trait ShaderCompiler {
    /// `work_dir` holds the compiler's input and output files
    fn compile(&self, stage: ShaderStage, source: &str, work_dir: &Path)
    -> anyhow::Result<Vec<u32>>;
}

/// glslc from the vulkan sdk
#[derive(Debug, Clone)]
pub struct Glslc {
    pub program: PathBuf,
}

impl Default for Glslc {
    fn default() -> Self {
        Self::new("glslc")
    }
}

impl Glslc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, stage: ShaderStage, in_path: &Path, out_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg(format!("-fshader-stage={}", stage.file_extension()))
            .arg(in_path)
            .arg("-o")
            .arg(out_path);

        command
    }
}

impl ShaderCompiler for Glslc {
    fn compile(
        &self,
        stage: ShaderStage,
        source: &str,
        work_dir: &Path,
    ) -> anyhow::Result<Vec<u32>> {
        std::fs::create_dir_all(work_dir)?;

        let extension = stage.file_extension();
        let in_path = work_dir.join(format!("passthrough.{extension}.glsl"));
        let out_path = work_dir.join(format!("passthrough.{extension}.spv"));

        std::fs::write(&in_path, source)
            .with_context(|| format!("failed to write {}", in_path.display()))?;

        let output = self
            .command(stage, &in_path, &out_path)
            .output()
            .with_context(|| format!("failed to run {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("failed to compile {stage} shader {}:\n{stderr}", in_path.display());
        }

        let mut spv_file = std::fs::File::open(&out_path)
            .with_context(|| format!("failed to open {}", out_path.display()))?;
        let words = ash::util::read_spv(&mut spv_file)?;

        debug!("compiled {stage} shader to {} words", words.len());

        Ok(words)
    }
}
