use std::path::Path;

use spirv_reflect::ShaderModule;
use spirv_reflect::types::ReflectShaderStageFlags;

use super::json::*;
use super::{Error, Result};

mod interface;
use interface::*;

mod pipeline_layout;
use pipeline_layout::*;

/// reads a compiled spirv module from disk
pub fn read_spirv(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    Ok(bytes)
}

/// reflects a spirv module into the json model
///
/// Nothing is filtered here; built-ins stay in the variable lists.
pub fn reflect_shader(source_file_name: &str, spirv: &[u8]) -> Result<ReflectedShader> {
    let module = ShaderModule::load_u8_data(spirv).map_err(reflection_error)?;

    let entry_points = module
        .enumerate_entry_points()
        .map_err(reflection_error)?
        .into_iter()
        .map(|entry_point| ReflectedEntryPoint {
            name: entry_point.name,
            stage: shader_stage(entry_point.shader_stage),
        })
        .collect();

    let input_variables = module
        .enumerate_input_variables(None)
        .map_err(reflection_error)?
        .iter()
        .map(reflect_variable)
        .collect();

    let output_variables = module
        .enumerate_output_variables(None)
        .map_err(reflection_error)?
        .iter()
        .map(reflect_variable)
        .collect();

    let descriptor_bindings = module
        .enumerate_descriptor_bindings(None)
        .map_err(reflection_error)?
        .iter()
        .map(reflect_descriptor_binding)
        .collect::<Result<Vec<_>>>()?;

    let push_constant_blocks = module
        .enumerate_push_constant_blocks(None)
        .map_err(reflection_error)?
        .iter()
        .map(reflect_push_constant_block)
        .collect();

    Ok(ReflectedShader {
        source_file_name: source_file_name.to_string(),
        stage: shader_stage(module.get_shader_stage()),
        entry_points,
        input_variables,
        output_variables,
        descriptor_bindings,
        push_constant_blocks,
    })
}

fn reflection_error(message: &'static str) -> Error {
    Error::Reflection(message.to_string())
}

fn shader_stage(flags: ReflectShaderStageFlags) -> ShaderStage {
    if flags.contains(ReflectShaderStageFlags::VERTEX) {
        ShaderStage::Vertex
    } else if flags.contains(ReflectShaderStageFlags::TESSELLATION_CONTROL) {
        ShaderStage::TessellationControl
    } else if flags.contains(ReflectShaderStageFlags::TESSELLATION_EVALUATION) {
        ShaderStage::TessellationEvaluation
    } else if flags.contains(ReflectShaderStageFlags::GEOMETRY) {
        ShaderStage::Geometry
    } else if flags.contains(ReflectShaderStageFlags::FRAGMENT) {
        ShaderStage::Fragment
    } else if flags.contains(ReflectShaderStageFlags::COMPUTE) {
        ShaderStage::Compute
    } else {
        ShaderStage::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_flags() {
        assert_eq!(
            shader_stage(ReflectShaderStageFlags::TESSELLATION_EVALUATION),
            ShaderStage::TessellationEvaluation
        );
        assert_eq!(
            shader_stage(ReflectShaderStageFlags::FRAGMENT),
            ShaderStage::Fragment
        );
        assert_eq!(
            shader_stage(ReflectShaderStageFlags::UNDEFINED),
            ShaderStage::Other
        );
    }

    #[test]
    fn invalid_module_is_a_reflection_error() {
        let err = reflect_shader("zeros.spv", &[0; 8]).unwrap_err();
        assert!(matches!(err, Error::Reflection(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.spv", uuid::Uuid::new_v4()));
        let err = read_spirv(path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
