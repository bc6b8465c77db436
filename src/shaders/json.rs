use serde::{Deserialize, Serialize};

mod interface;
pub use interface::*;

mod pipeline_layout;
pub use pipeline_layout::*;

/// reflection data for a single spirv module,
/// as produced by the reflector and consumed by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedShader {
    pub source_file_name: String,
    pub stage: ShaderStage,
    pub entry_points: Vec<ReflectedEntryPoint>,
    #[serde(default)]
    pub input_variables: Vec<ReflectedVariable>,
    #[serde(default)]
    pub output_variables: Vec<ReflectedVariable>,
    #[serde(default)]
    pub descriptor_bindings: Vec<ReflectedDescriptorBinding>,
    #[serde(default)]
    pub push_constant_blocks: Vec<ReflectedPushConstantBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedEntryPoint {
    pub name: String,
    pub stage: ShaderStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
    Other,
}

impl ShaderStage {
    /// the stage name used by glslc's -fshader-stage and in file names
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::TessellationControl => "tesc",
            Self::TessellationEvaluation => "tese",
            Self::Geometry => "geom",
            Self::Fragment => "frag",
            Self::Compute => "comp",
            Self::Other => "unknown",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::TessellationControl => "tessellation control",
            Self::TessellationEvaluation => "tessellation evaluation",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
            Self::Other => "other",
        };

        f.write_str(name)
    }
}
