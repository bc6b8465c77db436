use std::collections::BTreeSet;

use log::*;
use serde::{Deserialize, Serialize};

use extract::{Extraction, ShaderInterface, extract_interface};
use json::*;
use passthrough::PassthroughStage;

pub mod build_tasks;
pub mod compile;
pub mod extract;
pub mod glsl_types;
pub mod json;
pub mod passthrough;
pub mod reflection;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("spirv reflection failed: {0}")]
    Reflection(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("no glsl spelling for type kind {0:?}")]
    UnsupportedType(TypeKind),

    #[error("can't infer array element type from format {0:?}")]
    UnknownArrayElement(ReflectedFormat),
}

pub type Result<T> = std::result::Result<T, Error>;

/// reasons a shader has no exhaustive pipeline; these are skips, not failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedShader {
    #[error("module has no entry point")]
    NoEntryPoint,

    #[error("module has {0} entry points")]
    MultipleEntryPoints(usize),

    #[error("no pass-through stages for {0} shaders")]
    Stage(ShaderStage),

    #[error("descriptor set {0} is past the last usable set index")]
    DescriptorSet(u32),
}

/// which of the tested shader's interface lists a generated stage mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    Inputs,
    Outputs,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassthroughPlan {
    pub target: PassthroughStage,
    pub mirror: Mirror,
}

impl PassthroughPlan {
    const fn new(target: PassthroughStage, mirror: Mirror) -> Self {
        Self { target, mirror }
    }
}

/// the stages to generate to complete a pipeline around a shader of `stage`
///
/// Returns None for stages that can't be completed this way.
pub fn passthrough_plan(stage: ShaderStage) -> Option<&'static [PassthroughPlan]> {
    use Mirror::*;
    use PassthroughStage::*;

    const FROM_INPUTS: &[PassthroughPlan] = &[PassthroughPlan::new(Vertex, Inputs)];
    const AROUND_CONTROL: &[PassthroughPlan] = &[
        PassthroughPlan::new(Vertex, Inputs),
        PassthroughPlan::new(TessellationEvaluation, Outputs),
    ];
    const AROUND_EVALUATION: &[PassthroughPlan] = &[
        PassthroughPlan::new(Vertex, Nothing),
        PassthroughPlan::new(TessellationControl, Inputs),
    ];

    match stage {
        ShaderStage::Vertex | ShaderStage::Compute => Some(&[]),
        ShaderStage::Fragment | ShaderStage::Geometry => Some(FROM_INPUTS),
        ShaderStage::TessellationControl => Some(AROUND_CONTROL),
        ShaderStage::TessellationEvaluation => Some(AROUND_EVALUATION),
        ShaderStage::Other => None,
    }
}

#[derive(Debug)]
pub enum Outcome {
    Generated(ExhaustiveShader),
    Skipped(UnsupportedShader),
}

/// a tested shader's interface, with generated sources for the stages around it
#[derive(Debug)]
pub struct ExhaustiveShader {
    pub source_file_name: String,
    pub interface: ShaderInterface,
    pub generated: Vec<GeneratedStage>,
}

#[derive(Debug, Clone)]
pub struct GeneratedStage {
    pub stage: ShaderStage,
    pub source: String,
}

impl ExhaustiveShader {
    pub fn from_reflection(shader: &ReflectedShader) -> Result<Outcome> {
        let interface = match extract_interface(shader) {
            Extraction::Extracted(interface) => interface,
            Extraction::Unsupported(reason) => {
                warn!("skipping {}: {reason}", shader.source_file_name);
                return Ok(Outcome::Skipped(reason));
            }
        };

        let Some(plan) = passthrough_plan(interface.stage) else {
            let reason = UnsupportedShader::Stage(interface.stage);
            warn!("skipping {}: {reason}", shader.source_file_name);
            return Ok(Outcome::Skipped(reason));
        };

        let mut generated = Vec::with_capacity(plan.len());
        for entry in plan {
            let variables: &[ReflectedVariable] = match entry.mirror {
                Mirror::Inputs => &interface.inputs,
                Mirror::Outputs => &interface.outputs,
                Mirror::Nothing => &[],
            };

            generated.push(GeneratedStage {
                stage: entry.target.stage(),
                source: passthrough::generate(entry.target, interface.stage, variables)?,
            });
        }

        info!(
            "{} ({} shader): {} inputs, {} outputs, {} descriptor sets, {} generated stages",
            shader.source_file_name,
            interface.stage,
            interface.inputs.len(),
            interface.outputs.len(),
            interface.pipeline_layout.descriptor_set_layouts.len(),
            generated.len(),
        );

        Ok(Outcome::Generated(Self {
            source_file_name: shader.source_file_name.clone(),
            interface,
            generated,
        }))
    }

    pub fn pipeline_layout(&self) -> &ReflectedPipelineLayout {
        &self.interface.pipeline_layout
    }

    /// every stage of the completed pipeline in pipeline order, the tested one included
    pub fn pipeline_stages(&self) -> Vec<ShaderStage> {
        let stages: BTreeSet<ShaderStage> = self
            .generated
            .iter()
            .map(|generated| generated.stage)
            .chain([self.interface.stage])
            .collect();

        stages.into_iter().collect()
    }

    pub fn reflection_json(&self) -> ReflectionJson {
        ReflectionJson {
            source_file_name: self.source_file_name.clone(),
            stage: self.interface.stage,
            entry_point: self.interface.entry_point.clone(),
            pipeline_stages: self.pipeline_stages(),
            pipeline_layout: self.interface.pipeline_layout.clone(),
            input_attachment_indices: self.interface.input_attachment_indices.clone(),
        }
    }
}

/// the json written next to generated shaders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionJson {
    pub source_file_name: String,
    pub stage: ShaderStage,
    pub entry_point: String,
    pub pipeline_stages: Vec<ShaderStage>,
    pub pipeline_layout: ReflectedPipelineLayout,
    pub input_attachment_indices: BTreeSet<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture(json: &str) -> ReflectedShader {
        serde_json::from_str(json).unwrap()
    }

    fn generated(shader: &ReflectedShader) -> ExhaustiveShader {
        match ExhaustiveShader::from_reflection(shader).unwrap() {
            Outcome::Generated(exhaustive) => exhaustive,
            Outcome::Skipped(reason) => panic!("unexpected skip: {reason}"),
        }
    }

    fn with_stage(mut shader: ReflectedShader, stage: ShaderStage) -> ReflectedShader {
        shader.stage = stage;
        for entry_point in &mut shader.entry_points {
            entry_point.stage = stage;
        }
        shader
    }

    #[test]
    fn plans_by_stage() {
        use Mirror::*;
        use PassthroughStage::*;

        assert_eq!(passthrough_plan(ShaderStage::Vertex), Some(&[][..]));
        assert_eq!(passthrough_plan(ShaderStage::Compute), Some(&[][..]));
        assert_eq!(
            passthrough_plan(ShaderStage::Fragment),
            Some(&[PassthroughPlan::new(Vertex, Inputs)][..])
        );
        assert_eq!(
            passthrough_plan(ShaderStage::Geometry),
            Some(&[PassthroughPlan::new(Vertex, Inputs)][..])
        );
        assert_eq!(
            passthrough_plan(ShaderStage::TessellationControl),
            Some(
                &[
                    PassthroughPlan::new(Vertex, Inputs),
                    PassthroughPlan::new(TessellationEvaluation, Outputs)
                ][..]
            )
        );
        assert_eq!(
            passthrough_plan(ShaderStage::TessellationEvaluation),
            Some(
                &[
                    PassthroughPlan::new(Vertex, Nothing),
                    PassthroughPlan::new(TessellationControl, Inputs)
                ][..]
            )
        );
        assert_eq!(passthrough_plan(ShaderStage::Other), None);
    }

    #[test]
    fn fragment_shader_gets_a_vertex_stage() {
        let shader = load_fixture(include_str!("../shaders/reflected/fragment_lights.json"));
        let exhaustive = generated(&shader);

        assert_eq!(
            exhaustive.pipeline_stages(),
            vec![ShaderStage::Vertex, ShaderStage::Fragment]
        );

        let vertex = &exhaustive.generated[0];
        assert_eq!(vertex.stage, ShaderStage::Vertex);
        insta::assert_snapshot!(&vertex.source, @r"
        #version 450

        struct Falloff {
            float range;
            float strength;
        };

        struct Light {
            vec4 color;
            Falloff falloff;
            float weights[4];
        };

        layout(location = 0) out vec2 io_0;
        layout(location = 1) out Light io_1;

        void main() {
            gl_Position = vec4(1.0);
        }
        ");
    }

    #[test]
    fn fragment_pipeline_layout() {
        let shader = load_fixture(include_str!("../shaders/reflected/fragment_lights.json"));
        let exhaustive = generated(&shader);
        let layout = exhaustive.pipeline_layout();

        assert_eq!(layout.descriptor_set_layouts.len(), 3);
        assert_eq!(layout.descriptor_set_layouts[0].bindings.len(), 1);
        assert!(layout.descriptor_set_layouts[1].bindings.is_empty());

        let textures = &layout.descriptor_set_layouts[2].bindings[0];
        assert_eq!(textures.binding, 1);
        assert_eq!(textures.descriptor_count, 4);

        assert_eq!(layout.push_constant_ranges.len(), 1);
        assert_eq!(layout.push_constant_ranges[0].size, 16);
    }

    #[test]
    fn tessellation_control_gets_vertex_and_evaluation_stages() {
        let shader = load_fixture(include_str!("../shaders/reflected/tess_control_gap.json"));
        let exhaustive = generated(&shader);

        let stages: Vec<ShaderStage> = exhaustive.generated.iter().map(|g| g.stage).collect();
        assert_eq!(
            stages,
            vec![ShaderStage::Vertex, ShaderStage::TessellationEvaluation]
        );

        insta::assert_snapshot!(&exhaustive.generated[0].source, @r"
        #version 450

        layout(location = 0) out vec4 io_0;

        void main() {
            gl_Position = vec4(1.0);
        }
        ");
    }

    #[test]
    fn tessellation_evaluation_vertex_stage_is_empty() {
        let shader = with_stage(
            load_fixture(include_str!("../shaders/reflected/tess_control_gap.json")),
            ShaderStage::TessellationEvaluation,
        );
        let exhaustive = generated(&shader);

        let vertex = &exhaustive.generated[0];
        assert_eq!(vertex.stage, ShaderStage::Vertex);
        assert!(!vertex.source.contains("layout(location"));

        let control = &exhaustive.generated[1];
        assert_eq!(control.stage, ShaderStage::TessellationControl);
        assert!(control.source.contains("layout(location = 0) out vec4 io_0[];"));
    }

    #[test]
    fn vertex_and_compute_generate_nothing() {
        let fixture = load_fixture(include_str!("../shaders/reflected/fragment_lights.json"));

        for stage in [ShaderStage::Vertex, ShaderStage::Compute] {
            let exhaustive = generated(&with_stage(fixture.clone(), stage));
            assert!(exhaustive.generated.is_empty());
            assert_eq!(exhaustive.pipeline_stages(), vec![stage]);
        }
    }

    #[test]
    fn unknown_stage_is_skipped() {
        let shader = with_stage(
            load_fixture(include_str!("../shaders/reflected/fragment_lights.json")),
            ShaderStage::Other,
        );

        assert!(matches!(
            ExhaustiveShader::from_reflection(&shader).unwrap(),
            Outcome::Skipped(UnsupportedShader::Stage(ShaderStage::Other))
        ));
    }

    #[test]
    fn missing_entry_point_is_skipped() {
        let mut shader = load_fixture(include_str!("../shaders/reflected/fragment_lights.json"));
        shader.entry_points.clear();

        assert!(matches!(
            ExhaustiveShader::from_reflection(&shader).unwrap(),
            Outcome::Skipped(UnsupportedShader::NoEntryPoint)
        ));
    }

    #[test]
    fn unsupported_input_type_is_an_error() {
        let mut shader = load_fixture(include_str!("../shaders/reflected/fragment_lights.json"));
        let light = shader
            .input_variables
            .iter_mut()
            .find(|variable| variable.name == "light")
            .unwrap();
        light.type_description.as_mut().unwrap().type_name = None;

        let err = ExhaustiveShader::from_reflection(&shader).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(TypeKind::Struct)));
    }

    #[test]
    fn reflection_json_lists_pipeline_stages() {
        let shader = load_fixture(include_str!("../shaders/reflected/tess_control_gap.json"));
        let json = generated(&shader).reflection_json();

        assert_eq!(json.entry_point, "main");
        assert_eq!(
            json.pipeline_stages,
            vec![
                ShaderStage::Vertex,
                ShaderStage::TessellationControl,
                ShaderStage::TessellationEvaluation
            ]
        );
    }
}
