//! Minimal shaders for the stages around a tested shader.
//!
//! A generated stage exists only to complete pipeline linkage: it declares
//! the tested shader's interface variables at the same locations with the
//! same types, and its body writes the built-ins its stage requires.

use std::collections::{BTreeMap, HashSet};

use log::*;

use super::glsl_types::{format_type, glsl_type_name};
use super::json::*;
use super::{Error, Result};

mod source;
pub use source::*;

pub const GLSL_VERSION: &str = "#version 450";
pub const TESSELLATION_CONTROL_LAYOUT: &str = "layout(vertices = 3) out;";
pub const TESSELLATION_EVALUATION_LAYOUT: &str = "layout(triangles, equal_spacing, cw) in;";

/// the stages that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassthroughStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
}

impl PassthroughStage {
    pub fn stage(self) -> ShaderStage {
        match self {
            Self::Vertex => ShaderStage::Vertex,
            Self::TessellationControl => ShaderStage::TessellationControl,
            Self::TessellationEvaluation => ShaderStage::TessellationEvaluation,
        }
    }

    fn storage_qualifier(self) -> &'static str {
        match self {
            Self::Vertex | Self::TessellationControl => "out",
            Self::TessellationEvaluation => "in",
        }
    }

    fn stage_layout(self) -> Option<&'static str> {
        match self {
            Self::Vertex => None,
            Self::TessellationControl => Some(TESSELLATION_CONTROL_LAYOUT),
            Self::TessellationEvaluation => Some(TESSELLATION_EVALUATION_LAYOUT),
        }
    }

    // tessellation per-vertex variables are arrays sized by the patch
    fn per_vertex_arrays(self) -> bool {
        self != Self::Vertex
    }

    fn body(self) -> &'static [&'static str] {
        match self {
            Self::Vertex => &["gl_Position = vec4(1.0);"],
            Self::TessellationControl => &[
                "gl_TessLevelOuter[0] = 1.0;",
                "gl_TessLevelOuter[1] = 1.0;",
                "gl_TessLevelOuter[2] = 1.0;",
                "gl_TessLevelInner[0] = 1.0;",
                "gl_out[gl_InvocationID].gl_Position = gl_in[gl_InvocationID].gl_Position;",
            ],
            Self::TessellationEvaluation => &["gl_Position = gl_in[0].gl_Position;"],
        }
    }
}

/// vertex shader that writes each of the `consumer` shader's `inputs` as an output
pub fn vertex_passthrough(consumer: ShaderStage, inputs: &[ReflectedVariable]) -> Result<String> {
    generate(PassthroughStage::Vertex, consumer, inputs)
}

/// tessellation control shader that writes each of `inputs` as an output
pub fn tessellation_control_passthrough(inputs: &[ReflectedVariable]) -> Result<String> {
    generate(
        PassthroughStage::TessellationControl,
        ShaderStage::TessellationEvaluation,
        inputs,
    )
}

/// tessellation evaluation shader that reads each of `outputs` as an input
pub fn tessellation_evaluation_passthrough(outputs: &[ReflectedVariable]) -> Result<String> {
    generate(
        PassthroughStage::TessellationEvaluation,
        ShaderStage::TessellationControl,
        outputs,
    )
}

/// GLSL source for `target` mirroring `variables` of the `tested` shader,
/// which should already have built-ins filtered out
///
/// Fails without partial output if any variable's type can't be spelled.
pub fn generate(
    target: PassthroughStage,
    tested: ShaderStage,
    variables: &[ReflectedVariable],
) -> Result<String> {
    let mut source = SynthesizedSource::new();
    source.push_line(GLSL_VERSION);
    source.push_line("");

    // struct declarations must precede the stage layout and their first use
    let mut structs = StructDeclarations::new(source.mark());

    if let Some(layout) = target.stage_layout() {
        source.push_line(layout);
        source.push_line("");
    }

    let mut names = VariableNames::default();
    for variable in variables {
        let type_name = variable_type_name(variable, &mut structs, &mut source)?;
        let line = format!(
            "{} {} {type_name} {}{};",
            layout_qualifier(variable),
            target.storage_qualifier(),
            names.next(variable.location),
            variable_array_suffix(target, tested, variable),
        );
        source.push_line(line);
    }
    if !variables.is_empty() {
        source.push_line("");
    }

    source.push_line("void main() {");
    for line in target.body() {
        source.push_line(format!("    {line}"));
    }
    source.push_line("}");

    debug!(
        "generated {} pass-through with {} variables",
        target.stage(),
        variables.len()
    );

    Ok(source.finish())
}

fn variable_type_name(
    variable: &ReflectedVariable,
    structs: &mut StructDeclarations,
    source: &mut SynthesizedSource,
) -> Result<String> {
    let Some(description) = &variable.type_description else {
        return format_type(variable.format)
            .map(|resolved| resolved.glsl_name())
            .ok_or(Error::UnsupportedType(TypeKind::Other));
    };

    structs.declare(description, source)?;
    glsl_type_name(description, variable.format)
}

fn layout_qualifier(variable: &ReflectedVariable) -> String {
    match variable.component {
        Some(component) => format!(
            "layout(location = {}, component = {component})",
            variable.location
        ),
        None => format!("layout(location = {})", variable.location),
    }
}

// stages whose inputs carry an outer per-vertex array dimension
fn has_per_vertex_inputs(stage: ShaderStage) -> bool {
    matches!(
        stage,
        ShaderStage::Geometry
            | ShaderStage::TessellationControl
            | ShaderStage::TessellationEvaluation
    )
}

/// the bounds declared after a variable's name
///
/// The outer dimension of a per-vertex variable becomes `[]` in tessellation
/// stages and disappears from vertex outputs; all other dimensions keep their size.
fn variable_array_suffix(
    target: PassthroughStage,
    tested: ShaderStage,
    variable: &ReflectedVariable,
) -> String {
    let Some(description) = variable
        .type_description
        .as_ref()
        .filter(|description| description.is_array())
    else {
        return String::new();
    };

    let dims = description.array.dims.as_slice();
    let inner = dims.get(1..).unwrap_or_default();
    if target.per_vertex_arrays() {
        format!("[]{}", array_bounds(inner))
    } else if has_per_vertex_inputs(tested) {
        array_bounds(inner)
    } else {
        array_bounds(dims)
    }
}

/// `io_<location>`, then `io_<location>_<n>` for later variables sharing a location
#[derive(Debug, Default)]
struct VariableNames {
    seen: BTreeMap<u32, u32>,
}

impl VariableNames {
    fn next(&mut self, location: u32) -> String {
        let seen = self.seen.entry(location).or_insert(0);
        let name = match *seen {
            0 => format!("io_{location}"),
            n => format!("io_{location}_{n}"),
        };
        *seen += 1;

        name
    }
}

/// the struct types declared so far in one generated source
struct StructDeclarations {
    point: InsertionPoint,
    declared: HashSet<String>,
}

impl StructDeclarations {
    fn new(point: InsertionPoint) -> Self {
        Self {
            point,
            declared: HashSet::new(),
        }
    }

    /// declares the named struct `description`, after any structs it contains
    fn declare(
        &mut self,
        description: &TypeDescription,
        source: &mut SynthesizedSource,
    ) -> Result<()> {
        let Some(name) = description.named() else {
            return Ok(());
        };
        if !self.declared.insert(name.to_string()) {
            return Ok(());
        }

        let mut declaration = format!("struct {name} {{\n");
        for (index, member) in description.members.iter().enumerate() {
            self.declare(member, source)?;

            let member_name = member
                .struct_member_name
                .as_deref()
                .filter(|member_name| !member_name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("member_{index}"));
            let type_name = glsl_type_name(member, scalar_format(&member.scalar))?;

            declaration.push_str(&format!(
                "    {type_name} {member_name}{};\n",
                member_array_suffix(member)
            ));
        }
        declaration.push_str("};\n\n");

        trace!("declaring struct {name}");
        source.insert(self.point, declaration);

        Ok(())
    }
}

// struct members have scalar traits but no interface format
fn scalar_format(scalar: &ScalarTraits) -> ReflectedFormat {
    match scalar.component {
        Some(ScalarKind::Float) if scalar.width == 64 => ReflectedFormat::R64_SFLOAT,
        Some(ScalarKind::Float) => ReflectedFormat::R32_SFLOAT,
        Some(ScalarKind::Int) if scalar.signedness == 0 => ReflectedFormat::R32_UINT,
        Some(ScalarKind::Int) => ReflectedFormat::R32_SINT,
        Some(ScalarKind::Bool) | None => ReflectedFormat::Undefined,
    }
}

fn member_array_suffix(member: &TypeDescription) -> String {
    array_bounds(&member.array.dims)
}

fn array_bounds(dims: &[u32]) -> String {
    dims.iter()
        .map(|&dim| match dim {
            0 => "[]".to_string(),
            dim => format!("[{dim}]"),
        })
        .collect()
}
