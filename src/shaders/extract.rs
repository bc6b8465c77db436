use std::collections::{BTreeMap, BTreeSet};

use log::*;

use super::UnsupportedShader;
use super::json::*;

/// variables whose names start with this are glsl built-ins
pub const BUILT_IN_PREFIX: &str = "gl_";

/// the most descriptor sets a pipeline layout is built with
pub const MAX_DESCRIPTOR_SETS: u32 = 32;

#[derive(Debug)]
pub enum Extraction {
    Extracted(ShaderInterface),
    Unsupported(UnsupportedShader),
}

/// everything about a shader needed to build a pipeline around it
#[derive(Debug, Clone)]
pub struct ShaderInterface {
    pub stage: ShaderStage,
    pub entry_point: String,
    /// non-built-in inputs, ordered by location
    pub inputs: Vec<ReflectedVariable>,
    /// non-built-in outputs, ordered by location
    pub outputs: Vec<ReflectedVariable>,
    pub pipeline_layout: ReflectedPipelineLayout,
    pub input_attachment_indices: BTreeSet<u32>,
}

pub fn extract_interface(shader: &ReflectedShader) -> Extraction {
    let entry_point = match shader.entry_points.as_slice() {
        [entry_point] => entry_point,
        [] => return Extraction::Unsupported(UnsupportedShader::NoEntryPoint),
        many => {
            return Extraction::Unsupported(UnsupportedShader::MultipleEntryPoints(many.len()));
        }
    };

    if let Some(binding) = shader
        .descriptor_bindings
        .iter()
        .find(|binding| binding.set >= MAX_DESCRIPTOR_SETS)
    {
        return Extraction::Unsupported(UnsupportedShader::DescriptorSet(binding.set));
    }

    let stage = entry_point.stage;
    let requirements = descriptor_requirements(&shader.descriptor_bindings, stage);
    let input_attachment_indices = input_attachment_indices(&requirements);

    let pipeline_layout = ReflectedPipelineLayout {
        descriptor_set_layouts: descriptor_set_layouts(requirements),
        push_constant_ranges: push_constant_ranges(&shader.push_constant_blocks, stage),
    };

    Extraction::Extracted(ShaderInterface {
        stage,
        entry_point: entry_point.name.clone(),
        inputs: interface_variables(&shader.input_variables),
        outputs: interface_variables(&shader.output_variables),
        pipeline_layout,
        input_attachment_indices,
    })
}

/// a variable is built-in if the reflector tagged it as one,
/// or if it's named like one (aggregates like gl_PerVertex are not tagged)
pub fn is_built_in(variable: &ReflectedVariable) -> bool {
    variable.built_in.is_some() || variable.name.starts_with(BUILT_IN_PREFIX)
}

fn interface_variables(variables: &[ReflectedVariable]) -> Vec<ReflectedVariable> {
    let mut filtered: Vec<ReflectedVariable> = variables
        .iter()
        .filter(|variable| {
            let built_in = is_built_in(variable);
            if built_in {
                trace!("skipping built-in variable: {}", variable.name);
            }
            !built_in
        })
        .cloned()
        .collect();

    // stable, so variables sharing a location keep reflection order
    filtered.sort_by_key(|variable| variable.location);

    filtered
}

/// the number of descriptors for a binding with the given array dimensions
pub fn descriptor_count(array_dims: &[u32]) -> u32 {
    array_dims.iter().product()
}

fn descriptor_requirements(
    bindings: &[ReflectedDescriptorBinding],
    stage: ShaderStage,
) -> BTreeMap<(u32, u32), DescriptorRequirement> {
    let mut requirements: BTreeMap<(u32, u32), DescriptorRequirement> = BTreeMap::new();

    for binding in bindings {
        let requirement = DescriptorRequirement {
            set: binding.set,
            binding: binding.binding,
            descriptor_type: binding.descriptor_type,
            descriptor_count: descriptor_count(&binding.array_dims),
            stage_flags: ReflectedStageFlags::single(stage),
            input_attachment_index: binding.input_attachment_index,
        };

        match requirements.get_mut(&(binding.set, binding.binding)) {
            None => {
                requirements.insert((binding.set, binding.binding), requirement);
            }
            Some(existing) => {
                debug!(
                    "merging descriptor {} at set {} binding {}",
                    binding.name, binding.set, binding.binding
                );
                existing.stage_flags.insert_all(&requirement.stage_flags);
                existing.descriptor_count =
                    existing.descriptor_count.max(requirement.descriptor_count);
            }
        }
    }

    requirements
}

fn input_attachment_indices(
    requirements: &BTreeMap<(u32, u32), DescriptorRequirement>,
) -> BTreeSet<u32> {
    requirements
        .values()
        .filter(|r| r.descriptor_type == ReflectedDescriptorType::InputAttachment)
        .filter_map(|r| {
            let first = r.input_attachment_index?;
            Some(first..first.saturating_add(r.descriptor_count.max(1)))
        })
        .flatten()
        .collect()
}

// vulkan requires contiguous set indices, so unused sets get empty layouts;
// set indices are already below MAX_DESCRIPTOR_SETS
fn descriptor_set_layouts(
    requirements: BTreeMap<(u32, u32), DescriptorRequirement>,
) -> Vec<ReflectedDescriptorSetLayout> {
    let Some(&(max_set, _)) = requirements.keys().next_back() else {
        return vec![];
    };

    let mut layouts = vec![ReflectedDescriptorSetLayout::default(); max_set as usize + 1];
    for ((set, _), requirement) in requirements {
        layouts[set as usize].bindings.push(requirement);
    }

    layouts
}

fn push_constant_ranges(
    blocks: &[ReflectedPushConstantBlock],
    stage: ShaderStage,
) -> Vec<ReflectedPushConstantRange> {
    blocks
        .iter()
        .map(|block| ReflectedPushConstantRange {
            stage_flags: ReflectedStageFlags::single(stage),
            offset: block.offset,
            size: block.size,
        })
        .collect()
}
