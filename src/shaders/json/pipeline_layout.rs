use std::collections::BTreeSet;

use ash::vk;
use serde::{Deserialize, Serialize};

use super::ShaderStage;

/// a descriptor binding as reported by the reflector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedDescriptorBinding {
    #[serde(default)]
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub descriptor_type: ReflectedDescriptorType,
    /// one entry per array dimension, empty for non-arrays
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub array_dims: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub input_attachment_index: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedPushConstantBlock {
    #[serde(default)]
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

/// reflected data for creating a vulkan PipelineLayout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectedPipelineLayout {
    pub descriptor_set_layouts: Vec<ReflectedDescriptorSetLayout>,
    pub push_constant_ranges: Vec<ReflectedPushConstantRange>,
}

/// reflected data for creating a vulkan DescriptorSetLayout
/// set indices are implied by position, so empty layouts fill unused sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectedDescriptorSetLayout {
    pub bindings: Vec<DescriptorRequirement>,
}

impl ReflectedDescriptorSetLayout {
    pub fn vk_bindings(&self) -> Vec<vk::DescriptorSetLayoutBinding<'static>> {
        self.bindings.iter().map(DescriptorRequirement::to_vk).collect()
    }
}

/// one vulkan DescriptorSetLayoutBinding worth of requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRequirement {
    pub set: u32,
    pub binding: u32,
    pub descriptor_type: ReflectedDescriptorType,
    /// the product of all array dimensions
    pub descriptor_count: u32,
    pub stage_flags: ReflectedStageFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub input_attachment_index: Option<u32>,
}

impl DescriptorRequirement {
    pub fn to_vk(&self) -> vk::DescriptorSetLayoutBinding<'static> {
        vk::DescriptorSetLayoutBinding::default()
            .stage_flags(self.stage_flags.to_vk())
            .binding(self.binding)
            .descriptor_count(self.descriptor_count)
            .descriptor_type(self.descriptor_type.to_vk())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectedPushConstantRange {
    pub stage_flags: ReflectedStageFlags,
    pub offset: u32,
    pub size: u32,
}

impl ReflectedPushConstantRange {
    pub fn to_vk(&self) -> vk::PushConstantRange {
        vk::PushConstantRange::default()
            .stage_flags(self.stage_flags.to_vk())
            .offset(self.offset)
            .size(self.size)
    }
}

// a spirv-reflect SpvReflectDescriptorType or vulkan DescriptorType
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReflectedDescriptorType {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
    InputAttachment,
    AccelerationStructure,
}

impl ReflectedDescriptorType {
    pub fn to_vk(self) -> vk::DescriptorType {
        match self {
            Self::Sampler => vk::DescriptorType::SAMPLER,
            Self::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            Self::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
            Self::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
            Self::UniformTexelBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
            Self::StorageTexelBuffer => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
            Self::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
            Self::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
            Self::UniformBufferDynamic => vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
            Self::StorageBufferDynamic => vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
            Self::InputAttachment => vk::DescriptorType::INPUT_ATTACHMENT,
            Self::AccelerationStructure => vk::DescriptorType::ACCELERATION_STRUCTURE_KHR,
        }
    }
}

/// a set of shader stages; serialized as a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReflectedStageFlags(pub BTreeSet<ShaderStage>);

impl ReflectedStageFlags {
    pub fn single(stage: ShaderStage) -> Self {
        Self(BTreeSet::from([stage]))
    }

    pub fn insert_all(&mut self, other: &Self) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn to_vk(&self) -> vk::ShaderStageFlags {
        self.0
            .iter()
            .fold(vk::ShaderStageFlags::empty(), |flags, stage| {
                flags | stage.to_vk()
            })
    }
}

impl ShaderStage {
    pub fn to_vk(self) -> vk::ShaderStageFlags {
        match self {
            Self::Vertex => vk::ShaderStageFlags::VERTEX,
            Self::TessellationControl => vk::ShaderStageFlags::TESSELLATION_CONTROL,
            Self::TessellationEvaluation => vk::ShaderStageFlags::TESSELLATION_EVALUATION,
            Self::Geometry => vk::ShaderStageFlags::GEOMETRY,
            Self::Fragment => vk::ShaderStageFlags::FRAGMENT,
            Self::Compute => vk::ShaderStageFlags::COMPUTE,
            Self::Other => vk::ShaderStageFlags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_constant_range_keeps_offset() {
        let range = ReflectedPushConstantRange {
            stage_flags: ReflectedStageFlags::single(ShaderStage::Fragment),
            offset: 16,
            size: 64,
        };

        let vk_range = range.to_vk();
        assert_eq!(vk_range.offset, 16);
        assert_eq!(vk_range.size, 64);
        assert_eq!(vk_range.stage_flags, vk::ShaderStageFlags::FRAGMENT);
    }

    #[test]
    fn stage_flags_combine() {
        let mut flags = ReflectedStageFlags::single(ShaderStage::Vertex);
        flags.insert_all(&ReflectedStageFlags::single(ShaderStage::Geometry));

        assert_eq!(
            flags.to_vk(),
            vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::GEOMETRY
        );
    }

    #[test]
    fn input_attachment_binding_to_vk() {
        let requirement = DescriptorRequirement {
            set: 0,
            binding: 3,
            descriptor_type: ReflectedDescriptorType::InputAttachment,
            descriptor_count: 2,
            stage_flags: ReflectedStageFlags::single(ShaderStage::Fragment),
            input_attachment_index: Some(1),
        };

        let binding = requirement.to_vk();
        assert_eq!(binding.binding, 3);
        assert_eq!(binding.descriptor_count, 2);
        assert_eq!(binding.descriptor_type, vk::DescriptorType::INPUT_ATTACHMENT);
    }

    #[test]
    fn set_layout_bindings_to_vk() {
        let mut stage_flags = ReflectedStageFlags::single(ShaderStage::Vertex);
        stage_flags.insert_all(&ReflectedStageFlags::single(ShaderStage::Fragment));

        let layout = ReflectedDescriptorSetLayout {
            bindings: vec![
                DescriptorRequirement {
                    set: 1,
                    binding: 0,
                    descriptor_type: ReflectedDescriptorType::UniformBuffer,
                    descriptor_count: 1,
                    stage_flags,
                    input_attachment_index: None,
                },
                DescriptorRequirement {
                    set: 1,
                    binding: 2,
                    descriptor_type: ReflectedDescriptorType::CombinedImageSampler,
                    descriptor_count: 4,
                    stage_flags: ReflectedStageFlags::single(ShaderStage::Fragment),
                    input_attachment_index: None,
                },
            ],
        };

        let bindings = layout.vk_bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].descriptor_type, vk::DescriptorType::UNIFORM_BUFFER);
        assert_eq!(
            bindings[0].stage_flags,
            vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT
        );
        assert_eq!((bindings[1].binding, bindings[1].descriptor_count), (2, 4));
        assert_eq!(
            bindings[1].descriptor_type,
            vk::DescriptorType::COMBINED_IMAGE_SAMPLER
        );

        assert!(ReflectedDescriptorSetLayout::default().vk_bindings().is_empty());
    }
}
