use spirv_reflect::types::*;

use crate::shaders::json::*;
use crate::shaders::{Error, Result};

pub fn reflect_descriptor_binding(
    binding: &ReflectDescriptorBinding,
) -> Result<ReflectedDescriptorBinding> {
    let descriptor_type = descriptor_type(binding.descriptor_type).ok_or_else(|| {
        Error::Reflection(format!(
            "descriptor {} at set {} binding {} has no descriptor type",
            binding.name, binding.set, binding.binding
        ))
    })?;

    let input_attachment_index = (descriptor_type == ReflectedDescriptorType::InputAttachment)
        .then_some(binding.input_attachment_index);

    Ok(ReflectedDescriptorBinding {
        name: binding.name.clone(),
        set: binding.set,
        binding: binding.binding,
        descriptor_type,
        array_dims: binding.array.dims.clone(),
        input_attachment_index,
    })
}

pub fn reflect_push_constant_block(block: &ReflectBlockVariable) -> ReflectedPushConstantBlock {
    ReflectedPushConstantBlock {
        name: block.name.clone(),
        offset: block.offset,
        size: block.size,
    }
}

fn descriptor_type(descriptor_type: ReflectDescriptorType) -> Option<ReflectedDescriptorType> {
    use ReflectDescriptorType as Reflect;
    use ReflectedDescriptorType as Reflected;

    let reflected = match descriptor_type {
        Reflect::Undefined => return None,
        Reflect::Sampler => Reflected::Sampler,
        Reflect::CombinedImageSampler => Reflected::CombinedImageSampler,
        Reflect::SampledImage => Reflected::SampledImage,
        Reflect::StorageImage => Reflected::StorageImage,
        Reflect::UniformTexelBuffer => Reflected::UniformTexelBuffer,
        Reflect::StorageTexelBuffer => Reflected::StorageTexelBuffer,
        Reflect::UniformBuffer => Reflected::UniformBuffer,
        Reflect::StorageBuffer => Reflected::StorageBuffer,
        Reflect::UniformBufferDynamic => Reflected::UniformBufferDynamic,
        Reflect::StorageBufferDynamic => Reflected::StorageBufferDynamic,
        Reflect::InputAttachment => Reflected::InputAttachment,
        Reflect::AccelerationStructureNV => Reflected::AccelerationStructure,
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    Some(reflected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_types() {
        assert_eq!(
            descriptor_type(ReflectDescriptorType::InputAttachment),
            Some(ReflectedDescriptorType::InputAttachment)
        );
        assert_eq!(
            descriptor_type(ReflectDescriptorType::AccelerationStructureNV),
            Some(ReflectedDescriptorType::AccelerationStructure)
        );
        assert_eq!(descriptor_type(ReflectDescriptorType::Undefined), None);
    }
}
