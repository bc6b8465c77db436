use serde::{Deserialize, Serialize};

/// one shader input or output interface slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectedVariable {
    #[serde(default)]
    pub name: String,
    pub location: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub component: Option<u32>,
    /// the reflected BuiltIn decoration, if any
    /// aggregate built-ins like gl_PerVertex are not always tagged
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub built_in: Option<String>,
    #[serde(default)]
    pub format: ReflectedFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    /// set for structs, and for arrays of structs
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub type_name: Option<String>,
    /// set when this type is a member of a struct
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub struct_member_name: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub scalar: ScalarTraits,
    #[serde(default)]
    pub vector: VectorTraits,
    #[serde(default)]
    pub matrix: MatrixTraits,
    #[serde(default)]
    pub array: ArrayTraits,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub members: Vec<TypeDescription>,
}

impl TypeDescription {
    /// the struct name, ignoring the empty names some reflectors report
    pub fn named(&self) -> Option<&str> {
        self.type_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_array(&self) -> bool {
        self.kind == TypeKind::Array || !self.array.dims.is_empty()
    }
}

/// the outermost structural kind of a reflected type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    Vector,
    Matrix,
    Array,
    Struct,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTraits {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub component: Option<ScalarKind>,
    #[serde(default)]
    pub width: u32,
    /// zero means unsigned
    #[serde(default)]
    pub signedness: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorTraits {
    pub component_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixTraits {
    pub column_count: u32,
    pub row_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayTraits {
    #[serde(default)]
    pub dims: Vec<u32>,
}

/// the vertex-interface subset of vulkan formats that the reflector reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReflectedFormat {
    #[default]
    Undefined,
    R32_UINT,
    R32_SINT,
    R32_SFLOAT,
    R32G32_UINT,
    R32G32_SINT,
    R32G32_SFLOAT,
    R32G32B32_UINT,
    R32G32B32_SINT,
    R32G32B32_SFLOAT,
    R32G32B32A32_UINT,
    R32G32B32A32_SINT,
    R32G32B32A32_SFLOAT,
    R64_SFLOAT,
    R64G64_SFLOAT,
    R64G64B64_SFLOAT,
    R64G64B64A64_SFLOAT,
}

impl ReflectedFormat {
    pub fn to_vk(self) -> ash::vk::Format {
        use ash::vk::Format;

        match self {
            Self::Undefined => Format::UNDEFINED,
            Self::R32_UINT => Format::R32_UINT,
            Self::R32_SINT => Format::R32_SINT,
            Self::R32_SFLOAT => Format::R32_SFLOAT,
            Self::R32G32_UINT => Format::R32G32_UINT,
            Self::R32G32_SINT => Format::R32G32_SINT,
            Self::R32G32_SFLOAT => Format::R32G32_SFLOAT,
            Self::R32G32B32_UINT => Format::R32G32B32_UINT,
            Self::R32G32B32_SINT => Format::R32G32B32_SINT,
            Self::R32G32B32_SFLOAT => Format::R32G32B32_SFLOAT,
            Self::R32G32B32A32_UINT => Format::R32G32B32A32_UINT,
            Self::R32G32B32A32_SINT => Format::R32G32B32A32_SINT,
            Self::R32G32B32A32_SFLOAT => Format::R32G32B32A32_SFLOAT,
            Self::R64_SFLOAT => Format::R64_SFLOAT,
            Self::R64G64_SFLOAT => Format::R64G64_SFLOAT,
            Self::R64G64B64_SFLOAT => Format::R64G64B64_SFLOAT,
            Self::R64G64B64A64_SFLOAT => Format::R64G64B64A64_SFLOAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ash::vk;

    #[test]
    fn formats_to_vk() {
        assert_eq!(ReflectedFormat::Undefined.to_vk(), vk::Format::UNDEFINED);
        assert_eq!(ReflectedFormat::R32_UINT.to_vk(), vk::Format::R32_UINT);
        assert_eq!(
            ReflectedFormat::R32G32B32_SINT.to_vk(),
            vk::Format::R32G32B32_SINT
        );
        assert_eq!(
            ReflectedFormat::R32G32B32A32_SFLOAT.to_vk(),
            vk::Format::R32G32B32A32_SFLOAT
        );
        assert_eq!(
            ReflectedFormat::R64G64_SFLOAT.to_vk(),
            vk::Format::R64G64_SFLOAT
        );
    }
}
