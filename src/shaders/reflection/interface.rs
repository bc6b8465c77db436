use spirv_reflect::types::*;

use crate::shaders::json::*;

pub fn reflect_variable(variable: &ReflectInterfaceVariable) -> ReflectedVariable {
    let built_in = variable
        .decoration_flags
        .contains(ReflectDecorationFlags::BUILT_IN)
        .then(|| format!("{:?}", variable.built_in));

    ReflectedVariable {
        name: variable.name.clone(),
        location: variable.location,
        // not exposed by spirv-reflect
        component: None,
        built_in,
        format: reflect_format(variable.format),
        type_description: variable.type_description.as_ref().map(reflect_type),
    }
}

pub fn reflect_type(description: &ReflectTypeDescription) -> TypeDescription {
    let numeric = &description.traits.numeric;

    TypeDescription {
        type_name: non_empty(&description.type_name),
        struct_member_name: non_empty(&description.struct_member_name),
        kind: type_kind(description.type_flags),
        scalar: ScalarTraits {
            component: scalar_kind(description.type_flags),
            width: numeric.scalar.width,
            signedness: numeric.scalar.signedness,
        },
        vector: VectorTraits {
            component_count: numeric.vector.component_count,
        },
        matrix: MatrixTraits {
            column_count: numeric.matrix.column_count,
            row_count: numeric.matrix.row_count,
        },
        array: ArrayTraits {
            dims: description.traits.array.dims.clone(),
        },
        members: description.members.iter().map(reflect_type).collect(),
    }
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

/// the outermost kind; spirv-reflect sets the element's flags on arrays too
pub fn type_kind(flags: ReflectTypeFlags) -> TypeKind {
    if flags.contains(ReflectTypeFlags::ARRAY) {
        TypeKind::Array
    } else if flags.contains(ReflectTypeFlags::STRUCT) {
        TypeKind::Struct
    } else if flags.contains(ReflectTypeFlags::MATRIX) {
        TypeKind::Matrix
    } else if flags.contains(ReflectTypeFlags::VECTOR) {
        TypeKind::Vector
    } else if flags.contains(ReflectTypeFlags::FLOAT) {
        TypeKind::Float
    } else if flags.contains(ReflectTypeFlags::INT) {
        TypeKind::Int
    } else if flags.contains(ReflectTypeFlags::BOOL) {
        TypeKind::Bool
    } else {
        TypeKind::Other
    }
}

fn scalar_kind(flags: ReflectTypeFlags) -> Option<ScalarKind> {
    if flags.contains(ReflectTypeFlags::FLOAT) {
        Some(ScalarKind::Float)
    } else if flags.contains(ReflectTypeFlags::INT) {
        Some(ScalarKind::Int)
    } else if flags.contains(ReflectTypeFlags::BOOL) {
        Some(ScalarKind::Bool)
    } else {
        None
    }
}

pub fn reflect_format(format: ReflectFormat) -> ReflectedFormat {
    match format {
        ReflectFormat::R32_UINT => ReflectedFormat::R32_UINT,
        ReflectFormat::R32_SINT => ReflectedFormat::R32_SINT,
        ReflectFormat::R32_SFLOAT => ReflectedFormat::R32_SFLOAT,
        ReflectFormat::R32G32_UINT => ReflectedFormat::R32G32_UINT,
        ReflectFormat::R32G32_SINT => ReflectedFormat::R32G32_SINT,
        ReflectFormat::R32G32_SFLOAT => ReflectedFormat::R32G32_SFLOAT,
        ReflectFormat::R32G32B32_UINT => ReflectedFormat::R32G32B32_UINT,
        ReflectFormat::R32G32B32_SINT => ReflectedFormat::R32G32B32_SINT,
        ReflectFormat::R32G32B32_SFLOAT => ReflectedFormat::R32G32B32_SFLOAT,
        ReflectFormat::R32G32B32A32_UINT => ReflectedFormat::R32G32B32A32_UINT,
        ReflectFormat::R32G32B32A32_SINT => ReflectedFormat::R32G32B32A32_SINT,
        ReflectFormat::R32G32B32A32_SFLOAT => ReflectedFormat::R32G32B32A32_SFLOAT,
        #[allow(unreachable_patterns)]
        _ => ReflectedFormat::Undefined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_win_over_element_flags() {
        let flags = ReflectTypeFlags::ARRAY | ReflectTypeFlags::VECTOR | ReflectTypeFlags::FLOAT;
        assert_eq!(type_kind(flags), TypeKind::Array);
        assert_eq!(scalar_kind(flags), Some(ScalarKind::Float));
    }

    #[test]
    fn numeric_kinds() {
        let matrix = ReflectTypeFlags::MATRIX | ReflectTypeFlags::VECTOR | ReflectTypeFlags::FLOAT;
        assert_eq!(type_kind(matrix), TypeKind::Matrix);

        let vector = ReflectTypeFlags::VECTOR | ReflectTypeFlags::INT;
        assert_eq!(type_kind(vector), TypeKind::Vector);
        assert_eq!(scalar_kind(vector), Some(ScalarKind::Int));

        assert_eq!(type_kind(ReflectTypeFlags::INT), TypeKind::Int);
        assert_eq!(type_kind(ReflectTypeFlags::BOOL), TypeKind::Bool);
        assert_eq!(type_kind(ReflectTypeFlags::STRUCT), TypeKind::Struct);
        assert_eq!(type_kind(ReflectTypeFlags::UNDEFINED), TypeKind::Other);
    }

    #[test]
    fn formats() {
        assert_eq!(
            reflect_format(ReflectFormat::R32G32B32A32_SFLOAT),
            ReflectedFormat::R32G32B32A32_SFLOAT
        );
        assert_eq!(
            reflect_format(ReflectFormat::Undefined),
            ReflectedFormat::Undefined
        );
    }

    #[test]
    fn empty_names_are_dropped() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("Light"), Some("Light".to_string()));
    }
}
