//! Reflected type descriptions to GLSL type names.
//!
//! Resolution happens in two steps: [`resolve`] turns a [`TypeDescription`]
//! into a [`ResolvedType`] (inferring array element types where the reflector
//! leaves them out), then [`ResolvedType::glsl_name`] spells it.

use super::json::{ReflectedFormat, ScalarKind, TypeDescription, TypeKind};
use super::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Bool,
    Int,
    Uint,
    Float,
    Double,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// a struct, spelled by its declared name
    Named(String),
    Scalar(Scalar),
    Vector { component: Scalar, count: u32 },
    Matrix { component: Scalar, columns: u32, rows: u32 },
}

/// the GLSL spelling of a reflected type
///
/// `format` only matters for arrays whose element has no numeric traits.
pub fn glsl_type_name(description: &TypeDescription, format: ReflectedFormat) -> Result<String> {
    Ok(resolve(description, format)?.glsl_name())
}

pub fn resolve(description: &TypeDescription, format: ReflectedFormat) -> Result<ResolvedType> {
    if let Some(name) = description.named() {
        return Ok(ResolvedType::Named(name.to_string()));
    }

    match description.kind {
        TypeKind::Bool => Ok(ResolvedType::Scalar(Scalar::Bool)),
        TypeKind::Int => Ok(ResolvedType::Scalar(int_scalar(description.scalar.signedness))),
        TypeKind::Float => Ok(ResolvedType::Scalar(float_scalar(description.scalar.width))),
        TypeKind::Vector => Ok(vector(description, format)),
        TypeKind::Matrix => Ok(matrix(description, format)),
        TypeKind::Array => resolve_array_element(description, format),
        kind => Err(Error::UnsupportedType(kind)),
    }
}

// The reflector describes an array with the numeric traits of its element
// but does not say which kind of element it is.
fn resolve_array_element(
    description: &TypeDescription,
    format: ReflectedFormat,
) -> Result<ResolvedType> {
    let traits = &description.matrix;
    if traits.column_count > 0 && traits.row_count > 0 {
        return Ok(matrix(description, format));
    }

    if description.vector.component_count > 0 {
        return Ok(vector(description, format));
    }

    format_scalar(format)
        .map(ResolvedType::Scalar)
        .ok_or(Error::UnknownArrayElement(format))
}

fn vector(description: &TypeDescription, format: ReflectedFormat) -> ResolvedType {
    ResolvedType::Vector {
        component: component_scalar(description, format),
        count: description.vector.component_count,
    }
}

fn matrix(description: &TypeDescription, format: ReflectedFormat) -> ResolvedType {
    // glsl only has float and double matrices
    let component = match component_scalar(description, format) {
        Scalar::Double => Scalar::Double,
        _ => Scalar::Float,
    };

    ResolvedType::Matrix {
        component,
        columns: description.matrix.column_count,
        rows: description.matrix.row_count,
    }
}

fn component_scalar(description: &TypeDescription, format: ReflectedFormat) -> Scalar {
    let scalar = &description.scalar;
    match scalar.component {
        Some(ScalarKind::Bool) => Scalar::Bool,
        Some(ScalarKind::Int) => int_scalar(scalar.signedness),
        Some(ScalarKind::Float) => float_scalar(scalar.width),
        None => format_scalar(format).unwrap_or(Scalar::Float),
    }
}

fn int_scalar(signedness: u32) -> Scalar {
    if signedness == 0 {
        Scalar::Uint
    } else {
        Scalar::Int
    }
}

fn float_scalar(width: u32) -> Scalar {
    if width == 64 {
        Scalar::Double
    } else {
        Scalar::Float
    }
}

/// the scalar family of an interface format, ignoring its component count
pub fn format_scalar(format: ReflectedFormat) -> Option<Scalar> {
    use ReflectedFormat::*;

    match format {
        R32_UINT | R32G32_UINT | R32G32B32_UINT | R32G32B32A32_UINT => Some(Scalar::Uint),
        R32_SINT | R32G32_SINT | R32G32B32_SINT | R32G32B32A32_SINT => Some(Scalar::Int),
        R32_SFLOAT | R32G32_SFLOAT | R32G32B32_SFLOAT | R32G32B32A32_SFLOAT => {
            Some(Scalar::Float)
        }
        R64_SFLOAT | R64G64_SFLOAT | R64G64B64_SFLOAT | R64G64B64A64_SFLOAT => {
            Some(Scalar::Double)
        }
        Undefined => None,
    }
}

/// the full type of an interface format, for variables reflected without a type description
pub fn format_type(format: ReflectedFormat) -> Option<ResolvedType> {
    use ReflectedFormat::*;

    let count = match format {
        Undefined => return None,
        R32_UINT | R32_SINT | R32_SFLOAT | R64_SFLOAT => 1,
        R32G32_UINT | R32G32_SINT | R32G32_SFLOAT | R64G64_SFLOAT => 2,
        R32G32B32_UINT | R32G32B32_SINT | R32G32B32_SFLOAT | R64G64B64_SFLOAT => 3,
        R32G32B32A32_UINT | R32G32B32A32_SINT | R32G32B32A32_SFLOAT | R64G64B64A64_SFLOAT => 4,
    };

    let component = format_scalar(format)?;
    if count == 1 {
        Some(ResolvedType::Scalar(component))
    } else {
        Some(ResolvedType::Vector { component, count })
    }
}

impl Scalar {
    pub fn glsl_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    fn vector_prefix(self) -> &'static str {
        match self {
            Self::Bool => "bvec",
            Self::Int => "ivec",
            Self::Uint => "uvec",
            Self::Float => "vec",
            Self::Double => "dvec",
        }
    }
}

impl ResolvedType {
    pub fn glsl_name(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Scalar(scalar) => scalar.glsl_name().to_string(),
            Self::Vector { component, count } => format!("{}{count}", component.vector_prefix()),
            Self::Matrix {
                component,
                columns,
                rows,
            } => {
                let prefix = match component {
                    Scalar::Double => "dmat",
                    _ => "mat",
                };

                if columns == rows {
                    format!("{prefix}{columns}")
                } else {
                    format!("{prefix}{columns}x{rows}")
                }
            }
        }
    }
}
