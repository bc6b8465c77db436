use std::path::{Path, PathBuf};

pub fn manifest_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> PathBuf {
    let segments = segments.into_iter();
    let full_path = [env!("CARGO_MANIFEST_DIR")].into_iter().chain(segments);
    full_path.collect()
}

/// the file name up to its first extension, ie 'lights' for 'shaders/lights.frag.spv'
pub fn shader_name(path: &str) -> &str {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|os_str| os_str.to_str())
        .unwrap_or(path);

    file_name.split('.').next().unwrap_or(file_name)
}

/// the directory generated files go to when none is given: 'passthrough' next to the shader
pub fn default_output_dir(shader_path: &Path) -> PathBuf {
    shader_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("passthrough")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_names() {
        assert_eq!(shader_name("lights.frag.spv"), "lights");
        assert_eq!(shader_name("shaders/compiled/gap.tesc.spv"), "gap");
        assert_eq!(shader_name("plain"), "plain");
    }

    #[test]
    fn output_dir_is_next_to_shader() {
        assert_eq!(
            default_output_dir(Path::new("shaders/compiled/gap.tesc.spv")),
            PathBuf::from("shaders/compiled/passthrough")
        );
        assert_eq!(
            default_output_dir(Path::new("gap.tesc.spv")),
            PathBuf::from("passthrough")
        );
    }
}
