use std::path::Path;

/// Validate the input file exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if path.trim().is_empty() || !path_obj.exists() {
        return Err(format!("Please select a valid TBX file: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate the output target: its folder must exist and it must not be the input itself
pub fn validate_output_path(input: &Path, output: &Path) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(format!(
                "Output directory does not exist: {}",
                parent.display()
            ));
        }
    }

    let same_file = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same_file {
        return Err(format!(
            "Refusing to overwrite the input file: {}",
            input.display()
        ));
    }

    Ok(())
}
