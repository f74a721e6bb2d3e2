use std::fmt;

/// Rejected upload input. The message is shown to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn no_file() -> Self {
        Self {
            code: "NO_FILE",
            message: "No file uploaded".to_string(),
        }
    }

    pub fn too_large(size_label: &str) -> Self {
        Self {
            code: "FILE_TOO_LARGE",
            message: format!("File exceeds {} limit", size_label),
        }
    }

    pub fn invalid_filename() -> Self {
        Self {
            code: "INVALID_FILENAME",
            message: "Invalid filename".to_string(),
        }
    }
}

/// Checks that the client-supplied filename is present and is a bare file name.
///
/// The name is otherwise kept verbatim: no renaming, no deduplication.
pub fn validate_filename(filename: &str) -> Result<(), ValidationError> {
    if filename.is_empty() {
        return Err(ValidationError::no_file());
    }

    if filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
    {
        tracing::warn!("Rejected filename with path components: {:?}", filename);
        return Err(ValidationError::invalid_filename());
    }

    Ok(())
}

/// Validates file size against maximum limit
pub fn validate_file_size(
    size: usize,
    max_size: usize,
    size_label: &str,
) -> Result<(), ValidationError> {
    if size > max_size {
        return Err(ValidationError::too_large(size_label));
    }
    Ok(())
}
