use crate::error::OppmError;

/// Archive formats the installer can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }

    pub fn infer_from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            return Some(Self::TarGz);
        }
        if lower.ends_with(".zip") {
            return Some(Self::Zip);
        }
        if lower.ends_with(".tar") {
            return Some(Self::Tar);
        }
        None
    }
}

/// What a file input materializes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Executable,
    Archive(ArchiveType),
}

pub const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd"];

const SINGLE_SUFFIX_ARCHIVES: &[&str] = &["zip", "tar", "tgz"];
const DOUBLE_SUFFIX_ARCHIVES: &[&str] = &["tar.gz"];

pub fn supported_extensions() -> String {
    EXECUTABLE_EXTENSIONS
        .iter()
        .chain(SINGLE_SUFFIX_ARCHIVES)
        .chain(DOUBLE_SUFFIX_ARCHIVES)
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Derives the application name from a file name and classifies the file.
///
/// Recognized executables and single-suffix archives lose one suffix,
/// compressed tarballs lose two; anything else is `UnsupportedInputType`.
pub fn classify_file_name(file_name: &str) -> Result<(String, FileKind), OppmError> {
    let lower = file_name.to_ascii_lowercase();
    for suffix in DOUBLE_SUFFIX_ARCHIVES {
        let dotted = format!(".{suffix}");
        if lower.ends_with(&dotted) && lower.len() > dotted.len() {
            let stem = &file_name[..file_name.len() - dotted.len()];
            return Ok((stem.to_string(), FileKind::Archive(ArchiveType::TarGz)));
        }
    }

    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return Err(OppmError::UnsupportedInputType {
            extension: file_name.to_string(),
            supported: supported_extensions(),
        });
    };
    let extension_lower = extension.to_ascii_lowercase();
    if !stem.is_empty() && EXECUTABLE_EXTENSIONS.contains(&extension_lower.as_str()) {
        return Ok((stem.to_string(), FileKind::Executable));
    }
    if !stem.is_empty() && SINGLE_SUFFIX_ARCHIVES.contains(&extension_lower.as_str()) {
        let kind = match extension_lower.as_str() {
            "zip" => ArchiveType::Zip,
            "tar" => ArchiveType::Tar,
            _ => ArchiveType::TarGz,
        };
        return Ok((stem.to_string(), FileKind::Archive(kind)));
    }

    Err(OppmError::UnsupportedInputType {
        extension: format!(".{extension}"),
        supported: supported_extensions(),
    })
}
