use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CxxBlocksError {
    CurrentDir(std::io::Error),
    ReadFile { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf },
    UnknownFunction { name: String },
}

impl fmt::Display for CxxBlocksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CxxBlocksError::CurrentDir(err) => {
                write!(f, "cannot read current directory: {err}")
            }
            CxxBlocksError::ReadFile { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            CxxBlocksError::Parse { path } => write!(f, "cannot parse {}", path.display()),
            CxxBlocksError::UnknownFunction { name } => {
                write!(f, "no function block named `{name}`")
            }
        }
    }
}

impl std::error::Error for CxxBlocksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CxxBlocksError::CurrentDir(err) => Some(err),
            CxxBlocksError::ReadFile { source, .. } => Some(source),
            CxxBlocksError::Parse { .. } | CxxBlocksError::UnknownFunction { .. } => None,
        }
    }
}
