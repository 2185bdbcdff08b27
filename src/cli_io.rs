use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use cxxblocks::CxxBlocksError;

/// Reads every C++ source named by `paths`.
///
/// Files passed explicitly are read even when ignored; directories are
/// walked with gitignore rules applied. Unknown extensions and non-UTF-8
/// files are skipped.
pub fn gather_inputs<I>(paths: I) -> Result<Vec<(PathBuf, String)>, CxxBlocksError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let cwd = std::env::current_dir().map_err(CxxBlocksError::CurrentDir)?;
    let mut requested_files: Vec<PathBuf> = Vec::new();
    let mut requested_dirs: BTreeSet<PathBuf> = BTreeSet::new();
    for path in paths {
        if cwd.join(&path).is_dir() {
            requested_dirs.insert(path);
        } else if !requested_files.contains(&path) {
            requested_files.push(path);
        }
    }

    let mut inputs = Vec::new();
    for file in requested_files {
        if !cwd.join(&file).is_file() {
            continue;
        }
        if let Some(contents) = read_source(&cwd, &file)? {
            inputs.push((file, contents));
        }
    }

    let mut roots = requested_dirs.into_iter();
    if let Some(first) = roots.next() {
        let mut builder = WalkBuilder::new(cwd.join(&first));
        for root in roots {
            builder.add(cwd.join(root));
        }
        let mut walked = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry
                .file_type()
                .map(|file_type| file_type.is_file())
                .unwrap_or(false)
            {
                continue;
            }
            let path = entry.path();
            let display = path.strip_prefix(&cwd).unwrap_or(path).to_path_buf();
            if let Some(contents) = read_source(&cwd, &display)? {
                walked.push((display, contents));
            }
        }
        walked.sort_by(|a, b| a.0.cmp(&b.0));
        inputs.extend(walked);
    }

    Ok(inputs)
}

fn read_source(cwd: &Path, path: &Path) -> Result<Option<String>, CxxBlocksError> {
    if cxxblocks::language_for_path(path).is_none() {
        return Ok(None);
    }
    let bytes = std::fs::read(cwd.join(path)).map_err(|source| CxxBlocksError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8(bytes).ok())
}
