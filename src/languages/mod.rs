use std::path::Path;

pub(crate) mod cpp;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Cpp,
}

pub fn language_for_path(path: &Path) -> Option<Language> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    if cpp::EXTENSIONS.contains(&ext) {
        return Some(Language::Cpp);
    }
    None
}

pub(crate) fn tree_sitter_language(language: Language) -> tree_sitter::Language {
    match language {
        Language::Cpp => cpp::language(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Language, language_for_path};
    use std::path::PathBuf;

    #[test]
    fn recognizes_cpp_extension() {
        let lang = language_for_path(&PathBuf::from("file.cpp"));
        assert_eq!(lang, Some(Language::Cpp));
    }

    #[test]
    fn recognizes_cpp_cc_extension() {
        let lang = language_for_path(&PathBuf::from("example.cc"));
        assert_eq!(lang, Some(Language::Cpp));
    }

    #[test]
    fn recognizes_cpp_header_extension() {
        let lang = language_for_path(&PathBuf::from("file.hpp"));
        assert_eq!(lang, Some(Language::Cpp));
    }

    #[test]
    fn ignores_unknown_extensions() {
        assert_eq!(language_for_path(&PathBuf::from("file.txt")), None);
        assert_eq!(language_for_path(&PathBuf::from("Makefile")), None);
    }
}
