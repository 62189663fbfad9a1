//! kli-reg - Directory and file registry.
//!
//! The registry is the pipeline's single index of everything on disk:
//! directories are deduplicated by absolute path, and each holds the
//! `.kl` files found inside it. Indices are stable monotonically
//! increasing handles; entries are never relocated or reordered. Every
//! file owns one slot carrying its pipeline products: the token stack
//! after lexing (behind an `Arc` so a parse task can read it off-thread)
//! and the AST after parsing. A non-empty stack means "lexing
//! completed"; a present AST means "parsing completed".

mod error;

pub use error::RegistryError;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs, io};

use kli_par::Node;
use kli_util::{DirectoryIndex, FileIndex, TokenStack};

/// Per-file slot.
struct FileEntry {
    /// File name without its extension; the class-lookup key.
    name: String,
    /// Full path, for opening and diagnostics.
    path: PathBuf,
    /// Owning directory.
    directory: DirectoryIndex,
    /// Lexing product; empty until the file has been lexed.
    stack: Arc<TokenStack>,
    /// Parsing product.
    ast: Option<Node>,
    /// Directories imported by this file, in declaration order.
    imports: Vec<DirectoryIndex>,
}

/// Per-directory slot.
struct DirectoryEntry {
    /// Absolute path; the dedup key.
    path: PathBuf,
    /// Files registered from this directory, in name order.
    files: Vec<FileIndex>,
}

/// Deduplicating index of directories and their `.kl` files.
#[derive(Default)]
pub struct Registry {
    files: Vec<FileEntry>,
    directories: Vec<DirectoryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directory and every `.kl` file inside it.
    ///
    /// `path` is absolute-normalized first; a path already registered
    /// (string-equal on the absolute form) returns its existing index.
    /// When `accept_file_path` is set and `path` names a file, its
    /// parent directory is used instead. Entries are sorted by file
    /// name so the allocated indices are deterministic.
    pub fn discover_directory(
        &mut self,
        path: &Path,
        accept_file_path: bool,
    ) -> Result<DirectoryIndex, RegistryError> {
        let mut dir_path = absolutize(path)
            .map_err(|source| RegistryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        if !dir_path.is_dir() {
            if !accept_file_path {
                return Err(RegistryError::NotADirectory(dir_path.display().to_string()));
            }
            dir_path = match dir_path.parent() {
                Some(parent) if parent.is_dir() => parent.to_path_buf(),
                _ => return Err(RegistryError::NotADirectory(dir_path.display().to_string())),
            };
        }

        if let Some(existing) = self
            .directories
            .iter()
            .position(|dir| dir.path == dir_path)
        {
            return Ok(existing as DirectoryIndex);
        }

        let dir_index = DirectoryIndex::try_from(self.directories.len())
            .map_err(|_| RegistryError::TooManyDirectories)?;

        let mut discovered: Vec<PathBuf> = Vec::new();
        let entries = fs::read_dir(&dir_path).map_err(|source| RegistryError::Io {
            path: dir_path.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Io {
                path: dir_path.display().to_string(),
                source,
            })?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && has_kl_extension(&entry.path()) {
                discovered.push(entry.path());
            }
        }
        discovered.sort();

        let mut files = Vec::with_capacity(discovered.len());
        for file_path in discovered {
            let file_index =
                FileIndex::try_from(self.files.len()).map_err(|_| RegistryError::TooManyFiles)?;
            let name = file_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.files.push(FileEntry {
                name,
                path: file_path,
                directory: dir_index,
                stack: Arc::new(TokenStack::new()),
                ast: None,
                imports: Vec::new(),
            });
            files.push(file_index);
        }
        self.directories.push(DirectoryEntry {
            path: dir_path,
            files,
        });
        Ok(dir_index)
    }

    /// Registers a file's parent directory and resolves the file inside
    /// it by name without extension.
    pub fn discover_file(&mut self, path: &Path) -> Result<FileIndex, RegistryError> {
        let directory = self.discover_directory(path, true)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.find_in_directory(directory, &name)
            .ok_or_else(|| RegistryError::NotFound(path.display().to_string()))
    }

    /// Linear name lookup within one directory.
    pub fn find_in_directory(&self, directory: DirectoryIndex, name: &str) -> Option<FileIndex> {
        self.directories[directory as usize]
            .files
            .iter()
            .copied()
            .find(|file| self.files[*file as usize].name == name)
    }

    /// File name without extension.
    pub fn file_name(&self, file: FileIndex) -> &str {
        &self.files[file as usize].name
    }

    /// Full file path.
    pub fn file_path(&self, file: FileIndex) -> &Path {
        &self.files[file as usize].path
    }

    /// Owning directory of a file.
    pub fn file_directory(&self, file: FileIndex) -> DirectoryIndex {
        self.files[file as usize].directory
    }

    /// The file's token stack. Empty until [`Registry::set_stack`].
    pub fn stack(&self, file: FileIndex) -> &Arc<TokenStack> {
        &self.files[file as usize].stack
    }

    /// Stores the lexing product for a file.
    pub fn set_stack(&mut self, file: FileIndex, stack: TokenStack) {
        self.files[file as usize].stack = Arc::new(stack);
    }

    /// The file's AST, present once parsed.
    pub fn ast(&self, file: FileIndex) -> Option<&Node> {
        self.files[file as usize].ast.as_ref()
    }

    /// Stores the parsing product for a file.
    pub fn set_ast(&mut self, file: FileIndex, ast: Node) {
        self.files[file as usize].ast = Some(ast);
    }

    /// Directories imported by a file, in declaration order.
    pub fn imports(&self, file: FileIndex) -> &[DirectoryIndex] {
        &self.files[file as usize].imports
    }

    /// Records an imported directory for a file.
    pub fn add_import(&mut self, file: FileIndex, directory: DirectoryIndex) {
        self.files[file as usize].imports.push(directory);
    }

    /// Absolute path of a directory.
    pub fn directory_path(&self, directory: DirectoryIndex) -> &Path {
        &self.directories[directory as usize].path
    }

    /// Files registered from a directory, in name order.
    pub fn directory_files(&self, directory: DirectoryIndex) -> &[FileIndex] {
        &self.directories[directory as usize].files
    }

    /// Number of registered files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Lexical absolute form: the current working directory joined with a
/// relative path. No symlink resolution, no existence requirement.
fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

/// A 3-character extension whose last two characters are `kl` in either
/// case.
fn has_kl_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.len() == 2 && ext.eq_ignore_ascii_case("kl"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kli_util::Token;
    use std::fs::File;
    use std::io::Write;

    fn touch(dir: &Path, name: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        writeln!(file, "{} {{}}", name.split('.').next().unwrap()).unwrap();
    }

    #[test]
    fn test_discover_filters_and_sorts_kl_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Beta.kl");
        touch(dir.path(), "Alpha.kl");
        touch(dir.path(), "Upper.KL");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "nokl.akl");
        std::fs::create_dir(dir.path().join("sub.kl")).unwrap();

        let mut registry = Registry::new();
        let index = registry.discover_directory(dir.path(), false).unwrap();
        let names: Vec<&str> = registry
            .directory_files(index)
            .iter()
            .map(|f| registry.file_name(*f))
            .collect();
        assert_eq!(names, ["Alpha", "Beta", "Upper"]);
    }

    #[test]
    fn test_rediscovery_returns_the_same_index() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "A.kl");

        let mut registry = Registry::new();
        let first = registry.discover_directory(dir.path(), false).unwrap();
        let second = registry.discover_directory(dir.path(), false).unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.file_count(), 1);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let mut registry = Registry::new();
        assert!(matches!(
            registry.discover_directory(&missing, false),
            Err(RegistryError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_discover_file_uses_the_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Root.kl");
        touch(dir.path(), "Other.kl");

        let mut registry = Registry::new();
        let file = registry.discover_file(&dir.path().join("Root.kl")).unwrap();
        assert_eq!(registry.file_name(file), "Root");
        assert_eq!(registry.file_directory(file), 0);
        assert_eq!(registry.file_count(), 2);
    }

    #[test]
    fn test_discover_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "A.kl");

        let mut registry = Registry::new();
        assert!(matches!(
            registry.discover_file(&dir.path().join("Missing.kl")),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_in_directory_is_name_based() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Widget.kl");

        let mut registry = Registry::new();
        let index = registry.discover_directory(dir.path(), false).unwrap();
        assert!(registry.find_in_directory(index, "Widget").is_some());
        assert!(registry.find_in_directory(index, "widget").is_none());
    }

    #[test]
    fn test_stack_and_ast_slots() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "A.kl");

        let mut registry = Registry::new();
        let file = registry.discover_file(&dir.path().join("A.kl")).unwrap();
        assert!(registry.stack(file).is_empty());
        assert!(registry.ast(file).is_none());

        let mut stack = TokenStack::new();
        stack.push(
            Token {
                file,
                line: 1,
                column: 1,
                length: 1,
            },
            b"A",
        );
        registry.set_stack(file, stack);
        assert!(!registry.stack(file).is_empty());
    }

    #[test]
    fn test_imports_are_recorded_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "A.kl");

        let mut registry = Registry::new();
        let file = registry.discover_file(&dir.path().join("A.kl")).unwrap();
        registry.add_import(file, 3);
        registry.add_import(file, 1);
        assert_eq!(registry.imports(file), &[3, 1]);
    }
}
