//! ファイル探索モジュール - ディレクトリ配下の PDF を再帰的に列挙

use crate::error::{Result, TranslatorError};
use std::fs;
use std::path::{Path, PathBuf};
use std::vec;
use tracing::warn;

/// 既定の対象拡張子
pub const PDF_EXTENSION: &str = "pdf";

/// 指定ディレクトリ配下の対象ファイルを列挙する
///
/// 相対パスで指定されたルートは作成時に絶対パスへ変換する。
/// 列挙は遅延評価で、[`FileDiscovery::files`] を呼ぶたびに最初から辿り直す。
/// 各ディレクトリ内はファイル名順に深さ優先で訪問するため、ツリーが変わらなければ
/// 毎回同じ順序になる。
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    root: PathBuf,
    extension: String,
}

impl FileDiscovery {
    /// PDF を対象に探索を作成
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_extension(root, PDF_EXTENSION)
    }

    /// 拡張子を指定して探索を作成（先頭の `.` は無視）
    pub fn with_extension(root: impl Into<PathBuf>, extension: &str) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(TranslatorError::NotFound(root));
        }
        // 列挙結果は常に絶対パス
        let root = std::path::absolute(&root).map_err(|e| TranslatorError::io(&root, e))?;
        Ok(Self {
            root,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 対象ファイルを列挙
    pub fn files(&self) -> DiscoveredFiles<'_> {
        DiscoveredFiles {
            extension: &self.extension,
            stack: vec![read_sorted(&self.root).into_iter()],
        }
    }

    /// 拡張子が一致するか（大文字小文字を区別しない）
    pub fn matches(&self, path: &Path) -> bool {
        has_extension(path, &self.extension)
    }
}

/// [`FileDiscovery::files`] が返すイテレータ
pub struct DiscoveredFiles<'a> {
    extension: &'a str,
    stack: Vec<vec::IntoIter<Entry>>,
}

impl Iterator for DiscoveredFiles<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let current = self.stack.last_mut()?;
            match current.next() {
                None => {
                    self.stack.pop();
                }
                Some(entry) if entry.is_dir => {
                    self.stack.push(read_sorted(&entry.path).into_iter());
                }
                Some(entry) => {
                    if has_extension(&entry.path, self.extension) {
                        return Some(entry.path);
                    }
                }
            }
        }
    }
}

struct Entry {
    path: PathBuf,
    is_dir: bool,
}

/// ディレクトリ直下をファイル名順で読む（シンボリックリンク先のディレクトリは辿らない）
fn read_sorted(dir: &Path) -> Vec<Entry> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            warn!("ディレクトリを読み込めません ({}): {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut entries: Vec<Entry> = read
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("エントリを読み込めません ({}): {}", dir.display(), e);
                None
            }
        })
        .map(|entry| Entry {
            is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
            path: entry.path(),
        })
        .collect();

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    entries
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"%PDF-1.4").unwrap();
    }

    fn names(discovery: &FileDiscovery) -> Vec<String> {
        discovery
            .files()
            .map(|p| {
                p.strip_prefix(discovery.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn finds_only_pdf_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "c.txt");

        let discovery = FileDiscovery::new(dir.path()).unwrap();
        assert_eq!(names(&discovery), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn extension_match_ignores_case() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "upper.PDF");
        touch(dir.path(), "mixed.Pdf");
        touch(dir.path(), "notes.pdf.bak");

        let discovery = FileDiscovery::new(dir.path()).unwrap();
        assert_eq!(names(&discovery), vec!["mixed.Pdf", "upper.PDF"]);
    }

    #[test]
    fn walks_subdirectories_in_name_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.pdf");
        touch(dir.path(), "a/z.pdf");
        touch(dir.path(), "a/deeper/y.pdf");
        touch(dir.path(), "c/x.pdf");

        let discovery = FileDiscovery::new(dir.path()).unwrap();
        assert_eq!(
            names(&discovery),
            vec!["a/deeper/y.pdf", "a/z.pdf", "b.pdf", "c/x.pdf"]
        );
    }

    #[test]
    fn re_enumeration_is_identical() {
        let dir = TempDir::new().unwrap();
        for name in ["3.pdf", "1.pdf", "sub/2.pdf"] {
            touch(dir.path(), name);
        }

        let discovery = FileDiscovery::new(dir.path()).unwrap();
        let first: Vec<_> = discovery.files().collect();
        let second: Vec<_> = discovery.files().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let discovery = FileDiscovery::new(dir.path()).unwrap();
        assert_eq!(discovery.files().count(), 0);
    }

    #[test]
    fn missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = FileDiscovery::new(&missing).unwrap_err();
        assert!(matches!(err, TranslatorError::NotFound(p) if p == missing));
    }

    #[test]
    fn relative_root_yields_absolute_paths() {
        let dir = tempfile::Builder::new().prefix("discovery").tempdir_in(".").unwrap();
        touch(dir.path(), "a.pdf");
        touch(dir.path(), "nested/b.pdf");
        let relative = PathBuf::from(dir.path().file_name().unwrap());
        assert!(relative.is_relative());

        let discovery = FileDiscovery::new(&relative).unwrap();
        assert!(discovery.root().is_absolute());
        let files: Vec<_> = discovery.files().collect();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.is_absolute()));
        assert!(files[0].ends_with(relative.join("a.pdf")));
    }

    #[test]
    fn custom_extension_strips_leading_dot() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.txt");
        touch(dir.path(), "b.pdf");

        let discovery = FileDiscovery::with_extension(dir.path(), ".TXT").unwrap();
        assert_eq!(names(&discovery), vec!["a.txt"]);
        assert!(discovery.matches(Path::new("x.txt")));
        assert!(!discovery.matches(Path::new("x.pdf")));
    }
}
