use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::corpus::Chapter;
use crate::errors::{CharnetError, Result};

/// Boxed stream of chapters, each independently fallible.
pub type ChapterIter = Box<dyn Iterator<Item = Result<Chapter>> + Send>;

/// A corpus reader for line-delimited JSON: `{"chapter": N, "text": "..."}`.
#[derive(Debug, Clone)]
pub struct JsonlCorpus {
    path: PathBuf,
}

impl JsonlCorpus {
    /// Create a new corpus reader for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Iterate over chapters. Blank lines are skipped; a malformed line is an
    /// error item and does not stop the iteration.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<Chapter>> + Send> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        Ok(reader
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|(n, line)| {
                let line = line?;
                serde_json::from_str::<Chapter>(&line)
                    .map_err(|e| CharnetError::Corpus(format!("line {}: {e}", n + 1)))
            }))
    }
}

/// A directory of `chNNN*.txt` files, read in chapter order.
#[derive(Debug, Clone)]
pub struct ChapterDirectory {
    dir: PathBuf,
}

impl ChapterDirectory {
    /// Create a reader for the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Chapter files found, sorted by chapter number then file name.
    pub fn files(&self) -> Result<Vec<(u32, PathBuf)>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(number) = chapter_number(name) {
                files.push((number, path));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Iterate over chapters; an unreadable file is an error item.
    pub fn iter(&self) -> Result<impl Iterator<Item = Result<Chapter>> + Send> {
        Ok(self.files()?.into_iter().map(|(number, path)| {
            std::fs::read_to_string(&path)
                .map(|text| Chapter::new(number, text))
                .map_err(|e| CharnetError::Chapter {
                    chapter: number,
                    reason: format!("{}: {e}", path.display()),
                })
        }))
    }
}

/// Chapter number of a file named `ch<digits>...txt`.
pub fn chapter_number(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".txt")?;
    let rest = stem.strip_prefix("ch")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Open a chapter directory, or a JSONL file otherwise.
pub fn open_chapters(path: impl AsRef<Path>) -> Result<ChapterIter> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(ChapterDirectory::new(path).iter()?))
    } else {
        Ok(Box::new(JsonlCorpus::new(path).iter()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_chapter_file_names() {
        assert_eq!(chapter_number("ch001.txt"), Some(1));
        assert_eq!(chapter_number("ch027_cleaned.txt"), Some(27));
        assert_eq!(chapter_number("ch12.md"), None);
        assert_eq!(chapter_number("notes.txt"), None);
        assert_eq!(chapter_number("ch_intro.txt"), None);
    }

    #[test]
    fn directory_reads_in_chapter_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ch010_cleaned.txt"), "ten").unwrap();
        std::fs::write(dir.path().join("ch002.txt"), "two").unwrap();
        std::fs::write(dir.path().join("readme.md"), "skip").unwrap();

        let chapters: Vec<_> = open_chapters(dir.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(chapters, vec![Chapter::new(2, "two"), Chapter::new(10, "ten")]);
    }

    #[test]
    fn jsonl_reports_bad_lines_and_continues() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"chapter": 1, "text": "寶玉來了"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"chapter": 3, "text": "黛玉"}}"#).unwrap();

        let items: Vec<_> = open_chapters(file.path()).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().number, 1);
        assert!(matches!(&items[1], Err(CharnetError::Corpus(msg)) if msg.starts_with("line 3")));
        assert_eq!(items[2].as_ref().unwrap().text, "黛玉");
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(open_chapters("/definitely/not/here.jsonl").is_err());
    }
}
