use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::ScriptConverter;

/// Longest-match-first phrase and character substitution table loaded from a
/// user-supplied file, for conversions or overrides zhconv does not cover.
#[derive(Debug, Clone)]
pub struct TableConverter {
    entries: HashMap<Vec<char>, String>,
    longest_key: usize,
}

impl TableConverter {
    /// Parses `<source>\t<target>` lines; blank lines and `#` comments are skipped.
    pub fn from_table(data: &str) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut longest_key = 0;

        for (idx, line) in data.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((source, target)) = trimmed.split_once('\t') else {
                bail!("conversion table line {} has no tab separator: {trimmed}", idx + 1);
            };
            let (source, target) = (source.trim(), target.trim());
            if source.is_empty() || target.is_empty() {
                bail!("conversion table line {} has an empty column", idx + 1);
            }
            let key: Vec<char> = source.chars().collect();
            longest_key = longest_key.max(key.len());
            entries.insert(key, target.to_string());
        }

        if entries.is_empty() {
            bail!("conversion table contained no entries");
        }

        Ok(Self {
            entries,
            longest_key,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read conversion table {:?}", path))?;
        Self::from_table(&data).with_context(|| format!("invalid conversion table {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn longest_match(&self, rest: &[char]) -> Option<(usize, &str)> {
        let max = self.longest_key.min(rest.len());
        (1..=max).rev().find_map(|len| {
            self.entries
                .get(&rest[..len])
                .map(|target| (len, target.as_str()))
        })
    }
}

impl ScriptConverter for TableConverter {
    fn convert(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut output = String::with_capacity(text.len());
        let mut pos = 0;
        while pos < chars.len() {
            match self.longest_match(&chars[pos..]) {
                Some((len, target)) => {
                    output.push_str(target);
                    pos += len;
                }
                None => {
                    output.push(chars[pos]);
                    pos += 1;
                }
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
# custom overrides
头发\t頭髮
发\t發
钟\t鍾
们\t們
";

    #[test]
    fn phrases_win_over_characters() {
        let converter = TableConverter::from_table(TABLE).unwrap();
        assert_eq!(converter.len(), 4);
        assert_eq!(converter.convert("头发"), "頭髮");
        assert_eq!(converter.convert("发现"), "發現");
        assert_eq!(converter.convert("钟小明"), "鍾小明");
    }

    #[test]
    fn unknown_characters_pass_through() {
        let converter = TableConverter::from_table("们\t們\n").unwrap();
        assert_eq!(converter.convert("我们 ok!"), "我們 ok!");
    }

    #[test]
    fn rejects_line_without_separator() {
        let err = TableConverter::from_table("们 們\n").unwrap_err();
        assert!(err.to_string().contains("no tab separator"));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(TableConverter::from_table("# only comments\n\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        std::fs::write(&path, TABLE).unwrap();
        let converter = TableConverter::from_path(&path).unwrap();
        assert_eq!(converter.convert("们"), "們");
    }
}
