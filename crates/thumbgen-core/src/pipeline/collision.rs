//! Deterministic renaming of thumbnails that would overwrite an existing file.

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Picks non-colliding names inside one output directory.
///
/// The directory listing is captured once; every name handed out afterwards
/// is added to it, so later calls see what this traversal has written.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    entries: HashSet<String>,
    /// Last index used per (raw name, extension family)
    counters: HashMap<(String, String), u64>,
}

impl CollisionResolver {
    /// Build a resolver from an explicit listing.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            counters: HashMap::new(),
        }
    }

    /// Snapshot the entries of `dir`.
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(Self::new(names))
    }

    /// Whether `name` is already taken.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains(name)
    }

    /// Return `candidate` if it is free, otherwise `raw(index).ext`.
    ///
    /// The first index for a raw name is the number of numbered copies
    /// already present, so `{"a.png"}` gives `a(0).png`. Each further
    /// collision advances it by one. Indices already taken are stepped over.
    pub fn resolve(&mut self, candidate: &str) -> String {
        if !self.entries.contains(candidate) {
            self.entries.insert(candidate.to_string());
            return candidate.to_string();
        }

        let (raw, ext) = split_name(candidate);
        let key = (raw.to_string(), extension_family(ext));
        let mut index = match self.counters.get(&key) {
            Some(&last) => last + 1,
            None => self.count_copies(raw, &key.1).saturating_sub(1) as u64,
        };

        let mut name = numbered(raw, ext, index);
        while self.entries.contains(&name) {
            index += 1;
            name = numbered(raw, ext, index);
        }

        tracing::debug!("Renamed {} to {}", candidate, name);
        self.counters.insert(key, index);
        self.entries.insert(name.clone());
        name
    }

    /// Entries named `raw.ext` or `raw(<digits>).ext` within the same family.
    fn count_copies(&self, raw: &str, family: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| {
                let (entry_raw, entry_ext) = split_name(entry);
                extension_family(entry_ext) == family && is_copy_of(entry_raw, raw)
            })
            .count()
    }
}

/// Split at the last dot. A leading dot does not start an extension.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot + 1..]),
        _ => (name, ""),
    }
}

fn extension_family(ext: &str) -> String {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "jpe" => "jpeg".to_string(),
        other => other.to_string(),
    }
}

fn is_copy_of(entry_raw: &str, raw: &str) -> bool {
    if entry_raw == raw {
        return true;
    }
    entry_raw
        .strip_prefix(raw)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

fn numbered(raw: &str, ext: &str, index: u64) -> String {
    if ext.is_empty() {
        format!("{raw}({index})")
    } else {
        format!("{raw}({index}).{ext}")
    }
}
