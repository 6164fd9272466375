use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Edit distance between `a` and `b`, only tracked inside a diagonal band of
/// width `max_dist`. Anything farther apart comes back as `max_dist + 1`.
fn bounded_levenshtein(a: &[char], b: &[char], max_dist: usize) -> usize {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let cap = max_dist + 1;
    if long.len() - short.len() > max_dist {
        return cap;
    }

    let mut row: Vec<usize> = (0..=long.len()).collect();
    for (i, &sc) in short.iter().enumerate() {
        let lo = (i + 1).saturating_sub(max_dist).max(1);
        let hi = (i + 1 + max_dist).min(long.len());
        let mut diag = row[0];
        row[0] = i + 1;

        for j in 1..=long.len() {
            let above = row[j];
            row[j] = if (lo..=hi).contains(&j) {
                let sub = diag + usize::from(sc != long[j - 1]);
                sub.min(above + 1).min(row[j - 1] + 1)
            } else {
                cap
            };
            diag = above;
        }
    }
    row[long.len()].min(cap)
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    bounded_levenshtein(a, b, a.len().max(b.len()))
}

/// Every string obtained from `word` by removing up to `max_del` characters,
/// plus `word` itself when `include_word` is set.
fn deletion_variants(word: &str, max_del: usize, include_word: bool) -> HashSet<String> {
    let mut variants = HashSet::new();
    let mut layer = vec![word.to_owned()];

    for _ in 0..max_del {
        let mut next = Vec::new();
        for variant in &layer {
            for (idx, ch) in variant.char_indices() {
                let mut shorter = String::with_capacity(variant.len());
                shorter.push_str(&variant[..idx]);
                shorter.push_str(&variant[idx + ch.len_utf8()..]);
                if variants.insert(shorter.clone()) {
                    next.push(shorter);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        layer = next;
    }

    if include_word {
        variants.insert(word.to_owned());
    }
    variants
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub distance: usize,
}

fn rank(suggestions: &mut [Suggestion]) {
    suggestions.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| b.word.chars().count().cmp(&a.word.chars().count()))
            .then_with(|| a.word.cmp(&b.word))
    });
}

/// Word list plus a deletion index for fast near-miss lookup.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
    deletions: HashMap<String, Vec<String>>, // deletion edits -> dictionary words
    max_edit_distance: usize,                // reach of the deletion index
}

impl Dictionary {
    pub fn new(words: HashSet<String>, max_edit_distance: usize) -> Self {
        let mut dictionary = Dictionary {
            words: HashSet::with_capacity(words.len()),
            deletions: HashMap::new(),
            max_edit_distance,
        };
        for word in words {
            dictionary.add_word(&word);
        }
        dictionary
    }

    /// Build a dictionary from newline-separated words. Entries are trimmed and
    /// lowercased; blank lines are skipped.
    pub fn from_word_list(content: &str, max_edit_distance: usize) -> Self {
        let words: HashSet<String> = content
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self::new(words, max_edit_distance)
    }

    pub fn from_word_list_file(path: impl AsRef<Path>, max_edit_distance: usize) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_word_list(&content, max_edit_distance))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn add_word(&mut self, word: &str) {
        let word = word.trim().to_lowercase();
        if word.is_empty() || !self.words.insert(word.clone()) {
            return;
        }
        for del_word in deletion_variants(&word, self.max_edit_distance, true) {
            self.deletions.entry(del_word).or_default().push(word.clone());
        }
    }

    /// Up to `limit` dictionary words closest to `word`, closest first.
    ///
    /// Empty when `word` is empty, already spelled correctly, or the dictionary
    /// is empty. Words within the index reach are looked up directly; when that
    /// yields fewer than `limit`, the whole dictionary is ranked.
    pub fn suggest(&self, word: &str, limit: usize) -> Vec<Suggestion> {
        let word = word.trim().to_lowercase();
        if word.is_empty() || limit == 0 || self.words.is_empty() || self.words.contains(&word) {
            return Vec::new();
        }

        let query: Vec<char> = word.chars().collect();
        let mut candidates = HashSet::new();
        for del_word in deletion_variants(&word, self.max_edit_distance, true) {
            if let Some(words) = self.deletions.get(&del_word) {
                candidates.extend(words.iter().map(String::as_str));
            }
        }

        let mut suggestions: Vec<Suggestion> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let chars: Vec<char> = candidate.chars().collect();
                let distance = bounded_levenshtein(&query, &chars, self.max_edit_distance);
                (distance <= self.max_edit_distance).then(|| Suggestion {
                    word: candidate.to_string(),
                    distance,
                })
            })
            .collect();

        if suggestions.len() < limit {
            suggestions = self.rank_all(&query);
        }
        rank(&mut suggestions);
        suggestions.truncate(limit);
        suggestions
    }

    fn rank_all(&self, query: &[char]) -> Vec<Suggestion> {
        self.words
            .par_iter()
            .map(|candidate| {
                let chars: Vec<char> = candidate.chars().collect();
                Suggestion {
                    word: candidate.clone(),
                    distance: levenshtein(query, &chars),
                }
            })
            .collect()
    }

    /// Suggestions for many words at once, in input order.
    pub fn suggest_many(&self, words: &[String], limit: usize) -> Vec<Vec<Suggestion>> {
        words
            .par_iter()
            .map(|word| self.suggest(word, limit))
            .collect()
    }
}
