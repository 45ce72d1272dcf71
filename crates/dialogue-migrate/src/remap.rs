//! Identity remapping for migrated nodes
//!
//! Legacy ids are free-form and may repeat. Each migration call builds a
//! fresh [`IdRemapper`] that mints `<type>_<sanitized><suffix>` ids and
//! remembers the first id minted for every legacy id, so edges can follow
//! their endpoints across the rename.
//!
//! The suffix is 32-bit FNV-1a over `(old id + occurrence, type)` folded
//! into four characters of `[a-z0-9]`. It exists for collision avoidance,
//! not secrecy.

use dialogue_model::NodeType;
use std::collections::{HashMap, HashSet};

const SUFFIX_ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 4;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Prefix used when a sanitized id would be empty or start with a digit
const LEADING_LETTER: char = 'n';

/// Per-call legacy → current id table
#[derive(Debug, Default)]
pub struct IdRemapper {
    /// First id minted for each legacy id, used for edge resolution
    first_occurrence: HashMap<String, String>,
    /// Occurrence counter per `(legacy id, type)`
    occurrences: HashMap<(String, NodeType), u32>,
    /// Every id minted so far
    issued: HashSet<String>,
}

impl IdRemapper {
    /// Create an empty remapper
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a legacy id
    ///
    /// With a node type this mints a new node id (see [`Self::map_node`]).
    /// Without one it resolves an edge endpoint (see [`Self::resolve`]),
    /// returning `None` when the reference is unresolved.
    pub fn map_id(&mut self, old_id: &str, node_type: Option<NodeType>) -> Option<String> {
        match node_type {
            Some(node_type) => Some(self.map_node(old_id, node_type)),
            None => self.resolve(old_id).map(str::to_owned),
        }
    }

    /// Mint a unique id for a legacy node
    ///
    /// Repeated `(old_id, node_type)` pairs advance an occurrence counter so
    /// duplicates never collide. Only the first mapping of `old_id` is kept
    /// for edge resolution.
    pub fn map_node(&mut self, old_id: &str, node_type: NodeType) -> String {
        let base = format!("{}_{}", node_type.as_str(), sanitize(old_id));
        let occurrence = self
            .occurrences
            .entry((old_id.to_owned(), node_type))
            .or_insert(0);

        let new_id = loop {
            let candidate = format!("{base}{}", suffix(old_id, *occurrence, node_type));
            *occurrence += 1;
            if !self.issued.contains(&candidate) {
                break candidate;
            }
        };

        self.issued.insert(new_id.clone());
        self.first_occurrence
            .entry(old_id.to_owned())
            .or_insert_with(|| new_id.clone());

        new_id
    }

    /// New id of the first node that carried `old_id`
    #[must_use]
    pub fn resolve(&self, old_id: &str) -> Option<&str> {
        self.first_occurrence.get(old_id).map(String::as_str)
    }

    /// Number of ids minted
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Whether no id has been minted yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// Strip non-alphanumerics; lead with a letter if empty or digit-first
#[must_use]
pub fn sanitize(old_id: &str) -> String {
    let mut cleaned: String = old_id.chars().filter(char::is_ascii_alphanumeric).collect();
    if cleaned.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        cleaned.insert(0, LEADING_LETTER);
    }
    cleaned
}

fn suffix(old_id: &str, occurrence: u32, node_type: NodeType) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    let bytes = old_id
        .bytes()
        .chain(occurrence.to_string().into_bytes())
        .chain(std::iter::once(0x1f))
        .chain(node_type.as_str().bytes());
    for byte in bytes {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    let radix = SUFFIX_ALPHABET.len() as u32;
    (0..SUFFIX_LEN)
        .map(|_| {
            let c = char::from(SUFFIX_ALPHABET[(hash % radix) as usize]);
            hash /= radix;
            c
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_and_prefixes() {
        assert_eq!(sanitize("node-1"), "node1");
        assert_eq!(sanitize("42"), "n42");
        assert_eq!(sanitize("!!!"), "n");
        assert_eq!(sanitize("héllo"), "hllo");
    }

    #[test]
    fn minted_id_has_type_prefix_and_suffix() {
        let mut remapper = IdRemapper::new();
        let id = remapper.map_node("greeting", NodeType::NpcDialog);
        assert!(id.starts_with("npcDialog_greeting"));
        assert_eq!(id.len(), "npcDialog_greeting".len() + SUFFIX_LEN);
        assert!(NodeType::NpcDialog.id_matches(&id));
    }

    #[test]
    fn minting_is_deterministic_across_remappers() {
        let mut a = IdRemapper::new();
        let mut b = IdRemapper::new();
        assert_eq!(
            a.map_node("x", NodeType::Branch),
            b.map_node("x", NodeType::Branch)
        );
    }

    #[test]
    fn duplicate_legacy_ids_get_distinct_ids() {
        let mut remapper = IdRemapper::new();
        let first = remapper.map_node("a", NodeType::NpcDialog);
        let second = remapper.map_node("a", NodeType::NpcDialog);
        assert_ne!(first, second);
        assert_eq!(remapper.resolve("a"), Some(first.as_str()));
        assert_eq!(remapper.len(), 2);
    }

    #[test]
    fn resolution_follows_first_occurrence_across_types() {
        let mut remapper = IdRemapper::new();
        let first = remapper.map_node("a", NodeType::PlayerResponse);
        let _ = remapper.map_node("a", NodeType::NpcDialog);
        assert_eq!(remapper.map_id("a", None), Some(first));
    }

    #[test]
    fn unresolved_reference_is_none() {
        let mut remapper = IdRemapper::new();
        assert!(remapper.is_empty());
        assert_eq!(remapper.map_id("ghost", None), None);
    }

    #[test]
    fn sanitization_collisions_stay_unique() {
        let mut remapper = IdRemapper::new();
        let ids: HashSet<String> = ["a-b", "ab", "a_b", "a.b", "ab", "a b"]
            .iter()
            .map(|old| remapper.map_node(old, NodeType::Dialog))
            .collect();
        assert_eq!(ids.len(), 6);
    }
}
