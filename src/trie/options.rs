use serde::{Deserialize, Serialize};

/// Marks a word part that may be joined to other parts to form a compound.
pub const COMPOUND_FIX: char = '+';
/// Prefix of the branch holding case and accent insensitive word forms.
pub const CASE_INSENSITIVE_PREFIX: char = '~';
/// Prefix of the branch holding forbidden words.
pub const FORBID_PREFIX: char = '!';

/// Trie-wide settings consumed by the dictionary layer.
///
/// The trie itself never folds case or splits compounds; these characters only
/// tell callers where in the graph the special branches live.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrieOptions {
    /// Character that marks compoundable word parts.
    pub compound_character: char,
    /// Root branch under which normalized (lowercase, accent-free) forms are stored.
    pub strip_case_and_accents_prefix: char,
    /// Root branch under which forbidden words are stored.
    pub forbidden_word_prefix: char,
}

impl Default for TrieOptions {
    fn default() -> Self {
        TrieOptions {
            compound_character: COMPOUND_FIX,
            strip_case_and_accents_prefix: CASE_INSENSITIVE_PREFIX,
            forbidden_word_prefix: FORBID_PREFIX,
        }
    }
}

/// A subset of [`TrieOptions`]; unset fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialTrieOptions {
    /// Overrides [`TrieOptions::compound_character`].
    pub compound_character: Option<char>,
    /// Overrides [`TrieOptions::strip_case_and_accents_prefix`].
    pub strip_case_and_accents_prefix: Option<char>,
    /// Overrides [`TrieOptions::forbidden_word_prefix`].
    pub forbidden_word_prefix: Option<char>,
}

impl PartialTrieOptions {
    /// Fills the unset fields from `base`.
    pub fn merge_onto(&self, base: &TrieOptions) -> TrieOptions {
        TrieOptions {
            compound_character: self.compound_character.unwrap_or(base.compound_character),
            strip_case_and_accents_prefix: self
                .strip_case_and_accents_prefix
                .unwrap_or(base.strip_case_and_accents_prefix),
            forbidden_word_prefix: self
                .forbidden_word_prefix
                .unwrap_or(base.forbidden_word_prefix),
        }
    }
}

impl From<PartialTrieOptions> for TrieOptions {
    fn from(partial: PartialTrieOptions) -> Self {
        partial.merge_onto(&TrieOptions::default())
    }
}
