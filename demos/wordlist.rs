//! Example: a small spell-check wordlist that survives a trip through a file.
//!
//! Builds a consolidated trie, writes it in the V4 text format, reads it back
//! and answers lookups and completions from the decoded copy. Pass a path to
//! a word list (one word per line, `#` comments allowed) to use your own.
//!
//! Run with: cargo run --example wordlist [-- words.txt]

use std::fs::File;
use std::io::BufReader;

use dictrie::io::{decode, encode_to_string, ExportOptions};
use dictrie::{Result, Trie, TrieBuilder, TrieData, TrieOptions};

const SAMPLE: &[&str] = &[
    "BAKE", "BAKED", "BAKER", "BAKES", "CAKE", "CAKED", "FAKE", "LAKE", "!LAKES", "MAKE+",
];

fn load() -> Result<Trie> {
    let mut builder = TrieBuilder::new(TrieOptions::default());
    match std::env::args().nth(1) {
        Some(path) => {
            let added = builder.add_lines(BufReader::new(File::open(path)?))?;
            println!("Read {added} words");
        }
        None => {
            builder.add_words(SAMPLE.iter());
        }
    }
    Ok(Trie::new(builder.build(true)))
}

fn main() -> Result<()> {
    let trie = load()?;
    println!("Nodes after consolidation: {}", trie.root().count_nodes());

    let options = ExportOptions {
        comment: "Sample wordlist".to_string(),
        ..Default::default()
    };
    let text = encode_to_string(trie.root(), &options)?;
    println!("Encoded size: {} bytes\n", text.len());
    let trie = decode(&text)?;

    println!("Word lookup:");
    for word in ["BAKE", "BAKER", "BAKING", "CAKE", "LAKES", "MAKE"] {
        let verdict = if trie.is_forbidden_word(word) {
            "forbidden"
        } else if trie.has(word) {
            "yes"
        } else {
            "no"
        };
        println!("  {word}: {verdict}");
    }

    println!("\nCompletions:");
    for prefix in ["BA", "CAK", "MA"] {
        println!("  {prefix}*: {:?}", trie.complete_word(prefix).collect::<Vec<_>>());
    }

    println!("\nAll {} words: {:?}", trie.size(), trie.words().collect::<Vec<_>>());
    Ok(())
}
