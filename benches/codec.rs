//! Criterion benchmarks for building, consolidating, encoding and decoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dictrie::io::{decode, encode_to_string, ExportOptions};
use dictrie::{consolidate, TrieOptions, TrieRoot};

/// Deterministic word-shaped strings, about 14,000 of them.
fn word_list() -> Vec<String> {
    let onsets = ["b", "c", "d", "f", "g", "h", "l", "m", "p", "r", "st", "tr"];
    let vowels = ["a", "e", "i", "o", "u"];
    let codas = ["b", "ck", "d", "ff", "g", "ll", "m", "n", "p", "rt", "sh", "t"];
    let suffixes = ["", "s", "ed", "er", "ers", "ing", "ings", "able", "ness", "ly"];
    let mut words = Vec::new();
    for prefix in ["", "re"] {
        for onset in onsets {
            for vowel in vowels {
                for coda in codas {
                    for suffix in suffixes {
                        words.push(format!("{prefix}{onset}{vowel}{coda}{suffix}"));
                    }
                }
            }
        }
    }
    words
}

fn bench_build(c: &mut Criterion) {
    let words = word_list();
    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("insert", |b| {
        b.iter(|| TrieRoot::from_words(black_box(&words), TrieOptions::default()))
    });
    group.bench_function("insert_and_consolidate", |b| {
        b.iter(|| consolidate(TrieRoot::from_words(black_box(&words), TrieOptions::default())))
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let words = word_list();
    let trie = consolidate(TrieRoot::from_words(&words, TrieOptions::default()));

    let mut group = c.benchmark_group("codec");
    for version in 1..=4 {
        let options = ExportOptions {
            version,
            ..Default::default()
        };
        let text = encode_to_string(&trie, &options).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", version), &options, |b, options| {
            b.iter(|| encode_to_string(black_box(&trie), options).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", version), &text, |b, text| {
            b.iter(|| decode(black_box(text)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_codec);
criterion_main!(benches);
