#![no_main]

use arbitrary::Arbitrary;
use dnasa::index::{BuildConfig, IndexBuilder};
use dnasa::query::{AcceleratedSearch, IntervalSearch, NaiveSearch, SearchRange};
use dnasa::utils::FastaRecord;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    genome: Vec<u8>,
    pattern: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Any bytes: non-ACGT genome bytes are replaced, pattern bytes kept as-is
    let mut builder = IndexBuilder::new(BuildConfig {
        seed: Some(0),
        ..Default::default()
    });
    builder.add_record(&FastaRecord {
        name: "fuzz".into(),
        sequence: input.genome,
    });
    let index = builder.build().expect("normalized text must index").index;
    let range = SearchRange::full(index.len());

    let naive = NaiveSearch.interval(index.view(), &input.pattern, range);
    let accel = AcceleratedSearch.interval(index.view(), &input.pattern, range);
    assert_eq!(naive, accel);

    let text = index.text();
    let expected = (0..text.len())
        .filter(|&i| text[i..].starts_with(&input.pattern))
        .count();
    assert_eq!(naive.len(), expected);
});
