#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail cleanly, and any parsed records
    // must build a valid index
    if let Ok(records) = dnasa::utils::read_records(data) {
        let mut builder = dnasa::index::IndexBuilder::new(dnasa::index::BuildConfig {
            prefix_len: Some(2),
            seed: Some(0),
            ..Default::default()
        });
        builder.add_records(&records);
        let built = builder.build().expect("normalized text must index");
        assert!(dnasa::index::is_sorted(built.index.text(), built.index.suffix_array()));
    }
});
