#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let doc = mdtree::parse_with_options(source, &mdtree::ParseOptions::default());
    let json = mdtree::serialize_tree(&doc).expect("tree should serialize");
    let _: serde_json::Value = serde_json::from_str(&json).expect("serialized tree is valid JSON");

    let _ = mdtree::parse_inline(source);
});
