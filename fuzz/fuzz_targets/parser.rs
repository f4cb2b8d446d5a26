#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    if let Ok(tree) = qlisp::parse(input) {
        let _ = qlisp::read(&tree);
    }
});
