#![no_main]

use hwcheck_core::coordination::test_gen::{parse_test_cases, strip_code_fences};
use hwcheck_core::runner::outputs_match;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let stripped = strip_code_fences(&text);
    assert!(stripped.len() <= text.len());

    // Decoding either fails cleanly or yields at least one case
    if let Ok(cases) = parse_test_cases(&text) {
        assert!(!cases.is_empty());
        for case in &cases {
            assert!(outputs_match(&case.expected_output, case.expected_output.trim()));
        }
    }
});
