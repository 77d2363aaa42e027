#![no_main]

use libfuzzer_sys::fuzz_target;
use segpipe::{CodecReader, SliceReader, UnitRead, Utf8Decoder};

fuzz_target!(|data: Vec<u8>| {
    let mut reader = CodecReader::with_capacity(SliceReader::new(&data[..]), Utf8Decoder::new(), 4).unwrap();

    let mut decoded = String::new();
    let result = loop {
        match reader.read_one() {
            Ok(Some(c)) => decoded.push(c),
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    // Verify: valid input decodes exactly, invalid input fails as a coding error
    match std::str::from_utf8(&data) {
        Ok(text) => assert_eq!(result.map(|_| decoded.as_str()).unwrap(), text),
        Err(_) => assert!(result.unwrap_err().is_coding()),
    }
});
