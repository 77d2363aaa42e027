#![no_main]

use libfuzzer_sys::fuzz_target;
use segpipe::{Aligned, Alignment, Identity, PipeConfig, Processor, source};

fuzz_target!(|input: (u8, u8, Vec<u8>)| {
    let (block, unit, data) = input;
    let block = usize::from(block).max(1);
    let unit = usize::from(unit % 32).max(1);

    for alignment in [Alignment::Fixed(unit), Alignment::Multiple(unit)] {
        let processor = Processor::new(source::from_slice(&data[..]), PipeConfig::new(block).unwrap())
            .unwrap()
            .with_transformer(Aligned::new(Identity, alignment).unwrap());

        let mut out = Vec::new();
        let total = processor.process_to(&mut out).unwrap();

        // Verify: output equals input, and the count matches
        assert_eq!(out, data);
        assert_eq!(total, (!data.is_empty()).then_some(data.len() as u64));
    }
});
