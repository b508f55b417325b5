#![no_main]

use l2_reflector_frame::{DataHeaderRepr, Mhr};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|repr: DataHeaderRepr| {
    if repr.validate().is_err() {
        return;
    }

    let mut buffer = vec![0; repr.buffer_len()];
    let len = repr.emit(&mut buffer).unwrap();

    let mhr = Mhr::new(&buffer[..len]).unwrap();
    assert_eq!(mhr.sequence_number(), repr.sequence_number);
    assert_eq!(mhr.dst_address(), repr.dst_address);
});
