#![no_main]

use l2_reflector_frame::{NetifHeader, NetifHeaderRepr};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(hdr) = NetifHeader::new(data) {
        let _ = NetifHeaderRepr::parse(&hdr);
    }
});
