#![no_main]

use l2_reflector_frame::{Mhr, NetifHeaderRepr, FRAME_LEN_MAX};

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > FRAME_LEN_MAX {
        return Corpus::Reject;
    }

    if let Ok(mhr) = Mhr::new(data) {
        let _ = mhr.dst_pan_id();
        let _ = mhr.src_pan_id();
        let _ = mhr.payload();
        let repr = NetifHeaderRepr::from_mhr(&mhr);

        let mut buffer = vec![0; repr.buffer_len()];
        assert_eq!(repr.emit(&mut buffer), Ok(buffer.len()));
    }

    Corpus::Keep
});
