#![no_main]

use l2_reflector::{L2Reflector, NetDevice, NetOpt};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<(NetOpt, Vec<u8>)>, Vec<u8>)| {
    let (options, payload) = input;

    let mut dev: L2Reflector = L2Reflector::new(None);
    let _ = dev.init();

    for (opt, value) in options {
        let _ = dev.set(opt, &value);
        let mut out = [0u8; 8];
        let _ = dev.get(opt, &mut out);
    }

    if let Ok(len) = dev.send(&[&payload]) {
        let mut buf = vec![0u8; len];
        assert_eq!(dev.recv(Some(&mut buf[..])), Ok(len));
        assert_eq!(buf, payload);
    }
});
