#![no_std]

use l2_reflector::{Event, L2Reflector, NetDevice, Result};

/// Send `frame` through a reflector and read it back into `buf`.
pub fn loopback(frame: &[u8], buf: &mut [u8]) -> Result<usize> {
    let mut dev: L2Reflector<fn(&mut dyn NetDevice, Event)> = L2Reflector::new(None);
    dev.init()?;
    dev.send(&[frame])?;
    dev.recv(Some(buf))
}
