use crate::*;

#[test]
fn parse_data_frame() {
    let frame = [
        0x41, 0xd8, 0x01, 0xcd, 0xab, 0xff, 0xff, 0xc7, 0xd9, 0xb5, 0x14, 0x00, 0x4b, 0x12, 0x00,
        0x2b, 0x00, 0x00, 0x00,
    ];

    let mhr = Mhr::new(&frame).unwrap();

    let fc = mhr.frame_control();
    assert_eq!(fc.frame_type(), FrameType::Data);
    assert!(!fc.security_enabled());
    assert!(!fc.frame_pending());
    assert!(!fc.ack_request());
    assert!(fc.pan_id_compression());

    assert!(fc.dst_addressing_mode() == AddressingMode::Short);
    assert!(fc.frame_version() == FrameVersion::Ieee802154_2006);
    assert!(fc.src_addressing_mode() == AddressingMode::Extended);

    assert_eq!(mhr.sequence_number(), 1);
    assert_eq!(mhr.dst_pan_id(), Some(0xabcd));
    assert_eq!(mhr.dst_address(), Address::BROADCAST);
    assert_eq!(mhr.src_pan_id(), None);
    assert_eq!(
        mhr.src_address(),
        Address::Extended([0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7])
    );
    assert_eq!(mhr.header_len(), 15);
    assert_eq!(mhr.payload(), &[0x2b, 0x00, 0x00, 0x00]);
}

#[test]
fn parse_reflected_frame_into_netif_header() {
    let frame = hex::decode("6198072300341202304142").unwrap();

    let mhr = Mhr::new(&frame[..]).unwrap();
    assert!(mhr.frame_control().ack_request());
    assert_eq!(mhr.payload(), b"AB");

    let mut repr = NetifHeaderRepr::from_mhr(&mhr);
    repr.if_pid = 7;
    assert!(!repr.is_broadcast());

    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut buffer[..]).unwrap();
    assert_eq!(
        buffer,
        [0x02, 0x02, 0x07, 0x00, 0x00, 0x00, 0x00, 0x30, 0x02, 0x12, 0x34]
    );
}

#[test]
fn parse_with_fcs() {
    let mut frame = [0x41, 0x88, 0x05, 0x23, 0x00, 0xff, 0xff, 0x02, 0x30, 0x01, 0x02, 0, 0];
    FrameWithFcs::new_unchecked(&mut frame[..]).fill_fcs();

    let with_fcs = FrameWithFcs::new(&frame[..]).unwrap();
    let mhr = with_fcs.frame().unwrap();
    assert_eq!(mhr.sequence_number(), 5);
    assert_eq!(mhr.payload(), &[0x01, 0x02]);
}
