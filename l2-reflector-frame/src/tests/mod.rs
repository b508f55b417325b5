use super::*;

mod parsing;

#[test]
fn emit_long_long_with_src_pan() {
    let repr = DataHeaderRepr {
        ack_request: true,
        sequence_number: 0xff,
        dst_pan_id: 0xabcd,
        dst_address: Address::Extended([0x00, 0x12, 0x4b, 0x00, 0x14, 0xb5, 0xd9, 0xc7]),
        src_pan_id: Some(0xabcd),
        src_address: Address::Extended([0x12, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]),
    };

    let mut buffer = vec![0; repr.buffer_len()];
    assert_eq!(repr.emit(&mut buffer[..]), Ok(MAX_HDR_LEN));

    assert_eq!(
        buffer,
        hex::decode("21dcffcdabc7d9b514004b1200cdab1222334455667788").unwrap()
    );
}

#[test]
fn emit_broadcast() {
    let repr = DataHeaderRepr {
        ack_request: false,
        sequence_number: 1,
        dst_pan_id: 0x0023,
        dst_address: Address::BROADCAST,
        src_pan_id: None,
        src_address: Address::Short([0x02, 0x30]),
    };

    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut buffer[..]).unwrap();

    assert_eq!(buffer, [0x41, 0x98, 0x01, 0x23, 0x00, 0xff, 0xff, 0x02, 0x30]);
}

#[test]
fn source_address_is_written_as_stored() {
    // The source octets go out unreversed, so reading them back yields the
    // stored octets in reverse.
    let stored = [0x12, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    let repr = DataHeaderRepr {
        ack_request: false,
        sequence_number: 0,
        dst_pan_id: 0x0023,
        dst_address: Address::Short([0x12, 0x34]),
        src_pan_id: None,
        src_address: Address::Extended(stored),
    };

    let mut buffer = [0u8; MAX_HDR_LEN];
    let len = repr.emit(&mut buffer[..]).unwrap();
    let mhr = Mhr::new(&buffer[..len]).unwrap();

    let mut reversed = stored;
    reversed.reverse();
    assert_eq!(mhr.src_address(), Address::Extended(reversed));
    assert_eq!(mhr.dst_address(), Address::Short([0x12, 0x34]));
}

fn random_address() -> Address {
    if rand::random() {
        Address::Short(rand::random())
    } else {
        Address::Extended(rand::random())
    }
}

#[test]
fn random_header_round_trip() {
    for _ in 0..256 {
        let repr = DataHeaderRepr {
            ack_request: rand::random(),
            sequence_number: rand::random(),
            dst_pan_id: rand::random(),
            dst_address: random_address(),
            src_pan_id: rand::random::<bool>().then(rand::random),
            src_address: random_address(),
        };

        let mut buffer = [0u8; MAX_HDR_LEN + 4];
        let len = repr.emit(&mut buffer[..]).unwrap();
        assert_eq!(len, repr.buffer_len());

        let mhr = Mhr::new(&buffer[..]).unwrap();
        assert_eq!(mhr.header_len(), len);
        assert_eq!(mhr.frame_control().frame_type(), FrameType::Data);
        assert_eq!(mhr.frame_control().ack_request(), repr.ack_request);
        assert_eq!(mhr.sequence_number(), repr.sequence_number);
        assert_eq!(mhr.dst_pan_id(), Some(repr.dst_pan_id));
        assert_eq!(mhr.dst_address(), repr.dst_address);
        assert_eq!(mhr.src_pan_id(), repr.src_pan_id);
        assert_eq!(mhr.src_address().len(), repr.src_address.len());

        let netif = NetifHeaderRepr::from_mhr(&mhr);
        assert_eq!(netif.dst_address.len(), repr.dst_address.len());
        assert_eq!(netif.src_address.len(), repr.src_address.len());
    }
}
