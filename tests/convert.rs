use pretty_assertions::assert_eq;

use rebadge::check::accumulate;
use rebadge::header::HeaderError;
use rebadge::{Converter, Error, Event, HaltReason, convert, creator};

#[test]
fn stamps_garmin_identity_into_file_id() {
    let input = document(&file_id_records(32, 0, 0));
    let mutation = convert(input.clone()).unwrap();

    assert!(mutation.manufacturer_changed);
    assert!(mutation.file_creator_present);
    assert_eq!(mutation.halt, None);

    let out = &mutation.data;
    assert_eq!(out.len(), input.len() + 16);

    // Data record body starts after the 14-byte header, the record header
    // byte, and an 18-byte definition record.
    assert_eq!(out[33], 4); // type
    assert_eq!(u16::from_le_bytes([out[34], out[35]]), 1); // manufacturer
    assert_eq!(u16::from_le_bytes([out[36], out[37]]), 3122); // product
    assert_eq!(&out[38..42], &input[38..42]); // time_created untouched
}

#[test]
fn grows_declared_payload_with_inserted_block() {
    let records = file_id_records(32, 0, 0);
    let mutation = convert(document(&records)).unwrap();

    let out = &mutation.data;
    let declared = u32::from_le_bytes(out[4..8].try_into().unwrap());
    assert_eq!(declared as usize, records.len() + 16);

    let at = out.len() - 18;
    assert_eq!(&out[at..at + 16], &creator::block());
}

#[test]
fn reseals_trailer_over_rewritten_bytes() {
    let mutation = convert(document(&file_id_records(32, 0, 0))).unwrap();

    let out = &mutation.data;
    let found = u16::from_le_bytes(out[out.len() - 2..].try_into().unwrap());
    let calculated = accumulate(0, &out[..out.len() - 2]);
    assert_eq!(found, calculated);

    assert!(mutation.events.contains(&Event::TrailerSealed { crc: calculated }));
}

#[test]
fn records_events_in_occurrence_order() {
    let mutation = convert(document(&file_id_records(32, 0, 0))).unwrap();

    let out = &mutation.data;
    let crc = u16::from_le_bytes(out[out.len() - 2..].try_into().unwrap());

    assert_eq!(
        mutation.events,
        vec![
            Event::ProtocolVersionForced { from: 0x20 },
            Event::ProfileVersionForced { from: 1065 },
            Event::FileTypeForced { from: 0 },
            Event::ManufacturerForced { message: 0, from: 32 },
            Event::ProductForced { message: 0, from: 0 },
            Event::TimeCreated { seconds: TIME_CREATED },
            Event::FileCreatorInserted,
            Event::TrailerSealed { crc },
        ]
    );
}

#[test]
fn conversion_is_idempotent() {
    let once = convert(document(&file_id_records(32, 0, 0))).unwrap();
    let twice = convert(once.data.clone()).unwrap();

    assert_eq!(twice.data, once.data);
}

#[test]
fn normalizes_header_versions_unconditionally() {
    let input = document(&[]);
    let mutation = convert(input.clone()).unwrap();

    let out = &mutation.data;
    assert!(!mutation.manufacturer_changed);
    assert!(!mutation.file_creator_present);
    assert_eq!(out.len(), input.len());

    assert_eq!(out[1], 16);
    assert_eq!(u16::from_le_bytes([out[2], out[3]]), 2134);

    // Without a manufacturer rewrite the trailer is left as found.
    assert_eq!(&out[out.len() - 2..], &input[input.len() - 2..]);
}

#[test]
fn stamps_garmin_identity_into_device_info() {
    let mut records = vec![
        0x41, 0x00, 0x00, 0x17, 0x00, 0x02, // definition, local 1, global 23
        0x02, 0x02, 0x84, // manufacturer
        0x04, 0x02, 0x84, // product
        0x01, // data record, local 1
    ];
    records.extend_from_slice(&260u16.to_le_bytes());
    records.extend_from_slice(&7u16.to_le_bytes());

    let input = document(&records);
    let mutation = convert(input.clone()).unwrap();

    assert!(mutation.manufacturer_changed);

    let out = &mutation.data;
    assert_eq!(out.len(), input.len() + 16);
    assert_eq!(u16::from_le_bytes([out[27], out[28]]), 1);
    assert_eq!(u16::from_le_bytes([out[29], out[30]]), 3122);
}

#[test]
fn existing_file_creator_suppresses_splice() {
    let mut records = vec![
        0x47, 0x00, 0x00, 0x31, 0x00, 0x02, // definition, local 7, global 49
        0x00, 0x02, 0x84, // software_version
        0x01, 0x01, 0x02, // hardware_version
        0x07, // data record, local 7
    ];
    records.extend_from_slice(&100u16.to_le_bytes());
    records.push(1);
    records.extend_from_slice(&file_id_records(32, 0, 0));

    let input = document(&records);
    let mutation = convert(input.clone()).unwrap();

    assert!(mutation.manufacturer_changed);
    assert!(mutation.file_creator_present);
    assert_eq!(mutation.data.len(), input.len());

    assert!(mutation.events.contains(&Event::FileCreatorObserved));
    assert!(!mutation.events.contains(&Event::FileCreatorInserted));
}

#[test]
fn later_definition_replaces_slot_binding() {
    let mut records = file_id_records(32, 0, 0);
    records.extend_from_slice(&[
        0x40, 0x00, 0x00, 0xF4, 0x01, 0x01, // redefinition, local 0, global 500
        0x01, 0x02, 0x84, // a two-byte field numbered like a manufacturer
        0x00, // data record, local 0
    ]);
    records.extend_from_slice(&32u16.to_le_bytes());

    let input = document(&records);
    let mutation = convert(input).unwrap();

    assert!(mutation.manufacturer_changed);
    assert_eq!(mutation.halt, None);

    // The rebound slot points at an unrecognized message kind, so the second
    // data record must pass through untouched.
    let out = &mutation.data;
    let at = out.len() - 18 - 2;
    assert_eq!(u16::from_le_bytes([out[at], out[at + 1]]), 32);
}

#[test]
fn halts_on_unbound_local_slot() {
    let input = document(&[0x03, 0xAA, 0xBB]);
    let mutation = convert(input.clone()).unwrap();

    assert_eq!(mutation.halt, Some(HaltReason::UnknownLocalType));
    assert!(!mutation.manufacturer_changed);

    // The partially processed buffer still comes back, header normalized.
    assert_eq!(mutation.data.len(), input.len());
    assert_eq!(mutation.data[1], 16);
}

#[test]
fn halts_on_truncated_definition() {
    let mut records = vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x0A]; // declares ten fields
    records.extend_from_slice(&[0x00, 0x01, 0x00, 0x01, 0x02, 0x84]); // holds two

    let mutation = convert(document(&records)).unwrap();

    assert_eq!(mutation.halt, Some(HaltReason::Truncated));
    assert!(!mutation.manufacturer_changed);
}

#[test]
fn folds_compressed_headers_into_slot_keys() {
    let mut records = file_id_definition();
    records.push(0x80); // compressed timestamp header, low four bits zero
    records.extend_from_slice(&file_id_body(32, 0, 0));

    let mutation = convert(document(&records)).unwrap();

    assert_eq!(mutation.halt, None);
    assert!(mutation.manufacturer_changed);
    assert_eq!(u16::from_le_bytes([mutation.data[34], mutation.data[35]]), 1);
}

#[test]
fn strict_timestamps_halt_at_compressed_headers() {
    let mut records = file_id_definition();
    records.push(0x80);
    records.extend_from_slice(&file_id_body(32, 0, 0));

    let input = document(&records);
    let mutation = Converter::new()
        .strict_timestamps(true)
        .convert(input.clone())
        .unwrap();

    assert_eq!(mutation.halt, Some(HaltReason::CompressedTimestamp));
    assert!(!mutation.manufacturer_changed);
    assert_eq!(mutation.data.len(), input.len());
}

#[test]
fn rejects_documents_too_short_for_a_header() {
    let error = convert(vec![14, 0x10, 0x00]).unwrap_err();
    assert!(matches!(error, Error::Header(HeaderError::TooShort)));
}

#[test]
fn rejects_missing_file_type_marker() {
    let mut input = document(&[]);
    input[8..12].copy_from_slice(b".BIT");

    let error = convert(input).unwrap_err();
    assert!(matches!(error, Error::Header(HeaderError::BadSignature)));
}

#[test]
fn rejects_header_lengths_below_minimum() {
    let mut input = document(&[]);
    input[0] = 11;

    let error = convert(input).unwrap_err();
    assert!(matches!(
        error,
        Error::Header(HeaderError::HeaderTooShort(11))
    ));
}

const TIME_CREATED: u32 = 1_100_000_000;

/// Assemble a document around a record stream: a 14-byte header, the records,
/// and a freshly computed trailer. Versions are deliberately non-Garmin.
fn document(records: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();

    data.push(14); // header size
    data.push(0x20); // protocol version 2.0
    data.extend_from_slice(&1065u16.to_le_bytes()); // profile version
    data.extend_from_slice(&(records.len() as u32).to_le_bytes());
    data.extend_from_slice(b".FIT");
    data.extend_from_slice(&[0x00, 0x00]); // header check, not validated
    data.extend_from_slice(records);

    let crc = accumulate(0, &data);
    data.extend_from_slice(&crc.to_le_bytes());

    data
}

fn file_id_definition() -> Vec<u8> {
    vec![
        0x40, 0x00, 0x00, 0x00, 0x00, 0x04, // definition, local 0, global 0
        0x00, 0x01, 0x00, // type
        0x01, 0x02, 0x84, // manufacturer
        0x02, 0x02, 0x84, // product
        0x04, 0x04, 0x86, // time_created
    ]
}

fn file_id_body(manufacturer: u16, product: u16, file_type: u8) -> Vec<u8> {
    let mut body = vec![file_type];
    body.extend_from_slice(&manufacturer.to_le_bytes());
    body.extend_from_slice(&product.to_le_bytes());
    body.extend_from_slice(&TIME_CREATED.to_le_bytes());

    body
}

fn file_id_records(manufacturer: u16, product: u16, file_type: u8) -> Vec<u8> {
    let mut records = file_id_definition();
    records.push(0x00); // data record, local 0
    records.extend_from_slice(&file_id_body(manufacturer, product, file_type));

    records
}
