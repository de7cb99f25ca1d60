use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::NaiveDate;

use super::armor::{get_string, insert_string};
use super::*;
use crate::core::PgnValue;
use crate::infra::codec::traits::FieldValue;
use crate::protocol::messages::units::{degrees, knots};
use crate::protocol::nmea0183::ParsedSentence;

const CLASS_A: &str = "!AIVDM,1,1,,A,15M67FCP1so?uffE`FepT@3n0000,0*63";
const STATIC_VOYAGE: [&str; 2] = [
    "!AIVDM,2,1,3,A,55?MbV02;H;s<HtKP00EHE:0@T4@Dl0000000016L961O5Gf0NSQEp6ClRh0,0*0C",
    "!AIVDM,2,2,3,A,00000000000,2*27",
];
const ATON: &str = "!AIVDM,1,1,,A,E>k`sU@W0c4SPb4WW@1:Wdh7:VQ0:C;P>bJV050`@@v011D`<L`1@Dm0,4*66";
const STATIC_PART_A: &str = "!AIVDM,1,1,,A,H42O55i18tMET00000000000000,2*6D";
const STATIC_PART_B: &str = "!AIVDM,1,1,,A,H42O55ltijk0000D3nink000:420,0*1E";
const AUXILIARY_PART_B: &str = "!AIVDM,1,1,,A,H>WikQl000000001EHi000>S@M00,0*3D";

fn approx(a: f64, b: f64, eps: f64) -> bool {
    let d = a - b;
    d < eps && d > -eps
}

fn fragment(line: &str) -> AisFragment {
    let sentence = ParsedSentence::parse(line).unwrap();
    AisFragment::from_sentence(&sentence).unwrap()
}

fn decode_single(line: &str) -> (&'static crate::core::PgnDescriptor, FieldSet) {
    let message = AisMessage::from(fragment(line));
    decode_message(&message, 2024).unwrap()
}

//==================================================================================ARMOR
#[test]
fn test_six_bit_alphabet() {
    assert_eq!(decode_six_bit_char(b'0').unwrap(), 0);
    assert_eq!(decode_six_bit_char(b'W').unwrap(), 39);
    assert_eq!(decode_six_bit_char(b'`').unwrap(), 40);
    assert_eq!(decode_six_bit_char(b'w').unwrap(), 63);
    assert_eq!(decode_six_bit_char(b'X'), Err(AisError::InvalidArmor { ch: b'X' }));
    assert_eq!(decode_six_bit_char(b'x'), Err(AisError::InvalidArmor { ch: b'x' }));

    for value in 0..64u8 {
        assert_eq!(decode_six_bit_char(encode_six_bit_char(value)).unwrap(), value);
    }
}

#[test]
/// Fill bits are stripped on unarmor and restored on armor.
fn test_armor_fill_bits() {
    let bits = armor_to_bits("55?MbV020", 2).unwrap();
    assert_eq!(bits.len(), 9 * 6 - 2);
    let (text, fill) = bits_to_armor(&bits);
    assert_eq!(text, "55?MbV020");
    assert_eq!(fill, 2);

    assert_eq!(
        armor_to_bits("15M", 6),
        Err(AisError::InvalidFillBits { fill: 6 })
    );
}

#[test]
fn test_itu_strings() {
    let mut bits = BitVector::zeroed(60);
    insert_string(&mut bits, 0, 10, "ever diadem");
    assert_eq!(get_string(&bits, 0, 10).unwrap(), "EVER DIADE");

    let mut bits = BitVector::zeroed(42);
    insert_string(&mut bits, 0, 7, "3FOF8");
    assert_eq!(get_string(&bits, 0, 7).unwrap(), "3FOF8");
    // Only padding left.
    assert_eq!(get_string(&BitVector::zeroed(42), 0, 7), None);
    // Truncated by the end of the message.
    assert_eq!(get_string(&bits, 12, 7).unwrap(), "OF8");
}

//==================================================================================FRAGMENTS
#[test]
fn test_fragment_fields() {
    let first = fragment(STATIC_VOYAGE[0]);
    assert_eq!(first.total_sentences, 2);
    assert_eq!(first.sentence_number, 1);
    assert_eq!(first.sequence_id, Some(3));
    assert_eq!(first.channel, Some('A'));
    assert!(!first.own_vessel);
    assert_eq!(first.fill_bits, 0);

    let own = fragment("!AIVDO,1,1,,B,15M67FCP1so?uffE`FepT@3n0000,0");
    assert!(own.own_vessel);
    assert_eq!(AisMessage::from(own).transceiver(), 3);
}

#[test]
fn test_fragment_rejects_bad_counts() {
    for line in [
        "!AIVDM,0,1,,A,15M6,0",
        "!AIVDM,2,3,1,A,15M6,0",
        "!AIVDM,2,1,12,A,15M6,0",
        "!AIVDM,1,1,,A,,0",
    ] {
        let sentence = ParsedSentence::parse(line).unwrap();
        assert_eq!(
            AisFragment::from_sentence(&sentence),
            Err(AisError::InvalidFragment),
            "{line}"
        );
    }
}

#[test]
fn test_assembler_joins_fragments() {
    let mut assembler = AisSentenceAssembler::new();
    assert_eq!(assembler.push(fragment(STATIC_VOYAGE[0])).unwrap(), None);
    assert_eq!(assembler.pending(), 1);

    let message = assembler.push(fragment(STATIC_VOYAGE[1])).unwrap().unwrap();
    assert_eq!(message.payload.len(), 71);
    assert_eq!(message.fill_bits, 2);
    assert_eq!(assembler.pending(), 0);
}

#[test]
/// A fragment that does not follow the buffered one drops the slot.
fn test_assembler_out_of_order() {
    let mut assembler = AisSentenceAssembler::new();
    assert_eq!(
        assembler.push(fragment(STATIC_VOYAGE[1])),
        Err(AisError::InvalidFragment)
    );

    assembler.push(fragment(STATIC_VOYAGE[0])).unwrap();
    let third = fragment("!AIVDM,3,2,3,A,0000,0");
    assert_eq!(assembler.push(third), Err(AisError::InvalidFragment));
    assert_eq!(assembler.pending(), 0);
    assert_eq!(
        assembler.push(fragment(STATIC_VOYAGE[1])),
        Err(AisError::InvalidFragment)
    );
}

#[test]
fn test_assembler_restarts_on_new_first_sentence() {
    let mut assembler = AisSentenceAssembler::new();
    assembler.push(fragment("!AIVDM,2,1,3,A,0000,0")).unwrap();
    assembler.push(fragment(STATIC_VOYAGE[0])).unwrap();
    let message = assembler.push(fragment(STATIC_VOYAGE[1])).unwrap().unwrap();
    assert!(message.payload.starts_with("55?MbV02"));
}

//==================================================================================DECODE
#[test]
fn test_decode_class_a_position() {
    let (descriptor, fields) = decode_single(CLASS_A);
    assert_eq!(descriptor.id, 129038);
    assert_eq!(fields.u64("MessageId"), Some(1));
    assert_eq!(fields.u64("RepeatIndicator"), Some(0));
    assert_eq!(fields.u32("UserId"), Some(366_053_209));
    assert_eq!(fields.u8("NavStatus"), Some(3));
    assert!(!fields.contains("RateOfTurn"));
    assert!(approx(knots(fields.f64("Sog").unwrap()), 12.3, 1e-9));
    assert_eq!(fields.u8("PositionAccuracy"), Some(1));
    assert!(approx(fields.f64("Longitude").unwrap(), -122.341615, 1e-6));
    assert!(approx(fields.f64("Latitude").unwrap(), 37.802118, 1e-6));
    assert!(approx(degrees(fields.f64("Cog").unwrap()), 219.3, 1e-9));
    assert!(approx(degrees(fields.f64("Heading").unwrap()), 1.0, 1e-9));
    assert_eq!(fields.u8("TimeStamp"), Some(59));
    assert_eq!(fields.u8("AisTransceiverInformation"), Some(0));
}

#[test]
/// Decoding then encoding the same fields gives back the payload.
fn test_class_a_fields_to_bits() {
    let (descriptor, fields) = decode_single(CLASS_A);
    let bits = fields_to_bits(descriptor, &fields).unwrap();
    let (text, fill) = bits_to_armor(&bits);
    assert_eq!(text, "15M67FCP1so?uffE`FepT@3n0000");
    assert_eq!(fill, 0);
}

#[test]
fn test_rate_of_turn_indicator() {
    let mut fields = FieldSet::new();
    fields.insert("UserId", PgnValue::U64(1));
    // 720 °/min gives the largest indicator.
    fields.insert("RateOfTurn", PgnValue::F64(0.2094));
    let bits = fields_to_bits(&crate::protocol::messages::ais::PGN_129038_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.get_signed(42, 8).unwrap(), 127);

    fields.insert("RateOfTurn", PgnValue::F64(-0.2094));
    let bits = fields_to_bits(&crate::protocol::messages::ais::PGN_129038_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.get_signed(42, 8).unwrap(), -127);

    let (_, decoded) = bits_to_fields(&bits, 2024).unwrap();
    let rate = decoded.f64("RateOfTurn").unwrap();
    assert!(approx(degrees(rate) * 60.0, -720.0, 0.1));

    fields.remove("RateOfTurn");
    let bits = fields_to_bits(&crate::protocol::messages::ais::PGN_129038_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.get_signed(42, 8).unwrap(), -128);
}

#[test]
/// ITU and NMEA 2000 use different "not available" values for course, speed
/// and heading; an absent value maps to the sentinel of the other side.
fn test_class_a_sentinels_cross_over() {
    use crate::infra::codec::engine;
    use crate::infra::codec::traits::PgnData;
    use crate::protocol::messages::ais::{Pgn129038, PGN_129038_DESCRIPTOR};

    let mut fields = FieldSet::new();
    fields.insert("UserId", PgnValue::U64(366_053_209));
    let bits = fields_to_bits(&PGN_129038_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.get_integer(50, 10).unwrap(), 1023);
    assert_eq!(bits.get_integer(116, 12).unwrap(), 3600);
    assert_eq!(bits.get_integer(128, 9).unwrap(), 511);

    let (_, decoded) = bits_to_fields(&bits, 2024).unwrap();
    assert!(!decoded.contains("Sog"));
    assert!(!decoded.contains("Cog"));
    assert!(!decoded.contains("Heading"));

    let payload = engine::serialize(&decoded, &PGN_129038_DESCRIPTOR).unwrap();
    assert_eq!(payload[14..16], [0xFF, 0xFF]);
    assert_eq!(payload[16..18], [0xFF, 0xFF]);
    assert_eq!(payload[21..23], [0xFF, 0xFF]);

    let record = Pgn129038::from_payload(&payload).unwrap();
    assert_eq!(record.user_id, Some(366_053_209));
    assert_eq!(record.cog, None);
    assert_eq!(record.sog, None);
    assert_eq!(record.heading, None);

    // And back: the N2K sentinels become the ITU ones again.
    let fields = engine::deserialize(&payload, &PGN_129038_DESCRIPTOR).unwrap();
    let bits = fields_to_bits(&PGN_129038_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.get_integer(50, 10).unwrap(), 1023);
    assert_eq!(bits.get_integer(116, 12).unwrap(), 3600);
    assert_eq!(bits.get_integer(128, 9).unwrap(), 511);
}

#[test]
fn test_decode_static_voyage_with_eta() {
    let mut assembler = AisSentenceAssembler::new();
    assembler.push(fragment(STATIC_VOYAGE[0])).unwrap();
    let message = assembler.push(fragment(STATIC_VOYAGE[1])).unwrap().unwrap();
    let (descriptor, fields) = decode_message(&message, 2024).unwrap();

    assert_eq!(descriptor.id, 129794);
    assert_eq!(fields.u32("UserId"), Some(351_759_000));
    assert_eq!(fields.u32("ImoNumber"), Some(9_134_270));
    assert_eq!(fields.text("Callsign"), Some("3FOF8"));
    assert_eq!(fields.text("Name"), Some("EVER DIADEM"));
    assert_eq!(fields.text("Destination"), Some("NEW YORK"));
    assert_eq!(fields.u8("TypeOfShip"), Some(70));
    assert_eq!(fields.f64("Length"), Some(295.0));
    assert_eq!(fields.f64("PositionReferenceFromBow"), Some(225.0));
    assert_eq!(fields.f64("Beam"), Some(32.0));
    assert_eq!(fields.f64("PositionReferenceFromStarboard"), Some(31.0));
    assert_eq!(fields.u8("GnssType"), Some(1));
    assert!(approx(fields.f64("Draft").unwrap(), 12.2, 1e-9));
    assert_eq!(
        NaiveDate::read(&fields, "EtaDate"),
        NaiveDate::from_ymd_opt(2024, 5, 15)
    );
    assert_eq!(fields.f64("EtaTime"), Some(14.0 * 3600.0));
    assert_eq!(fields.u8("Dte"), Some(0));
}

#[test]
fn test_missing_eta_uses_not_available() {
    let mut fields = FieldSet::new();
    fields.insert("UserId", PgnValue::U64(1));
    let bits = fields_to_bits(&crate::protocol::messages::ais::PGN_129794_DESCRIPTOR, &fields).unwrap();
    assert_eq!(bits.len(), 424);
    assert_eq!(bits.get_integer(274, 4).unwrap(), 0);
    assert_eq!(bits.get_integer(278, 5).unwrap(), 0);
    assert_eq!(bits.get_integer(283, 5).unwrap(), 24);
    assert_eq!(bits.get_integer(288, 6).unwrap(), 60);

    let (_, decoded) = bits_to_fields(&bits, 2024).unwrap();
    assert!(!decoded.contains("EtaDate"));
    assert!(!decoded.contains("EtaTime"));
    assert!(!decoded.contains("Draft"));
    assert!(!decoded.contains("Length"));
}

#[test]
/// Name extension past bit 272 is appended to the 20 character name.
fn test_decode_aton_name_extension() {
    let (descriptor, fields) = decode_single(ATON);
    assert_eq!(descriptor.id, 129041);
    assert_eq!(fields.u32("UserId"), Some(993_672_085));
    assert_eq!(fields.u8("AtonType"), Some(1));
    assert_eq!(fields.text("AtonName"), Some("NAVIGATION BUOY NUMBER 12 EAST"));
    assert!(approx(fields.f64("Longitude").unwrap(), 4.5, 1e-9));
    assert!(approx(fields.f64("Latitude").unwrap(), 51.25, 1e-9));
    assert_eq!(fields.f64("Length"), Some(10.0));
    assert_eq!(fields.f64("Beam"), Some(4.0));
    assert!(!fields.contains("TimeStamp"));
    assert_eq!(fields.u8("VirtualAtonFlag"), Some(1));

    let bits = fields_to_bits(descriptor, &fields).unwrap();
    assert_eq!(bits.len(), 272 + 10 * 6);
    let (text, fill) = bits_to_armor(&bits);
    assert_eq!(text, "E>k`sU@W0c4SPb4WW@1:Wdh7:VQ0:C;P>bJV050`@@v011D`<L`1@Dm0");
    assert_eq!(fill, 4);
}

#[test]
fn test_aton_without_extension() {
    let mut fields = FieldSet::new();
    fields.insert("UserId", PgnValue::U64(993_672_085));
    fields.insert("AtonName", PgnValue::Text(String::from("NORTH PIER")));
    let descriptor = &crate::protocol::messages::ais::PGN_129041_DESCRIPTOR;
    let bits = fields_to_bits(descriptor, &fields).unwrap();
    assert_eq!(bits.len(), 272);
    let (_, decoded) = bits_to_fields(&bits, 2024).unwrap();
    assert_eq!(decoded.text("AtonName"), Some("NORTH PIER"));
}

#[test]
fn test_decode_static_data_parts() {
    let (descriptor, fields) = decode_single(STATIC_PART_A);
    assert_eq!(descriptor.id, 129809);
    assert_eq!(fields.u32("UserId"), Some(271_041_815));
    assert_eq!(fields.text("Name"), Some("PROGUY"));

    let (descriptor, fields) = decode_single(STATIC_PART_B);
    assert_eq!(descriptor.id, 129810);
    assert_eq!(fields.u8("TypeOfShip"), Some(60));
    assert_eq!(fields.text("VendorId"), Some("123"));
    assert_eq!(fields.text("Callsign"), Some("TC6163"));
    assert_eq!(fields.f64("Length"), Some(10.0));
    assert_eq!(fields.f64("PositionReferenceFromBow"), Some(0.0));
    assert_eq!(fields.f64("Beam"), Some(6.0));
    assert_eq!(fields.f64("PositionReferenceFromStarboard"), Some(2.0));
    assert!(!fields.contains("MothershipUserId"));

    let bits = fields_to_bits(descriptor, &fields).unwrap();
    assert_eq!(bits.get_integer(38, 2).unwrap(), 1);
}

#[test]
/// Auxiliary craft report their mothership instead of dimensions.
fn test_auxiliary_craft_mothership() {
    let (_, fields) = decode_single(AUXILIARY_PART_B);
    assert_eq!(fields.u32("UserId"), Some(981_234_567));
    assert_eq!(fields.u32("MothershipUserId"), Some(244_123_456));
    assert!(!fields.contains("Length"));
}

#[test]
fn test_unsupported_and_short_messages() {
    // Message type 8 (binary broadcast).
    let message = AisMessage::from(fragment("!AIVDM,1,1,,A,85M67FC0000,0"));
    assert_eq!(
        decode_message(&message, 2024).unwrap_err(),
        AisError::UnsupportedMessageType { kind: 8 }
    );

    let message = AisMessage::from(fragment("!AIVDM,1,1,,A,15M67FCP1so,0"));
    assert_eq!(
        decode_message(&message, 2024).unwrap_err(),
        AisError::TooShort { bits: 66, needed: 168 }
    );
}

//==================================================================================RENDER
#[test]
fn test_render_single_sentence() {
    let (descriptor, fields) = decode_single(CLASS_A);
    let sentences = render(descriptor, &fields, || unreachable!()).unwrap();
    let lines: Vec<String> = sentences.iter().map(ToString::to_string).collect();
    assert_eq!(lines, [CLASS_A]);
}

#[test]
/// Long payloads are split at 60 characters and share a sequence id.
fn test_render_multi_sentence() {
    let mut assembler = AisSentenceAssembler::new();
    assembler.push(fragment(STATIC_VOYAGE[0])).unwrap();
    let message = assembler.push(fragment(STATIC_VOYAGE[1])).unwrap().unwrap();
    let (descriptor, fields) = decode_message(&message, 2024).unwrap();

    let sentences = render(descriptor, &fields, || 3).unwrap();
    let lines: Vec<String> = sentences.iter().map(ToString::to_string).collect();
    assert_eq!(lines, STATIC_VOYAGE);
}

#[test]
/// Own vessel reports go out as VDO on the matching channel.
fn test_render_own_vessel_channel() {
    let (descriptor, mut fields) = decode_single(CLASS_A);
    fields.insert("AisTransceiverInformation", PgnValue::U64(3));
    let sentences = render(descriptor, &fields, || 0).unwrap();
    let line = sentences[0].to_string();
    assert!(line.starts_with("!AIVDO,1,1,,B,15M67FCP1so"), "{line}");
}
