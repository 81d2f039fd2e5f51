pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    Error,
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{TextPayload, TextPayloadFormat},
    record::NdefRecord,
};

/// Parse records until one carries the message end flag or the input runs out
pub fn parse_ndef_records(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end || input.is_empty() {
            break;
        }
    }

    if !input.is_empty() {
        tracing::trace!("ignoring {} bytes after message end", input.len());
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, header.payload_length)?;

    Ok(NdefRecord {
        header,
        type_,
        id,
        payload,
    })
}

/// Parse the payload of a well known text record
pub fn parse_text_payload(payload: &[u8]) -> Result<TextPayload, Error> {
    let mut input = stream::new(payload);
    text_payload
        .parse_next(&mut input)
        .map_err(|error| Error::Parse(format!("invalid text record: {error}")))
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: NdefType::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize)
            .map(|s: &[u8]| Some(s.to_vec()))
            .parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<Vec<u8>> {
    take(payload_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn text_payload(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    // status byte: utf16 flag, reserved bit, 6 bit language code length
    let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
            .parse_next(input)?;

    let language_code = take(language_code_length as usize).parse_next(input)?;

    let remaining_length = input.len();
    let text = take(remaining_length).parse_next(input)?;

    let (format, text) = if is_utf16 {
        (TextPayloadFormat::Utf16, decode_utf16(text))
    } else {
        (
            TextPayloadFormat::Utf8,
            String::from_utf8_lossy(text).to_string(),
        )
    };

    Ok(TextPayload {
        format,
        language: String::from_utf8_lossy(language_code).to_string(),
        text,
    })
}

/// Big endian unless a byte order mark says otherwise
fn decode_utf16(bytes: &[u8]) -> String {
    let (little_endian, bytes) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = bytes
        .chunks_exact(2)
        .map(|chunk| {
            if little_endian {
                u16::from_le_bytes([chunk[0], chunk[1]])
            } else {
                u16::from_be_bytes([chunk[0], chunk[1]])
            }
        })
        .collect::<Vec<u16>>();

    String::from_utf16_lossy(&units)
}
