use crate::record::NdefRecord;

/// Serialize records as one message, setting the begin / end flags by position
pub fn encode_records(records: &[NdefRecord]) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(records));
    let last = records.len().saturating_sub(1);

    for (index, record) in records.iter().enumerate() {
        encode_record(record, index == 0, index == last, &mut out);
    }

    out
}

/// Number of bytes `encode_records` will produce
pub fn encoded_len(records: &[NdefRecord]) -> usize {
    records.iter().map(record_len).sum()
}

fn record_len(record: &NdefRecord) -> usize {
    let payload_length_bytes = if record.payload.len() <= u8::MAX as usize { 1 } else { 4 };
    let id_length_bytes = usize::from(record.id.is_some());

    2 + payload_length_bytes
        + id_length_bytes
        + record.type_.len()
        + record.id.as_ref().map_or(0, Vec::len)
        + record.payload.len()
}

fn encode_record(record: &NdefRecord, first: bool, last: bool, out: &mut Vec<u8>) {
    let mut header = record.header.clone();
    header.message_begin = first;
    header.message_end = last;
    header.chunked = false;
    header.short_record = record.payload.len() <= u8::MAX as usize;
    header.has_id_length = record.id.is_some();

    out.push(header.flags_byte());
    out.push(record.type_.len() as u8);

    if header.short_record {
        out.push(record.payload.len() as u8);
    } else {
        out.extend_from_slice(&(record.payload.len() as u32).to_be_bytes());
    }

    if let Some(id) = &record.id {
        out.push(id.len() as u8);
    }

    out.extend_from_slice(&record.type_);

    if let Some(id) = &record.id {
        out.extend_from_slice(id);
    }

    out.extend_from_slice(&record.payload);
}
