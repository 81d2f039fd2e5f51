use winnow::Bytes;

pub type Stream<'i> = &'i Bytes;

pub fn new(b: &[u8]) -> Stream<'_> {
    Bytes::new(b)
}
