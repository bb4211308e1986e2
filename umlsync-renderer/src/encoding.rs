//! PlantUML text encoding: raw DEFLATE, then a base64 variant over the
//! alphabet `0-9A-Za-z-_`.
//!
//! Input is processed in 3-byte groups, each producing four characters. A
//! trailing partial group is zero-padded and still produces four characters;
//! there is no `=` padding.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::RenderError;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Encode diagram text for use in a server URL path.
pub fn encode(text: &str) -> Result<String, RenderError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(text.as_bytes())
        .map_err(RenderError::Encode)?;
    let compressed = encoder.finish().map_err(RenderError::Encode)?;
    Ok(encode64(&compressed))
}

/// The 6-bit alphabet step on its own.
pub fn encode64(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);
        let sextets = [
            b1 >> 2,
            ((b1 & 0x3) << 4) | (b2 >> 4),
            ((b2 & 0xf) << 2) | (b3 >> 6),
            b3 & 0x3f,
        ];
        for s in sextets {
            out.push(ALPHABET[s as usize] as char);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use rstest::rstest;
    use std::io::Read;

    fn decode64(text: &str) -> Vec<u8> {
        let sextets: Vec<u8> = text
            .bytes()
            .map(|c| ALPHABET.iter().position(|&a| a == c).expect("alphabet char") as u8)
            .collect();
        let mut out = Vec::new();
        for group in sextets.chunks(4) {
            out.push((group[0] << 2) | (group[1] >> 4));
            out.push((group[1] << 4) | (group[2] >> 2));
            out.push((group[2] << 6) | group[3]);
        }
        out
    }

    #[rstest]
    #[case(b"abc", "OM9Z")]
    #[case(b"a", "OG00")]
    #[case(&[0x00], "0000")]
    #[case(&[0xff, 0xff, 0xff], "____")]
    #[case(b"", "")]
    fn encode64_vectors(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(encode64(input), expected);
    }

    #[test]
    fn encoded_text_is_url_safe() {
        let encoded = encode("@startuml\nAlice -> Bob: hello?&/ ü\n@enduml\n").unwrap();
        assert!(!encoded.is_empty());
        assert!(encoded
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_'));
    }

    #[test]
    fn encoded_text_inflates_back_to_source() {
        let source = "@startuml\nBob -> Alice : hello\n@enduml\n";
        let encoded = encode(source).unwrap();

        // Zero padding may add trailing bytes past the DEFLATE stream end;
        // the decoder stops at the final block.
        let compressed = decode64(&encoded);
        let mut inflated = String::new();
        DeflateDecoder::new(compressed.as_slice())
            .read_to_string(&mut inflated)
            .unwrap();
        assert_eq!(inflated, source);
    }
}
