//! UTF-8 coders.

use super::{Coder, CoderResult, CoderStep};

/// Decodes UTF-8 bytes into chars.
///
/// Stateless between calls: an incomplete trailing sequence stays in the
/// input until more bytes arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl Utf8Decoder {
    /// Creates a decoder.
    pub fn new() -> Self {
        Self
    }
}

impl Coder for Utf8Decoder {
    type Input = u8;
    type Output = char;

    fn code(&mut self, input: &[u8], output: &mut [char], last: bool) -> CoderStep {
        let (text, error) = match std::str::from_utf8(input) {
            Ok(text) => (text, None),
            Err(e) => (
                std::str::from_utf8(&input[..e.valid_up_to()]).unwrap_or_default(),
                Some(e),
            ),
        };

        let mut read = 0;
        let mut written = 0;
        for c in text.chars() {
            if written == output.len() {
                return CoderStep::new(CoderResult::Overflow, read, written);
            }
            output[written] = c;
            written += 1;
            read += c.len_utf8();
        }

        let result = match error.map(|e| e.error_len()) {
            None => CoderResult::Underflow,
            Some(Some(length)) => CoderResult::Malformed { length },
            Some(None) if last => CoderResult::Malformed {
                length: input.len() - read,
            },
            Some(None) => CoderResult::Underflow,
        };
        CoderStep::new(result, read, written)
    }

    fn reset(&mut self) {}
}

/// Encodes chars into UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Encoder;

impl Utf8Encoder {
    /// Creates an encoder.
    pub fn new() -> Self {
        Self
    }
}

impl Coder for Utf8Encoder {
    type Input = char;
    type Output = u8;

    fn code(&mut self, input: &[char], output: &mut [u8], _last: bool) -> CoderStep {
        let mut written = 0;
        for (read, c) in input.iter().enumerate() {
            let len = c.len_utf8();
            if output.len() - written < len {
                return CoderStep::new(CoderResult::Overflow, read, written);
            }
            c.encode_utf8(&mut output[written..written + len]);
            written += len;
        }
        CoderStep::new(CoderResult::Underflow, input.len(), written)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete() {
        let mut out = ['\0'; 8];
        let step = Utf8Decoder::new().code("héllo".as_bytes(), &mut out, false);
        assert_eq!(step, CoderStep::new(CoderResult::Underflow, 6, 5));
        assert_eq!(out[..5].iter().collect::<String>(), "héllo");
    }

    #[test]
    fn test_decode_leaves_partial_sequence() {
        let bytes = "aé".as_bytes();
        let mut out = ['\0'; 4];
        let step = Utf8Decoder::new().code(&bytes[..2], &mut out, false);
        assert_eq!(step, CoderStep::new(CoderResult::Underflow, 1, 1));
    }

    #[test]
    fn test_decode_partial_at_end_is_malformed() {
        let bytes = "aé".as_bytes();
        let mut out = ['\0'; 4];
        let step = Utf8Decoder::new().code(&bytes[..2], &mut out, true);
        assert_eq!(step.result, CoderResult::Malformed { length: 1 });
        assert_eq!(step.read, 1);
    }

    #[test]
    fn test_decode_invalid_byte() {
        let mut out = ['\0'; 4];
        let step = Utf8Decoder::new().code(&[b'a', 0xFF, b'b'], &mut out, false);
        assert_eq!(step.result, CoderResult::Malformed { length: 1 });
        assert_eq!((step.read, step.written), (1, 1));
    }

    #[test]
    fn test_decode_overflow() {
        let mut out = ['\0'; 2];
        let step = Utf8Decoder::new().code(b"abc", &mut out, false);
        assert_eq!(step, CoderStep::new(CoderResult::Overflow, 2, 2));
    }

    #[test]
    fn test_encode() {
        let mut out = [0u8; 8];
        let step = Utf8Encoder::new().code(&['h', 'é', '😀'], &mut out, true);
        assert_eq!(step, CoderStep::new(CoderResult::Underflow, 3, 7));
        assert_eq!(&out[..7], "hé😀".as_bytes());
    }

    #[test]
    fn test_encode_overflow_keeps_char_whole() {
        let mut out = [0u8; 4];
        let step = Utf8Encoder::new().code(&['h', '😀'], &mut out, false);
        assert_eq!(step, CoderStep::new(CoderResult::Overflow, 1, 1));
    }
}
