//! Coders for any WHATWG encoding, backed by `encoding_rs`.
//!
//! `encoding_rs` keeps the bytes of an incomplete multi-byte sequence inside
//! its decoder. [`CharsetDecoder`] feeds it byte by byte and hands such bytes
//! back as unconsumed input instead, so the decoder is stateless between
//! calls and a [`CodecReader`](super::CodecReader) can mark and reset it.
//!
//! ISO-2022-JP carries a shift state across characters. Its coders report
//! [`Coder::holds_state`], and a reader over them cannot be marked.

use encoding_rs::{DecoderResult, EncoderResult, Encoding, ISO_2022_JP};

use super::{Coder, CoderResult, CoderStep};
use crate::error::{PipeError, Result};

fn lookup(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or(PipeError::InvalidConfig {
        message: "unknown encoding label",
    })
}

/// Decodes bytes in any supported encoding into chars.
///
/// # Example
///
/// ```
/// use segpipe::{CharsetDecoder, Coder, CoderResult};
///
/// let mut decoder = CharsetDecoder::for_label("windows-1252")?;
/// let mut out = ['\0'; 4];
/// let step = decoder.code(&[0x63, 0x61, 0x66, 0xE9], &mut out, true);
/// assert_eq!(step.result, CoderResult::Underflow);
/// assert_eq!(out.iter().collect::<String>(), "café");
/// # Ok::<(), segpipe::PipeError>(())
/// ```
pub struct CharsetDecoder {
    encoding: &'static Encoding,
    inner: encoding_rs::Decoder,
    scratch: Vec<u16>,
    finished: bool,
}

impl CharsetDecoder {
    /// Creates a decoder for `encoding`. Byte order marks are not sniffed.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            inner: encoding.new_decoder_without_bom_handling(),
            scratch: Vec::new(),
            finished: false,
        }
    }

    /// Creates a decoder for a WHATWG label such as `"shift_jis"`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] for an unknown label.
    pub fn for_label(label: &str) -> Result<Self> {
        Ok(Self::new(lookup(label)?))
    }

    /// Returns the encoding being decoded.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl std::fmt::Debug for CharsetDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharsetDecoder")
            .field("encoding", &self.encoding.name())
            .field("finished", &self.finished)
            .finish()
    }
}

impl CharsetDecoder {
    /// Runs `encoding_rs` once, converting its UTF-16 output into `output`.
    fn decode_step(&mut self, input: &[u8], output: &mut [char], last: bool) -> (DecoderResult, usize, usize) {
        if self.scratch.len() < output.len() {
            self.scratch.resize(output.len(), 0);
        }
        let (result, read, units) = self.inner.decode_to_utf16_without_replacement(
            input,
            &mut self.scratch[..output.len()],
            last,
        );

        // Surrogate pairs are never split and units <= output.len(), so every char fits.
        let mut written = 0;
        for c in char::decode_utf16(self.scratch[..units].iter().copied()) {
            match c {
                Ok(c) => {
                    output[written] = c;
                    written += 1;
                }
                Err(_) => return (DecoderResult::Malformed(0, 0), read, written),
            }
        }
        (result, read, written)
    }

    /// Decodes everything in one call, leaving partial sequences inside
    /// `encoding_rs`. Used for encodings with shift state.
    fn code_bulk(&mut self, input: &[u8], output: &mut [char], last: bool) -> CoderStep {
        let (result, read, written) = self.decode_step(input, output, last);
        if last && result == DecoderResult::InputEmpty {
            self.finished = true;
        }
        CoderStep::new(map_decoder_result(result), read, written)
    }
}

fn map_decoder_result(result: DecoderResult) -> CoderResult {
    match result {
        DecoderResult::InputEmpty => CoderResult::Underflow,
        DecoderResult::OutputFull => CoderResult::Overflow,
        DecoderResult::Malformed(length, _) => CoderResult::Malformed {
            length: usize::from(length).max(1),
        },
    }
}

impl Coder for CharsetDecoder {
    type Input = u8;
    type Output = char;

    /// Feeds `encoding_rs` one byte at a time so that the bytes of an
    /// incomplete trailing sequence are reported as unconsumed. Between
    /// calls the decoder is back in its initial state, which lets a
    /// [`CodecReader`](super::CodecReader) snapshot it through its buffers.
    fn code(&mut self, input: &[u8], output: &mut [char], last: bool) -> CoderStep {
        if self.finished {
            // encoding_rs decoders must not be reused after the final call.
            self.reset();
        }
        if self.holds_state() {
            return self.code_bulk(input, output, last);
        }

        let mut fed = 0;
        let mut boundary = 0;
        let mut written = 0;
        let mut result = CoderResult::Underflow;
        while fed < input.len() {
            if written == output.len() {
                result = CoderResult::Overflow;
                break;
            }
            let (step, read, produced) =
                self.decode_step(&input[fed..fed + 1], &mut output[written..], false);
            fed += read;
            written += produced;
            match step {
                DecoderResult::InputEmpty => {
                    if produced > 0 {
                        boundary = fed;
                    }
                }
                DecoderResult::OutputFull => {
                    result = CoderResult::Overflow;
                    break;
                }
                malformed => {
                    self.reset();
                    return CoderStep::new(map_decoder_result(malformed), boundary, written);
                }
            }
        }

        if result == CoderResult::Underflow && last {
            // Flushes a pending partial sequence as malformed.
            let (step, _, produced) = self.decode_step(&[], &mut output[written..], true);
            written += produced;
            self.finished = step == DecoderResult::InputEmpty;
            if !self.finished {
                self.reset();
                return CoderStep::new(map_decoder_result(step), boundary, written);
            }
            return CoderStep::new(CoderResult::Underflow, fed, written);
        }

        if fed > boundary {
            // Hand the partial sequence back to the caller.
            self.reset();
        }
        CoderStep::new(result, boundary, written)
    }

    fn holds_state(&self) -> bool {
        self.encoding == ISO_2022_JP
    }

    fn reset(&mut self) {
        self.inner = self.encoding.new_decoder_without_bom_handling();
        self.finished = false;
    }
}

/// Encodes chars into bytes of any supported output encoding.
///
/// `encoding_rs` cannot produce UTF-16; those labels encode to UTF-8.
pub struct CharsetEncoder {
    encoding: &'static Encoding,
    inner: encoding_rs::Encoder,
    scratch: String,
}

impl CharsetEncoder {
    /// Creates an encoder for `encoding`.
    pub fn new(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            inner: encoding.new_encoder(),
            scratch: String::new(),
        }
    }

    /// Creates an encoder for a WHATWG label such as `"iso-8859-2"`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::InvalidConfig`] for an unknown label.
    pub fn for_label(label: &str) -> Result<Self> {
        Ok(Self::new(lookup(label)?))
    }

    /// Returns the encoding bytes are produced in.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding.output_encoding()
    }
}

impl std::fmt::Debug for CharsetEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharsetEncoder")
            .field("encoding", &self.encoding.name())
            .finish()
    }
}

impl Coder for CharsetEncoder {
    type Input = char;
    type Output = u8;

    fn code(&mut self, input: &[char], output: &mut [u8], last: bool) -> CoderStep {
        self.scratch.clear();
        self.scratch.extend(input);

        let (result, read_bytes, written) =
            self.inner
                .encode_from_utf8_without_replacement(&self.scratch, output, last);
        let read = self
            .scratch
            .get(..read_bytes)
            .map_or(0, |consumed| consumed.chars().count());

        let result = match result {
            EncoderResult::InputEmpty => CoderResult::Underflow,
            EncoderResult::OutputFull => CoderResult::Overflow,
            EncoderResult::Unmappable(_) => CoderResult::Unmappable { length: 1 },
        };
        CoderStep::new(result, read, written)
    }

    fn reset(&mut self) {
        self.inner = self.encoding.new_encoder();
    }

    fn holds_state(&self) -> bool {
        self.encoding == ISO_2022_JP
    }
}
