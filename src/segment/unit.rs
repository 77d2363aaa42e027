//! Pipeline element types.

use std::fmt::Debug;

/// The element a pipeline moves around: a byte or a character.
///
/// Implemented for `u8` and `char`. Every buffer, segment and transformer in
/// the crate is generic over this trait, so the byte and character variants
/// share one implementation.
pub trait Unit: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Human-readable unit name used in log events.
    const NAME: &'static str;
}

impl Unit for u8 {
    const NAME: &'static str = "byte";
}

impl Unit for char {
    const NAME: &'static str = "char";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(u8::default(), 0);
        assert_eq!(char::default(), '\0');
        assert_eq!(<u8 as Unit>::NAME, "byte");
        assert_eq!(<char as Unit>::NAME, "char");
    }
}
