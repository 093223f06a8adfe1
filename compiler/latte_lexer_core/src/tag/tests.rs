use super::*;

#[test]
fn repr_u8_semantic_ranges() {
    assert_eq!(RawTag::Text as u8, 0);
    assert_eq!(RawTag::Comment as u8, 1);
    assert_eq!(RawTag::MacroStart as u8, 16);
    assert_eq!(RawTag::MacroWhitespace as u8, 20);
    assert_eq!(RawTag::AttributeName as u8, 32);
    assert_eq!(RawTag::AttributeEnd as u8, 35);
    assert_eq!(RawTag::InvalidMacroName as u8, 240);
    assert_eq!(RawTag::UnclosedAttributeQuotes as u8, 242);
}

#[test]
fn tag_is_one_byte() {
    assert_eq!(std::mem::size_of::<RawTag>(), 1);
}

#[test]
fn raw_token_is_compact() {
    assert!(std::mem::size_of::<RawToken>() <= 8);
}

#[test]
fn error_tags() {
    assert!(RawTag::InvalidMacroName.is_error());
    assert!(RawTag::InvalidAttributeSyntax.is_error());
    assert!(RawTag::UnclosedAttributeQuotes.is_error());
    assert!(!RawTag::MacroEnd.is_error());
}
