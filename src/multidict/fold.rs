//! Key identity folding.
//!
//! Every lookup first maps the key to its identity, then compares identities. The case-sensitive
//! family uses the key as is. The case-insensitive family title-cases it: the first cased
//! character after an uncased one is title-cased, every cased character following a cased one is
//! lowercased.
//!
//! ```
//! use multidict::title_case;
//!
//! assert_eq!(title_case("content-type"), "Content-Type");
//! assert_eq!(title_case("o'brien"), "O'Brien");
//! assert_eq!(title_case("v1a"), "V1A");
//! ```
use std::borrow::Cow;

use crate::common::ByteStr;
use super::key::AsKey;

/// Folding rule of a multidict family.
///
/// Implemented by [`CaseSensitive`] and [`CaseInsensitive`] only.
#[allow(private_bounds)]
pub trait Fold: Sealed + 'static { }

pub(crate) trait Sealed {
    /// Owner type name.
    const OWNER: &'static str;

    /// Proxy type name.
    const PROXY: &'static str;

    const CASE_INSENSITIVE: bool;

    fn fold(key: &str) -> Cow<'_, str>;

    /// Returns the identity for lookup.
    ///
    /// Already folded keys skip folding in the case-insensitive family.
    fn lookup<K: AsKey>(key: &K) -> Cow<'_, str> {
        match key.as_folded() {
            Some(folded) if Self::CASE_INSENSITIVE => Cow::Borrowed(folded),
            _ => Self::fold(key.as_key_str()),
        }
    }

    /// Returns the identity to be stored alongside `key`.
    ///
    /// When folding does not change the key, the returned identity shares the key buffer.
    fn identity_of(key: &ByteStr) -> ByteStr {
        match Self::fold(key.as_str()) {
            Cow::Borrowed(_) => key.clone(),
            Cow::Owned(identity) => ByteStr::from(identity),
        }
    }
}

/// Keys are compared as is.
#[derive(Debug)]
pub enum CaseSensitive { }

/// Keys are compared by their title-cased form.
#[derive(Debug)]
pub enum CaseInsensitive { }

impl Fold for CaseSensitive { }
impl Sealed for CaseSensitive {
    const OWNER: &'static str = "MultiDict";
    const PROXY: &'static str = "MultiDictProxy";
    const CASE_INSENSITIVE: bool = false;

    #[inline]
    fn fold(key: &str) -> Cow<'_, str> {
        Cow::Borrowed(key)
    }
}

impl Fold for CaseInsensitive { }
impl Sealed for CaseInsensitive {
    const OWNER: &'static str = "CIMultiDict";
    const PROXY: &'static str = "CIMultiDictProxy";
    const CASE_INSENSITIVE: bool = true;

    #[inline]
    fn fold(key: &str) -> Cow<'_, str> {
        title_case(key)
    }
}

// ===== Title Case =====

/// Title-case a key.
///
/// Returns the input unchanged, without allocation, if it is already in title case.
pub fn title_case(key: &str) -> Cow<'_, str> {
    if key.is_ascii() {
        title_case_ascii(key)
    } else {
        let folded = title_case_unicode(key);
        if folded == key {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(folded)
        }
    }
}

const fn fold_ascii(byte: u8, after_cased: bool) -> u8 {
    if after_cased {
        byte.to_ascii_lowercase()
    } else {
        byte.to_ascii_uppercase()
    }
}

fn title_case_ascii(key: &str) -> Cow<'_, str> {
    let bytes = key.as_bytes();
    let mut after_cased = false;
    let mut start = None;

    for (i, &byte) in bytes.iter().enumerate() {
        if fold_ascii(byte, after_cased) != byte {
            start = Some(i);
            break;
        }
        after_cased = byte.is_ascii_alphabetic();
    }

    let Some(start) = start else {
        return Cow::Borrowed(key);
    };

    let mut folded = String::with_capacity(key.len());
    folded.push_str(&key[..start]);
    for &byte in &bytes[start..] {
        folded.push(char::from(fold_ascii(byte, after_cased)));
        after_cased = byte.is_ascii_alphabetic();
    }
    Cow::Owned(folded)
}

fn title_case_unicode(key: &str) -> String {
    let chars = key.chars().collect::<Vec<_>>();
    let mut folded = String::with_capacity(key.len());
    let mut after_cased = false;

    for (i, &ch) in chars.iter().enumerate() {
        if !after_cased {
            push_titlecase(&mut folded, ch);
        } else if ch == 'Σ' {
            folded.push(if is_final_sigma(&chars, i) { 'ς' } else { 'σ' });
        } else {
            folded.extend(ch.to_lowercase());
        }
        after_cased = is_cased(ch);
    }

    folded
}

/// Final sigma: preceded by a cased character and not followed by one, skipping case-ignorable
/// characters in both directions.
fn is_final_sigma(chars: &[char], at: usize) -> bool {
    let mut before = chars[..at].iter().rev().skip_while(|&&ch| is_case_ignorable(ch));
    let mut after = chars[at + 1..].iter().skip_while(|&&ch| is_case_ignorable(ch));
    before.next().is_some_and(|&ch| is_cased(ch)) && !after.next().is_some_and(|&ch| is_cased(ch))
}

fn is_cased(ch: char) -> bool {
    ch.is_lowercase() || ch.is_uppercase() || is_titlecase_letter(ch)
}

/// Unicode `Case_Ignorable` property, restricted to the blocks keys realistically contain:
/// word-internal punctuation, modifier letters and symbols, combining marks and format controls.
const fn is_case_ignorable(ch: char) -> bool {
    matches!(
        ch,
        | '\'' | '.' | ':' | '^' | '`'
        | '\u{00A8}' | '\u{00AD}' | '\u{00AF}' | '\u{00B4}' | '\u{00B7}' | '\u{00B8}'
        | '\u{02B0}'..='\u{036F}'
        | '\u{0374}' | '\u{0375}' | '\u{037A}' | '\u{0384}' | '\u{0385}' | '\u{0387}'
        | '\u{0483}'..='\u{0489}'
        | '\u{0591}'..='\u{05BD}'
        | '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{1FBD}' | '\u{1FBF}'..='\u{1FC1}' | '\u{1FCD}'..='\u{1FCF}'
        | '\u{1FDD}'..='\u{1FDF}' | '\u{1FED}'..='\u{1FEF}' | '\u{1FFD}' | '\u{1FFE}'
        | '\u{200B}'..='\u{200F}'
        | '\u{2018}' | '\u{2019}' | '\u{2024}' | '\u{2027}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'..='\u{2064}'
        | '\u{20D0}'..='\u{20F0}'
        | '\u{FE00}'..='\u{FE0F}'
        | '\u{FE20}'..='\u{FE2F}'
        | '\u{FEFF}'
    )
}

/// Unicode general category `Lt`.
const fn is_titlecase_letter(ch: char) -> bool {
    matches!(
        ch,
        | '\u{01C5}' | '\u{01C8}' | '\u{01CB}' | '\u{01F2}'
        | '\u{1F88}'..='\u{1F8F}'
        | '\u{1F98}'..='\u{1F9F}'
        | '\u{1FA8}'..='\u{1FAF}'
        | '\u{1FBC}' | '\u{1FCC}' | '\u{1FFC}'
    )
}

/// Push the titlecase mapping of `ch`.
///
/// Single character mappings that differ from uppercase are listed explicitly. Multi character
/// uppercase expansions keep their first character and lowercase the rest, which is what
/// `SpecialCasing.txt` titlecase yields for them, except `ŉ`.
fn push_titlecase(out: &mut String, ch: char) {
    let mapped = match ch {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}',
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}',
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}',
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}',
        '\u{1F80}'..='\u{1F87}' | '\u{1F90}'..='\u{1F97}' | '\u{1FA0}'..='\u{1FA7}' => {
            char::from_u32(ch as u32 + 8).unwrap_or(ch)
        }
        '\u{1F88}'..='\u{1F8F}' | '\u{1F98}'..='\u{1F9F}' | '\u{1FA8}'..='\u{1FAF}' => ch,
        '\u{1FB3}' | '\u{1FBC}' => '\u{1FBC}',
        '\u{1FC3}' | '\u{1FCC}' => '\u{1FCC}',
        '\u{1FF3}' | '\u{1FFC}' => '\u{1FFC}',
        '\u{0149}' => {
            out.push_str("\u{02BC}N");
            return;
        }
        _ => {
            let mut upper = ch.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
            }
            for rest in upper {
                out.extend(rest.to_lowercase());
            }
            return;
        }
    };
    out.push(mapped);
}
