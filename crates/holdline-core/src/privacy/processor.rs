use crate::domain::phone::{clean_digits, trailing_digits};
use crate::privacy::key::PhoneHashKey;
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_JOIN_KEY: &str = "anonymous";
pub const ANONYMOUS_DISPLAY: &str = "Anonymous";
pub const UNKNOWN_DISPLAY: &str = "Unknown";

const JOIN_KEY_BYTES: usize = 8;
const LONG_FORM_DIGITS: usize = 10;
const SHORT_FORM_MIN_DIGITS: usize = 7;
const AREA_CODE_DIGITS: usize = 3;
const LONG_FORM_SUFFIX_BYTES: usize = 2;
const SHORT_FORM_BYTES: usize = 3;

/// The only caller data that crosses the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberData {
    pub join_key: String,
    pub display_format: String,
    pub area_code: Option<String>,
}

impl PhoneNumberData {
    pub fn anonymous() -> Self {
        Self {
            join_key: ANONYMOUS_JOIN_KEY.to_string(),
            display_format: ANONYMOUS_DISPLAY.to_string(),
            area_code: None,
        }
    }
}

/// How a caller number is shown, chosen by the length of its digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayForm {
    /// No number was supplied.
    Anonymous,
    /// Ten or more digits: clear area code plus a masked local part.
    LongForm {
        area_code: String,
        masked_suffix: String,
    },
    /// Seven to nine digits: the whole number masked.
    ShortForm { masked: String },
    /// Fewer than seven digits.
    TooShort,
}

impl DisplayForm {
    pub fn area_code(&self) -> Option<&str> {
        match self {
            DisplayForm::LongForm { area_code, .. } => Some(area_code),
            DisplayForm::Anonymous | DisplayForm::ShortForm { .. } | DisplayForm::TooShort => None,
        }
    }

    pub fn render(&self) -> String {
        match self {
            DisplayForm::Anonymous => ANONYMOUS_DISPLAY.to_string(),
            DisplayForm::LongForm {
                area_code,
                masked_suffix,
            } => format!("({area_code}) {masked_suffix}"),
            DisplayForm::ShortForm { masked } => masked.clone(),
            DisplayForm::TooShort => UNKNOWN_DISPLAY.to_string(),
        }
    }
}

/// Turns raw caller numbers into [`PhoneNumberData`].
///
/// The join key hashes the raw string as received, punctuation included,
/// while the display hashes only normalized digits. Two spellings of the same
/// number therefore share a display but not a join key.
#[derive(Debug, Clone)]
pub struct PhoneNumberProcessor {
    key: PhoneHashKey,
}

impl PhoneNumberProcessor {
    pub fn new(key: PhoneHashKey) -> Self {
        Self { key }
    }

    pub fn process(&self, raw: Option<&str>) -> PhoneNumberData {
        let raw = match raw {
            Some(value) if !value.is_empty() => value,
            _ => return PhoneNumberData::anonymous(),
        };

        let form = self.display_form(raw);
        PhoneNumberData {
            join_key: self.join_key(raw),
            display_format: form.render(),
            area_code: form.area_code().map(str::to_string),
        }
    }

    pub fn classify(&self, raw: Option<&str>) -> DisplayForm {
        match raw {
            Some(value) if !value.is_empty() => self.display_form(value),
            _ => DisplayForm::Anonymous,
        }
    }

    fn join_key(&self, raw: &str) -> String {
        self.key.digest_hex(raw, JOIN_KEY_BYTES)
    }

    fn display_form(&self, raw: &str) -> DisplayForm {
        let cleaned = clean_digits(raw);

        if cleaned.len() >= LONG_FORM_DIGITS {
            let last10 = trailing_digits(&cleaned, LONG_FORM_DIGITS);
            let (area_code, local) = last10.split_at(AREA_CODE_DIGITS);
            return DisplayForm::LongForm {
                area_code: area_code.to_string(),
                masked_suffix: self
                    .key
                    .digest_hex(local, LONG_FORM_SUFFIX_BYTES)
                    .to_ascii_uppercase(),
            };
        }

        if cleaned.len() >= SHORT_FORM_MIN_DIGITS {
            return DisplayForm::ShortForm {
                masked: self
                    .key
                    .digest_hex(&cleaned, SHORT_FORM_BYTES)
                    .to_ascii_uppercase(),
            };
        }

        DisplayForm::TooShort
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayForm, PhoneNumberData, PhoneNumberProcessor};
    use crate::domain::phone::clean_digits;
    use crate::privacy::PhoneHashKey;

    fn processor(secret: &str) -> PhoneNumberProcessor {
        PhoneNumberProcessor::new(PhoneHashKey::new(secret).expect("key"))
    }

    fn is_join_key(value: &str) -> bool {
        value.len() == 16
            && value
                .chars()
                .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
    }

    fn is_upper_hex(value: &str) -> bool {
        value
            .chars()
            .all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch))
    }

    #[test]
    fn missing_number_is_anonymous() {
        let p = processor("k");
        assert_eq!(p.process(None), PhoneNumberData::anonymous());
        assert_eq!(p.process(Some("")), PhoneNumberData::anonymous());
        assert_eq!(p.classify(None), DisplayForm::Anonymous);

        let data = p.process(None);
        assert_eq!(data.join_key, "anonymous");
        assert_eq!(data.display_format, "Anonymous");
        assert!(data.area_code.is_none());
    }

    #[test]
    fn international_number_uses_long_form() {
        let data = processor("k").process(Some("+19129127264"));
        assert_eq!(data.join_key, "967933827a5d76fd");
        assert_eq!(data.area_code.as_deref(), Some("912"));
        assert_eq!(data.display_format, "(912) 2F6E");
    }

    #[test]
    fn long_form_is_stable_across_calls() {
        let p = processor("k");
        let first = p.process(Some("+19129127264"));
        for _ in 0..5 {
            assert_eq!(p.process(Some("+19129127264")), first);
        }
        let suffix = first.display_format.strip_prefix("(912) ").expect("prefix");
        assert_eq!(suffix.len(), 4);
        assert!(is_upper_hex(suffix));
    }

    #[test]
    fn long_form_keeps_last_ten_digits() {
        let data = processor("k").process(Some("+442071838750"));
        assert_eq!(data.area_code.as_deref(), Some("207"));
        assert_eq!(data.display_format, "(207) 731D");
    }

    #[test]
    fn seven_digit_number_uses_short_form() {
        let data = processor("k").process(Some("5551234"));
        assert!(data.area_code.is_none());
        assert_eq!(data.display_format.len(), 6);
        assert!(is_upper_hex(&data.display_format));
        assert_eq!(data.display_format, "D8BA7F");
    }

    #[test]
    fn short_form_shares_prefix_with_join_key_when_raw_is_all_digits() {
        // Both hashes see the same input string when there is no punctuation.
        let data = processor("k").process(Some("5551234"));
        assert_eq!(data.join_key, "d8ba7f0248735eee");
        assert_eq!(
            data.display_format,
            data.join_key[..6].to_ascii_uppercase()
        );
    }

    #[test]
    fn too_short_number_is_unknown_but_keyed() {
        let data = processor("k").process(Some("123"));
        assert_eq!(data.display_format, "Unknown");
        assert!(data.area_code.is_none());
        assert_eq!(data.join_key, "54536c9357ebad32");
        assert!(is_join_key(&data.join_key));
    }

    #[test]
    fn digit_count_boundaries_pick_display_form() {
        let p = processor("k");

        let six = p.process(Some("123456"));
        assert_eq!(six.display_format, "Unknown");
        assert_eq!(six.join_key, "0f6259fcb7c4270e");
        assert_eq!(p.classify(Some("123456")), DisplayForm::TooShort);

        let nine = p.process(Some("123456789"));
        assert_eq!(nine.display_format, "14F519");
        assert!(nine.area_code.is_none());
        assert!(matches!(
            p.classify(Some("123456789")),
            DisplayForm::ShortForm { .. }
        ));

        let ten = p.process(Some("1234567890"));
        assert_eq!(ten.display_format, "(123) F545");
        assert_eq!(ten.area_code.as_deref(), Some("123"));
    }

    #[test]
    fn punctuated_short_number_keeps_display_but_not_join_key() {
        let p = processor("k");
        let plain = p.process(Some("123456789"));
        let punctuated = p.process(Some("+1 (23) 456-789"));

        assert_eq!(punctuated.display_format, "14F519");
        assert_eq!(punctuated.display_format, plain.display_format);
        assert_eq!(plain.join_key, "14f519a380338c7d");
        assert_eq!(punctuated.join_key, "cf59c8b1cf0b9446");
    }

    #[test]
    fn non_numeric_input_degrades_to_unknown() {
        let p = processor("k");
        let data = p.process(Some("anonymous"));
        assert_eq!(data.display_format, "Unknown");
        assert_eq!(data.join_key, "f8fd204a586e6bde");
        assert_eq!(p.classify(Some("anonymous")), DisplayForm::TooShort);
    }

    #[test]
    fn pathologically_long_input_is_handled() {
        let raw = "9".repeat(10_000);
        let data = processor("k").process(Some(&raw));
        assert_eq!(data.join_key, "2081873215b03ef9");
        assert_eq!(data.area_code.as_deref(), Some("999"));
        assert_eq!(data.display_format, "(999) DD47");
    }

    #[test]
    fn join_key_depends_on_secret() {
        let a = processor("k").process(Some("+19129127264"));
        let b = processor("other").process(Some("+19129127264"));
        assert_ne!(a.join_key, b.join_key);
        assert_eq!(b.join_key, "388460673fc2827e");
        assert_eq!(b.display_format, "(912) ABB5");
    }

    #[test]
    fn formatting_variants_diverge_in_join_key_only() {
        // The join key hashes the raw string, so punctuation changes it; the
        // display hashes normalized digits and does not change.
        let p = processor("k");
        let dashed = p.process(Some("912-912-7264"));
        let plain = p.process(Some("9129127264"));

        assert_eq!(dashed.join_key, "69154cafc5bede4d");
        assert_eq!(plain.join_key, "c30ab175c64043f9");
        assert_ne!(dashed.join_key, plain.join_key);

        assert_eq!(dashed.display_format, "(912) 2F6E");
        assert_eq!(dashed.display_format, plain.display_format);
        assert_eq!(dashed.area_code, plain.area_code);
        assert!(matches!(
            p.classify(Some("912-912-7264")),
            DisplayForm::LongForm { .. }
        ));
    }

    #[test]
    fn join_key_is_always_sixteen_lowercase_hex() {
        let p = processor("k");
        for raw in ["+19129127264", "5551234", "123", "x", " ", "(415) 555-1212"] {
            let data = p.process(Some(raw));
            assert!(is_join_key(&data.join_key), "{raw}: {}", data.join_key);
            assert!(!raw.contains(&data.join_key));
        }
    }

    #[test]
    fn display_never_leaks_four_consecutive_digits() {
        let p = processor("k");
        for raw in [
            "+19129127264",
            "912-912-7264",
            "(415) 555-1212",
            "+442071838750",
            "5551234",
            "12345678",
            "123",
        ] {
            let cleaned = clean_digits(raw);
            let display = p.process(Some(raw)).display_format;
            if cleaned.len() < 4 {
                continue;
            }
            for start in 0..=cleaned.len() - 4 {
                let window = &cleaned[start..start + 4];
                assert!(
                    !display.contains(window),
                    "{raw}: display {display} leaks {window}"
                );
            }
        }
    }

    #[test]
    fn processor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PhoneNumberProcessor>();
    }

    #[test]
    fn display_form_render_matches_variants() {
        let long = DisplayForm::LongForm {
            area_code: "415".to_string(),
            masked_suffix: "92A0".to_string(),
        };
        assert_eq!(long.render(), "(415) 92A0");
        assert_eq!(long.area_code(), Some("415"));
        assert_eq!(DisplayForm::TooShort.render(), "Unknown");
        assert_eq!(DisplayForm::Anonymous.render(), "Anonymous");
        assert_eq!(
            DisplayForm::ShortForm {
                masked: "C7ACD2".to_string()
            }
            .render(),
            "C7ACD2"
        );
    }
}
