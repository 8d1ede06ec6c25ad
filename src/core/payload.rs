use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Country code prefixed to numbers that do not start with `+`.
pub const DEFAULT_COUNTRY_CODE: &str = "+90";

/// Which text the QR code carries.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum PayloadMode {
    /// `tel:` URI, opens the dialer on most phone cameras
    #[default]
    Tel,
    /// vCard 2.1 contact record
    VCard,
    /// MECARD contact record
    MeCard,
}

impl FromStr for PayloadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tel" => Ok(PayloadMode::Tel),
            "vcard" => Ok(PayloadMode::VCard),
            "mecard" => Ok(PayloadMode::MeCard),
            other => Err(format!("unknown QR payload mode: {}", other)),
        }
    }
}

impl From<String> for PayloadMode {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|e| {
            tracing::warn!("{}, falling back to tel", e);
            PayloadMode::Tel
        })
    }
}

impl fmt::Display for PayloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadMode::Tel => "tel",
            PayloadMode::VCard => "vcard",
            PayloadMode::MeCard => "mecard",
        };
        f.write_str(name)
    }
}

/// Builds QR payload text from a contact.
#[derive(Debug, Clone)]
pub struct PayloadEncoder {
    mode: PayloadMode,
    country_code: String,
}

impl PayloadEncoder {
    pub fn new(mode: PayloadMode) -> Self {
        Self {
            mode,
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    pub fn mode(&self) -> PayloadMode {
        self.mode
    }

    pub fn encode(&self, name: &str, phone: &str) -> String {
        let phone = normalize_phone_with(phone, &self.country_code);
        match self.mode {
            PayloadMode::Tel => format!("tel:{}", phone),
            PayloadMode::VCard => build_vcard(name, &phone),
            PayloadMode::MeCard => format!("MECARD:N:{};TEL:{};;", name, phone),
        }
    }
}

/// Encode with the default country code.
pub fn encode(name: &str, phone: &str, mode: PayloadMode) -> String {
    PayloadEncoder::new(mode).encode(name, phone)
}

/// Normalize to an E.164-like number using [`DEFAULT_COUNTRY_CODE`].
pub fn normalize_phone(raw: &str) -> String {
    normalize_phone_with(raw, DEFAULT_COUNTRY_CODE)
}

/// Keeps only digits and `+`. Numbers that already start with `+` are
/// returned as-is; anything else loses its leading zeros and gets
/// `country_code` in front.
pub fn normalize_phone_with(raw: &str, country_code: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if filtered.starts_with('+') {
        return filtered;
    }

    format!("{}{}", country_code, filtered.trim_start_matches('0'))
}

// vCard 2.1 with CRLF and explicit charset reads reliably on Android scanners.
fn build_vcard(name: &str, phone: &str) -> String {
    const CRLF: &str = "\r\n";
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:2.1".to_string(),
        format!("N;CHARSET=UTF-8:;{};;;", name),
        format!("FN;CHARSET=UTF-8:{}", name),
        format!("TEL;CELL:{}", phone),
        "END:VCARD".to_string(),
    ]
    .iter()
    .map(|line| format!("{}{}", line, CRLF))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_number() {
        assert_eq!(normalize_phone("0532 123 45 67"), "+905321234567");
        assert_eq!(normalize_phone("05321234567"), "+905321234567");
    }

    #[test]
    fn test_normalize_international_number() {
        assert_eq!(normalize_phone("+1 555 0100"), "+15550100");
        assert_eq!(normalize_phone("+90 (532) 123-45-67"), "+905321234567");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["0532 123 45 67", "+1 555 0100", "5321234567", "000123"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }

    #[test]
    fn test_custom_country_code() {
        assert_eq!(normalize_phone_with("030 1234567", "+49"), "+49301234567");
    }

    #[test]
    fn test_tel_payload() {
        assert_eq!(
            encode("Ahmet Yılmaz", "05321234567", PayloadMode::Tel),
            "tel:+905321234567"
        );
    }

    #[test]
    fn test_vcard_payload() {
        let vcard = encode("Ahmet Yılmaz", "0532 123 45 67", PayloadMode::VCard);
        assert_eq!(
            vcard,
            "BEGIN:VCARD\r\nVERSION:2.1\r\nN;CHARSET=UTF-8:;Ahmet Yılmaz;;;\r\n\
             FN;CHARSET=UTF-8:Ahmet Yılmaz\r\nTEL;CELL:+905321234567\r\nEND:VCARD\r\n"
        );
    }

    #[test]
    fn test_mecard_payload() {
        assert_eq!(
            encode("Ayşe", "+44 20 7946 0958", PayloadMode::MeCard),
            "MECARD:N:Ayşe;TEL:+442079460958;;"
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(" VCard ".parse::<PayloadMode>(), Ok(PayloadMode::VCard));
        assert_eq!("mecard".parse::<PayloadMode>(), Ok(PayloadMode::MeCard));
        assert!("sms".parse::<PayloadMode>().is_err());
        assert_eq!(PayloadMode::from("sms".to_string()), PayloadMode::Tel);
        assert_eq!(PayloadMode::from("MECARD".to_string()), PayloadMode::MeCard);
    }
}
