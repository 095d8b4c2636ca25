//! The `WIFI:S:<ssid>;T:<auth>;P:<password>;;` join-credentials format
//! understood by phone camera apps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::error::{Field, FieldError, FieldErrors};
use crate::core::models::{Color, PayloadKind, QrPayload};

pub const SSID_REQUIRED: &str = "Network name is required";
pub const PASSWORD_REQUIRED: &str = "Password is required for secured networks";

/// Characters that carry meaning in the payload grammar.
const RESERVED: [char; 5] = ['\\', ';', ',', '"', ':'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Security {
    #[default]
    Wpa,
    Wep,
    NoPassword,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown security type {0:?}, expected WPA, WEP or \"no password\"")]
pub struct ParseSecurityError(pub String);

impl Security {
    /// Value of the `T:` field.
    pub fn code(&self) -> &'static str {
        match self {
            Security::Wpa => "WPA",
            Security::Wep => "WEP",
            Security::NoPassword => "",
        }
    }

    pub fn requires_password(&self) -> bool {
        !matches!(self, Security::NoPassword)
    }
}

impl FromStr for Security {
    type Err = ParseSecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" | "wpa3" => Ok(Security::Wpa),
            "wep" => Ok(Security::Wep),
            "no password" | "nopass" | "none" | "" => Ok(Security::NoPassword),
            _ => Err(ParseSecurityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Security {
    type Error = ParseSecurityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Security> for String {
    fn from(security: Security) -> Self {
        security.to_string()
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Security::NoPassword => f.write_str("no password"),
            other => f.write_str(other.code()),
        }
    }
}

/// How a network authenticates. Secured variants always carry a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WifiInput {
    Open,
    SecuredWpa { password: String },
    SecuredWep { password: String },
}

impl WifiInput {
    pub fn security(&self) -> Security {
        match self {
            WifiInput::Open => Security::NoPassword,
            WifiInput::SecuredWpa { .. } => Security::Wpa,
            WifiInput::SecuredWep { .. } => Security::Wep,
        }
    }

    pub fn password(&self) -> &str {
        match self {
            WifiInput::Open => "",
            WifiInput::SecuredWpa { password } | WifiInput::SecuredWep { password } => password,
        }
    }
}

/// A network's join credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    pub auth: WifiInput,
}

impl WifiNetwork {
    pub fn encode(&self) -> String {
        format!(
            "WIFI:S:{};T:{};P:{};;",
            escape(&self.ssid),
            self.auth.security().code(),
            escape(self.auth.password())
        )
    }

    pub fn parse(data: &str) -> Result<Self, WifiParseError> {
        parse_wifi_payload(data)
    }
}

/// Backslash-prefix every reserved character.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Validate raw form fields and build a WiFi payload.
///
/// Both the SSID and the password are checked on every call, so a form with
/// neither filled in reports both problems at once. Values are embedded
/// untrimmed.
pub fn build_wifi_payload(
    ssid: &str,
    password: &str,
    security: Security,
    foreground: Color,
    background: Color,
) -> Result<QrPayload, FieldErrors> {
    let network = validate_wifi(ssid, password, security)?;
    Ok(QrPayload::new(PayloadKind::Wifi, network.encode(), foreground, background))
}

fn validate_wifi(ssid: &str, password: &str, security: Security) -> Result<WifiNetwork, FieldErrors> {
    let mut errors = FieldErrors::default();

    if ssid.trim().is_empty() {
        errors.push(FieldError::new(Field::Ssid, SSID_REQUIRED));
    }
    if security.requires_password() && password.trim().is_empty() {
        errors.push(FieldError::new(Field::Password, PASSWORD_REQUIRED));
    }
    errors.into_result()?;

    let password = password.to_string();
    let auth = match security {
        Security::Wpa => WifiInput::SecuredWpa { password },
        Security::Wep => WifiInput::SecuredWep { password },
        Security::NoPassword => WifiInput::Open,
    };

    Ok(WifiNetwork {
        ssid: ssid.to_string(),
        auth,
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WifiParseError {
    #[error("payload does not start with WIFI:")]
    MissingPrefix,

    #[error("payload is not terminated with ;;")]
    Unterminated,

    #[error("unexpected data after terminator")]
    TrailingData,

    #[error("escape at end of payload")]
    DanglingEscape,

    #[error("field without a key: {0:?}")]
    MalformedField(String),

    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("unknown security type {0:?}")]
    UnknownSecurity(String),

    #[error("secured network without a password")]
    MissingPassword,
}

/// Parse a `WIFI:` payload back into credentials, undoing escapes.
///
/// Field order is not significant. Unknown keys such as `H:` are skipped.
pub fn parse_wifi_payload(data: &str) -> Result<WifiNetwork, WifiParseError> {
    let body = data.strip_prefix("WIFI:").ok_or(WifiParseError::MissingPrefix)?;

    let mut fields: Vec<(String, String)> = Vec::new();
    let mut key: Option<String> = None;
    let mut value = String::new();
    let mut terminated = false;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next().ok_or(WifiParseError::DanglingEscape)?),
            ':' if key.is_none() => key = Some(std::mem::take(&mut value)),
            ';' => match key.take() {
                Some(k) => fields.push((k, std::mem::take(&mut value))),
                None if value.is_empty() => {
                    terminated = true;
                    break;
                }
                None => return Err(WifiParseError::MalformedField(value)),
            },
            _ => value.push(c),
        }
    }

    if !terminated {
        return Err(WifiParseError::Unterminated);
    }
    if chars.next().is_some() {
        return Err(WifiParseError::TrailingData);
    }

    let lookup = |name: &str| {
        fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };

    let ssid = lookup("S").ok_or(WifiParseError::MissingField("S"))?;
    let code = lookup("T").unwrap_or_default();
    let password = lookup("P").unwrap_or_default();

    let security: Security = code
        .parse()
        .map_err(|_| WifiParseError::UnknownSecurity(code.clone()))?;
    if security.requires_password() && password.is_empty() {
        return Err(WifiParseError::MissingPassword);
    }

    let auth = match security {
        Security::Wpa => WifiInput::SecuredWpa { password },
        Security::Wep => WifiInput::SecuredWep { password },
        Security::NoPassword => WifiInput::Open,
    };

    Ok(WifiNetwork { ssid, auth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn build(ssid: &str, password: &str, security: Security) -> Result<QrPayload, FieldErrors> {
        build_wifi_payload(ssid, password, security, Color::BLACK, Color::WHITE)
    }

    #[test]
    fn test_wpa_network() {
        let payload = build("Cafe", "secret1", Security::Wpa).unwrap();
        assert_eq!(payload.data(), "WIFI:S:Cafe;T:WPA;P:secret1;;");
        assert_eq!(payload.kind(), PayloadKind::Wifi);
    }

    #[test]
    fn test_wep_network() {
        let payload = build("Lab", "abcde", Security::Wep).unwrap();
        assert_eq!(payload.data(), "WIFI:S:Lab;T:WEP;P:abcde;;");
    }

    #[test]
    fn test_open_network_has_empty_code_and_password() {
        let payload = build("HomeNet", "", Security::NoPassword).unwrap();
        assert_eq!(payload.data(), "WIFI:S:HomeNet;T:;P:;;");
    }

    #[test]
    fn test_open_network_ignores_stale_password() {
        let payload = build("HomeNet", "leftover", Security::NoPassword).unwrap();
        assert_eq!(payload.data(), "WIFI:S:HomeNet;T:;P:;;");
    }

    #[test]
    fn test_both_errors_reported_together() {
        let errors = build("", "", Security::Wpa).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Ssid), Some(SSID_REQUIRED));
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_REQUIRED));
    }

    #[rstest]
    #[case(Security::Wpa)]
    #[case(Security::Wep)]
    fn test_whitespace_password_rejected_when_secured(#[case] security: Security) {
        let errors = build("Cafe", "   ", security).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Password), Some(PASSWORD_REQUIRED));
    }

    #[test]
    fn test_whitespace_ssid_rejected() {
        let errors = build(" \t", "", Security::NoPassword).unwrap_err();
        assert_eq!(errors.get(Field::Ssid), Some(SSID_REQUIRED));
        assert_eq!(errors.get(Field::Password), None);
    }

    #[test]
    fn test_values_are_embedded_untrimmed() {
        let payload = build(" Cafe ", " pw ", Security::Wpa).unwrap();
        assert_eq!(payload.data(), "WIFI:S: Cafe ;T:WPA;P: pw ;;");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let payload = build(r#"My;Net,"5G":\"#, r"p;a,s:s", Security::Wpa).unwrap();
        assert_eq!(
            payload.data(),
            r#"WIFI:S:My\;Net\,\"5G\"\:\\;T:WPA;P:p\;a\,s\:s;;"#
        );
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape("plain text 123"), "plain text 123");
        assert_eq!(escape(""), "");
    }

    #[rstest]
    #[case("WPA", Security::Wpa)]
    #[case("wpa", Security::Wpa)]
    #[case("WEP", Security::Wep)]
    #[case("no password", Security::NoPassword)]
    #[case("nopass", Security::NoPassword)]
    #[case("", Security::NoPassword)]
    fn test_security_parses(#[case] input: &str, #[case] expected: Security) {
        assert_eq!(input.parse::<Security>().unwrap(), expected);
    }

    #[test]
    fn test_security_rejects_unknown() {
        assert!("WPA-EAP".parse::<Security>().is_err());
    }

    #[test]
    fn test_parse_round_trip_with_escapes() {
        let network = WifiNetwork {
            ssid: r#"a;b,c"d:e\f"#.to_string(),
            auth: WifiInput::SecuredWep {
                password: "p;w".to_string(),
            },
        };
        assert_eq!(parse_wifi_payload(&network.encode()).unwrap(), network);
    }

    #[test]
    fn test_parse_accepts_other_field_orders_and_hidden_flag() {
        let network = parse_wifi_payload("WIFI:T:WPA;P:pw;S:Net;H:true;;").unwrap();
        assert_eq!(network.ssid, "Net");
        assert_eq!(network.auth.security(), Security::Wpa);
        assert_eq!(network.auth.password(), "pw");
    }

    #[test]
    fn test_parse_open_network() {
        let network = parse_wifi_payload("WIFI:S:HomeNet;T:;P:;;").unwrap();
        assert_eq!(network.auth, WifiInput::Open);
    }

    #[rstest]
    #[case("S:Net;;", WifiParseError::MissingPrefix)]
    #[case("WIFI:S:Net;T:WPA;P:pw;", WifiParseError::Unterminated)]
    #[case("WIFI:S:Net;;extra", WifiParseError::TrailingData)]
    #[case("WIFI:S:Net\\", WifiParseError::DanglingEscape)]
    #[case("WIFI:T:WPA;P:pw;;", WifiParseError::MissingField("S"))]
    #[case("WIFI:S:Net;T:WPA;P:;;", WifiParseError::MissingPassword)]
    #[case("WIFI:S:Net;T:SAE;P:pw;;", WifiParseError::UnknownSecurity("SAE".to_string()))]
    #[case("WIFI:junk;;", WifiParseError::MalformedField("junk".to_string()))]
    fn test_parse_errors(#[case] input: &str, #[case] expected: WifiParseError) {
        assert_eq!(parse_wifi_payload(input).unwrap_err(), expected);
    }
}
