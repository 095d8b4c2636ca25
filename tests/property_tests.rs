use proptest::prelude::*;
use qrforge::payload::wifi::{escape, parse_wifi_payload, WifiInput, WifiNetwork};
use qrforge::{build_url_payload, build_wifi_payload, Color, Security};

fn security() -> impl Strategy<Value = Security> {
    prop_oneof![
        Just(Security::Wpa),
        Just(Security::Wep),
        Just(Security::NoPassword),
    ]
}

proptest! {
    #[test]
    fn test_explicit_scheme_is_preserved(
        scheme in "[a-zA-Z]{1,8}",
        host in "[a-z0-9]{1,20}\\.[a-z]{2,6}",
        path in "(/[a-z0-9]{0,10}){0,3}"
    ) {
        let raw = format!("{}://{}{}", scheme, host, path);
        let payload = build_url_payload(&raw, Color::BLACK, Color::WHITE).unwrap();
        let scheme_prefix = format!("{}://", scheme);
        prop_assert!(payload.data().starts_with(&scheme_prefix));
        prop_assert_eq!(payload.data(), raw.as_str());
    }
}

proptest! {
    #[test]
    fn test_missing_scheme_gets_https(
        host in "[a-z0-9]{1,20}\\.[a-z]{2,6}",
        path in "(/[a-z0-9]{0,10}){0,3}"
    ) {
        let raw = format!("{}{}", host, path);
        let payload = build_url_payload(&raw, Color::BLACK, Color::WHITE).unwrap();
        prop_assert_eq!(payload.data(), format!("https://{}", raw));
    }
}

proptest! {
    #[test]
    fn test_url_build_is_idempotent(raw in ".{0,60}") {
        let first = build_url_payload(&raw, Color::BLACK, Color::WHITE);
        let second = build_url_payload(&raw, Color::BLACK, Color::WHITE);
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn test_wifi_build_is_idempotent(
        ssid in ".{0,32}",
        password in ".{0,63}",
        security in security()
    ) {
        let first = build_wifi_payload(&ssid, &password, security, Color::BLACK, Color::WHITE);
        let second = build_wifi_payload(&ssid, &password, security, Color::BLACK, Color::WHITE);
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn test_wifi_payload_round_trips(
        ssid in ".{1,32}",
        password in ".{1,63}",
        security in security()
    ) {
        prop_assume!(!ssid.trim().is_empty());
        prop_assume!(!password.trim().is_empty());

        let payload = build_wifi_payload(&ssid, &password, security, Color::BLACK, Color::WHITE).unwrap();
        let network = parse_wifi_payload(payload.data()).unwrap();

        prop_assert_eq!(&network.ssid, &ssid);
        prop_assert_eq!(network.auth.security(), security);
        if security == Security::NoPassword {
            prop_assert_eq!(network.auth, WifiInput::Open);
        } else {
            prop_assert_eq!(network.auth.password(), password.as_str());
        }
    }
}

proptest! {
    #[test]
    fn test_reserved_characters_never_appear_unescaped(
        value in "[a-z;,\":\\\\]{0,40}"
    ) {
        let escaped = escape(&value);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let next = chars.next();
                prop_assert!(matches!(next, Some('\\' | ';' | ',' | '"' | ':')));
            } else {
                prop_assert!(!matches!(c, ';' | ',' | '"' | ':'));
            }
        }
    }
}

proptest! {
    #[test]
    fn test_network_encode_parse_inverse(
        ssid in "[ -~]{0,32}",
        password in "[ -~]{1,63}",
        wep in any::<bool>()
    ) {
        let auth = if wep {
            WifiInput::SecuredWep { password }
        } else {
            WifiInput::SecuredWpa { password }
        };
        let network = WifiNetwork { ssid, auth };
        prop_assert_eq!(WifiNetwork::parse(&network.encode()).unwrap(), network);
    }
}

proptest! {
    #[test]
    fn test_color_display_parses_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Color::rgb(r, g, b);
        prop_assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }
}
