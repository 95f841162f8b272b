use otpkeep_totp::totp::core::{generate_totp_at, progress_at, time_remaining_at};
use otpkeep_totp::totp::uri::build_otpauth_uri;
use otpkeep_totp::totp::{
    extract_key_data, parse_otpauth_uri, validate_secret, InvalidReason, KeyData, TotpGenerator,
    TotpSettings,
};

const T: u64 = 1_700_000_000;

fn code_for(input: &str) -> String {
    let secret = validate_secret(input).into_result().unwrap();
    generate_totp_at(&secret, 30, 6, T).unwrap()
}

#[test]
fn plain_secret_to_code() {
    let result = validate_secret("jbsw y3dp ehpk 3pxp");
    let secret = result.secret().unwrap();
    assert_eq!(secret.as_str(), "JBSWY3DPEHPK3PXP");

    let code = TotpGenerator::new().generate(secret).unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn uri_to_code() {
    let uri = "otpauth://totp/Google:user@example.com?secret=JBSWY3DPEHPK3PXP&issuer=Google";

    let record = parse_otpauth_uri(uri).unwrap();
    assert_eq!(record.display_label, "Google (user@example.com)");

    let validated = validate_secret(uri).into_result().unwrap();
    assert_eq!(validated, record.secret);
    assert_eq!(code_for(uri), generate_totp_at(&record.secret, 30, 6, T).unwrap());
}

#[test]
fn all_input_shapes_give_the_same_code() {
    let inputs = [
        "JBSWY3DPEHPK3PXP",
        "jbswy3dpehpk3pxp",
        "JBSW Y3DP EHPK 3PXP",
        "jbsw y3dp ehpk 3pxp",
        "otpauth://totp/Test?secret=JBSWY3DPEHPK3PXP",
    ];
    let first = code_for(inputs[0]);
    for input in &inputs[1..] {
        assert_eq!(code_for(input), first, "{}", input);
    }
}

#[test]
fn rejected_inputs_never_yield_a_secret() {
    for (input, reason) in [
        ("", InvalidReason::Empty),
        ("ABC", InvalidReason::TooShort),
        ("not base32!", InvalidReason::BadAlphabet),
        ("https://example.com/?secret=JBSWY3DPEHPK3PXP", InvalidReason::BadAlphabet),
        ("otpauth://hotp/x?secret=JBSWY3DPEHPK3PXP", InvalidReason::InvalidUri),
    ] {
        let result = validate_secret(input);
        assert!(result.secret().is_none(), "{}", input);
        assert_eq!(result.reason(), Some(reason), "{}", input);
    }
}

#[test]
fn parser_rejects_foreign_uris_outright() {
    assert!(parse_otpauth_uri("https://totp/x?secret=JBSWY3DPEHPK3PXP").is_err());
    assert!(parse_otpauth_uri("otpauth://hotp/x?secret=JBSWY3DPEHPK3PXP").is_err());
}

#[test]
fn extracted_key_data_roundtrips_through_uri() {
    let data = extract_key_data("otpauth://totp/ACME%20Co:jane?secret=mzxw6ytboi%3D%3D%3D%3D%3D%3D").unwrap();
    assert_eq!(data.secret.as_str(), "MZXW6YTBOI======");
    assert_eq!(data.remark.as_deref(), Some("ACME Co (jane)"));

    let uri = build_otpauth_uri(&data.secret, Some("ACME Co"), "jane");
    let again = extract_key_data(&uri).unwrap();
    assert_eq!(again, data);
}

#[test]
fn stored_pair_survives_json() {
    // Shape an external store keeps: remark + canonical secret.
    let data = extract_key_data("otpauth://totp/GitHub:octo?secret=JBSWY3DPEHPK3PXP").unwrap();
    let json = serde_json::to_string(&data).unwrap();
    assert_eq!(json, r#"{"secret":"JBSWY3DPEHPK3PXP","remark":"GitHub (octo)"}"#);
    let back: KeyData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, data);

    let tampered = r#"{"secret":"JBSW!3DP","remark":null}"#;
    assert!(serde_json::from_str::<KeyData>(tampered).is_err());
}

#[test]
fn countdown_over_one_window() {
    let start = T - T % 30;
    assert_eq!(time_remaining_at(start, 30), 30);
    assert_eq!(progress_at(start, 30), 0.0);
    for s in 1..30 {
        let remaining = time_remaining_at(start + s, 30);
        assert_eq!(remaining, 30 - s);
        let p = progress_at(start + s, 30);
        assert!(p > 0.0 && p < 100.0);
    }
    assert_eq!(time_remaining_at(start + 30, 30), 30);
}

#[test]
fn settings_from_json_drive_the_generator() {
    let settings = TotpSettings::from_json(r#"{"step":30,"digits":8}"#).unwrap();
    let generator = TotpGenerator::with_settings(settings).unwrap();
    // RFC 6238 Appendix B, SHA1, T = 59
    assert_eq!(
        generator.generate_at("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", 59).unwrap(),
        "94287082"
    );
}
