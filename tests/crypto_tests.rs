// tests/crypto_tests.rs
use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use envelope_key_vault::crypto::{
    decrypt, decrypt_to_string, encrypt, encrypt_str, export_key, generate_key, import_key,
    unwrap_key, wrap_key, Sealed,
};
use envelope_key_vault::error::CoreError;

fn flip_byte(encoded: &str, index: usize) -> String {
    let mut bytes = STANDARD.decode(encoded).unwrap();
    bytes[index] ^= 0x01;
    STANDARD.encode(bytes)
}

#[test]
fn test_encrypt_decrypt_roundtrip() {
    let key = generate_key();
    let plaintexts = [
        String::new(),
        "Hello, World!".to_string(),
        "🔐 Secure password with émojis and ñ characters! 中文".to_string(),
        "A".repeat(10_000),
    ];

    for plaintext in &plaintexts {
        let sealed = encrypt_str(plaintext, &key).unwrap();
        let decrypted = decrypt_to_string(&sealed, &key).unwrap();
        assert_eq!(decrypted.expose_secret(), plaintext);
    }
}

#[test]
fn test_binary_roundtrip() {
    let key = generate_key();
    let plaintext: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    let sealed = encrypt(&plaintext, &key).unwrap();
    let decrypted = decrypt(&sealed, &key).unwrap();
    assert_eq!(decrypted.expose_secret(), &plaintext);
}

#[test]
fn test_same_plaintext_gets_fresh_nonce_and_ciphertext() {
    let key = generate_key();

    let first = encrypt_str("Same input text", &key).unwrap();
    let second = encrypt_str("Same input text", &key).unwrap();

    assert_ne!(first.iv, second.iv);
    assert_ne!(first.ciphertext, second.ciphertext);
    assert_eq!(
        decrypt_to_string(&first, &key).unwrap().expose_secret(),
        decrypt_to_string(&second, &key).unwrap().expose_secret()
    );
}

#[test]
fn test_nonces_never_repeat_across_many_calls() {
    let key = generate_key();
    let nonces: HashSet<String> = (0..2_000)
        .map(|_| encrypt(b"x", &key).unwrap().iv)
        .collect();
    assert_eq!(nonces.len(), 2_000);
}

#[test]
fn test_encoded_sizes() {
    let key = generate_key();
    let sealed = encrypt(b"hunter2", &key).unwrap();

    assert_eq!(STANDARD.decode(&sealed.iv).unwrap().len(), 12);
    // plaintext + 16-byte tag
    assert_eq!(STANDARD.decode(&sealed.ciphertext).unwrap().len(), 7 + 16);
}

#[test]
fn test_decrypt_fails_with_wrong_key() {
    let key1 = generate_key();
    let key2 = generate_key();
    let sealed = encrypt_str("Secret message", &key1).unwrap();

    let wrong = decrypt(&sealed, &key2);
    assert!(matches!(wrong, Err(CoreError::Decryption)));
}

#[test]
fn test_any_flipped_ciphertext_byte_is_detected() {
    let key = generate_key();
    let sealed = encrypt_str("Secret message", &key).unwrap();
    let len = STANDARD.decode(&sealed.ciphertext).unwrap().len();

    for index in 0..len {
        let tampered = Sealed::new(flip_byte(&sealed.ciphertext, index), sealed.iv.clone());
        assert!(
            matches!(decrypt(&tampered, &key), Err(CoreError::Decryption)),
            "byte {index} flip went unnoticed"
        );
    }
}

#[test]
fn test_any_flipped_nonce_byte_is_detected() {
    let key = generate_key();
    let sealed = encrypt_str("Secret message", &key).unwrap();

    for index in 0..12 {
        let tampered = Sealed::new(sealed.ciphertext.clone(), flip_byte(&sealed.iv, index));
        assert!(matches!(decrypt(&tampered, &key), Err(CoreError::Decryption)));
    }
}

#[test]
fn test_malformed_sealed_values_fail_as_decryption() {
    let key = generate_key();
    let sealed = encrypt_str("Secret message", &key).unwrap();

    let bad_base64 = Sealed::new("not base64!!", sealed.iv.clone());
    let short_nonce = Sealed::new(sealed.ciphertext.clone(), STANDARD.encode([0u8; 8]));
    let truncated = Sealed::new(STANDARD.encode([0u8; 4]), sealed.iv.clone());

    for broken in [bad_base64, short_nonce, truncated] {
        assert!(matches!(decrypt(&broken, &key), Err(CoreError::Decryption)));
    }
}

#[test]
fn test_generate_key_is_random() {
    let a = generate_key();
    let b = generate_key();
    assert!(!a.same_material(&b));
    assert_ne!(export_key(&a).expose_secret(), export_key(&b).expose_secret());
}

#[test]
fn test_export_import_roundtrip() {
    let original = generate_key();
    let exported = export_key(&original);
    assert_eq!(STANDARD.decode(exported.expose_secret()).unwrap().len(), 32);

    let imported = import_key(exported.expose_secret()).unwrap();
    assert!(imported.same_material(&original));

    let sealed = encrypt_str("Test message", &original).unwrap();
    assert_eq!(
        decrypt_to_string(&sealed, &imported).unwrap().expose_secret(),
        "Test message"
    );

    let other = import_key(export_key(&generate_key()).expose_secret()).unwrap();
    assert!(decrypt(&sealed, &other).is_err());
}

#[test]
fn test_import_rejects_bad_material() {
    assert!(matches!(
        import_key("definitely not base64"),
        Err(CoreError::InvalidKeyMaterial)
    ));
    assert!(matches!(
        import_key(&STANDARD.encode([7u8; 16])),
        Err(CoreError::InvalidKeyMaterial)
    ));
    assert!(matches!(
        import_key(&STANDARD.encode([7u8; 33])),
        Err(CoreError::InvalidKeyMaterial)
    ));
}

#[test]
fn test_debug_output_hides_key_material() {
    let key = generate_key();
    let exported = export_key(&key);
    let debug = format!("{key:?}");
    assert!(!debug.contains(exported.expose_secret().as_str()));
    assert!(debug.contains("REDACTED"));
}

#[test]
fn test_wrap_unwrap_under_master_key() {
    let master = generate_key();
    let user_key = generate_key();

    let wrapped = wrap_key(&user_key, &master).unwrap();
    let unwrapped = unwrap_key(&wrapped, &master).unwrap();
    assert!(unwrapped.same_material(&user_key));

    let other_master = generate_key();
    assert!(matches!(
        unwrap_key(&wrapped, &other_master),
        Err(CoreError::KeyUnwrap)
    ));
}

#[test]
fn test_unwrap_rejects_sealed_non_key_payload() {
    let master = generate_key();
    let sealed = encrypt_str("not a key", &master).unwrap();
    assert!(matches!(
        unwrap_key(&sealed, &master),
        Err(CoreError::KeyUnwrap)
    ));
}
