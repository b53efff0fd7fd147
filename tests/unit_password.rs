use acadex_core::{hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let result = hash_password(password);

    assert!(result.is_ok());
    let hash = result.unwrap();
    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_hashes_are_salted() {
    let password = "testpassword123";
    let first = hash_password(password).unwrap();
    let second = hash_password(password).unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_verify_password_correct() {
    let password = "correctpassword";
    let hash = hash_password(password).unwrap();

    let result = verify_password(password, &hash);

    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let password = "correctpassword";
    let hash = hash_password(password).unwrap();

    let result = verify_password("wrongpassword", &hash);

    assert!(result.is_ok());
    assert!(!result.unwrap());
}

#[test]
fn test_verify_password_invalid_hash() {
    let result = verify_password("testpassword", "not_a_valid_bcrypt_hash");

    assert!(result.is_err());
}
