use acadex::config::jwt::JwtConfig;
use acadex::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_access_token(user_id, "test@example.com", "student", &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "test@example.com", "admin", &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_ok());
    let claims = result.unwrap();
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "test@example.com");
    assert_eq!(claims.role, "admin");
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let other_config = JwtConfig {
        secret: "a_completely_different_secret".to_string(),
        access_token_expiry: 3600,
    };

    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "student", &jwt_config).unwrap();
    let result = verify_token(&token, &other_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_expired() {
    let jwt_config = JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        // Already expired when issued
        access_token_expiry: -3600,
    };

    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "student", &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_garbage() {
    let jwt_config = get_test_jwt_config();

    assert!(verify_token("not.a.token", &jwt_config).is_err());
    assert!(verify_token("", &jwt_config).is_err());
}

#[test]
fn test_verify_token_tampered_payload() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@example.com", "student", &jwt_config).unwrap();

    // Swap the payload segment for another token's payload
    let other =
        create_access_token(Uuid::new_v4(), "admin@example.com", "admin", &jwt_config).unwrap();
    let parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

    assert!(verify_token(&tampered, &jwt_config).is_err());
}
