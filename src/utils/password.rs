use argon2::{
    password_hash::{ rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString },
    Argon2,
};

use crate::errors::ErrorMessage;

const MAX_PASSWORD_LENGTH: usize = 64;

pub fn hash(password: impl Into<String>) -> Result<String, ErrorMessage> {
    let password = password.into();

    if password.is_empty() {
        return Err(ErrorMessage::WrongCredentials);
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::WrongCredentials);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hashed_password = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ErrorMessage::InternalServerError)?
        .to_string();

    Ok(hashed_password)
}

pub fn compare(password: &str, hashed_password: &str) -> Result<bool, ErrorMessage> {
    if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
        return Ok(false);
    }

    let parsed_hash = PasswordHash::new(hashed_password).map_err(
        |_| ErrorMessage::InternalServerError
    )?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}
