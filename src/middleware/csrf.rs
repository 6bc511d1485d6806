use uuid::Uuid;

/// Fresh anti-forgery token for one rendered form.
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Compares a submitted token with the issued one without short-circuiting
/// on the first differing byte.
pub fn tokens_match(issued: Option<&str>, submitted: Option<&str>) -> bool {
    let (Some(issued), Some(submitted)) = (issued, submitted) else {
        return false;
    };

    if issued.is_empty() || issued.len() != submitted.len() {
        return false;
    }

    issued
        .bytes()
        .zip(submitted.bytes())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b)) == 0
}
