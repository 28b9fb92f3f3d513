//! Password checksum.
//!
//! NOT a password hash. This is a 32-bit rolling checksum over the UTF-16
//! code units of `password + SALT`, rendered as the decimal absolute value.
//! It exists so accounts written by earlier versions still verify; swapping
//! it for a real KDF changes stored data and must be done as a migration.

/// Fixed salt appended to every password before hashing.
pub const SALT: &str = "quran_reader_salt_2024";

pub(crate) fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

pub fn password_checksum(password: &str) -> String {
    let mut salted = String::with_capacity(password.len() + SALT.len());
    salted.push_str(password);
    salted.push_str(SALT);
    rolling_hash(&salted).unsigned_abs().to_string()
}

pub fn verify_password(password: &str, checksum: &str) -> bool {
    password_checksum(password) == checksum
}
