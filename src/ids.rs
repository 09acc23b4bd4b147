use std::fmt::Write;

use rand::RngCore;

const TOKEN_BYTES: usize = 5;

/// A fresh opaque identifier: 5 random bytes as 10 lowercase hex characters.
///
/// Account and contact ids are chosen by the caller, never by the database.
#[must_use]
pub fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(TOKEN_BYTES * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_ten_hex_chars() {
        let token = new_token();
        assert_eq!(token.len(), 10);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
