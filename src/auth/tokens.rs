use rand::{RngCore, thread_rng};

pub const REFRESH_TOKEN_BYTES: usize = 40;

/// Opaque refresh token: 40 CSPRNG bytes, hex encoded.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{REFRESH_TOKEN_BYTES, generate_refresh_token};

    #[test]
    fn token_is_hex_of_forty_bytes() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex::decode(&token).map(|b| b.len()), Ok(REFRESH_TOKEN_BYTES));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..256).map(|_| generate_refresh_token()).collect();
        assert_eq!(tokens.len(), 256);
    }
}
