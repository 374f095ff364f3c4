use crate::exit::{CliError, CliResult, USAGE};

/// Parse hex text. Whitespace, `:` and `,` separators and `0x` prefixes are
/// ignored, so `a1 01 00`, `A10100` and `0xa1,0x01,0x00` are all accepted.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == ',')
        .map(|token| {
            token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token)
        })
        .collect();

    ::hex::decode(&digits)
        .map_err(|err| CliError::new(USAGE, format!("invalid hex input: {err}")))
}
