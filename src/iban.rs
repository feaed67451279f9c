//! IBAN mod-97 checksum.

/// Returns `true` if the account passes the ISO 13616 mod-97 check.
///
/// The first four characters are moved to the end, every letter is expanded
/// to its base-36 value (`A` = 10 … `Z` = 35, either case) and the resulting
/// digit string must leave a remainder of 1 when divided by 97. The remainder
/// is folded one digit at a time, so arbitrarily long inputs never overflow.
///
/// Length and per-country format are not checked. Input shorter than four
/// characters, or containing anything other than ASCII letters and digits,
/// is invalid.
pub fn is_valid_iban(iban: &str) -> bool {
    if iban.len() < 4 || !iban.is_ascii() {
        return false;
    }

    let (head, tail) = iban.split_at(4);
    let mut remainder: u32 = 0;

    for c in tail.chars().chain(head.chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }

    remainder == 1
}
