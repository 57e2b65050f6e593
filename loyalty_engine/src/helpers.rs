//! Small pure helpers shared by the admission and withdrawal paths.

/// Returns true if `number` is a non-empty digit string passing the Luhn checksum.
///
/// This is the admission gate for order numbers and withdrawal order references alike. Anything
/// else (empty, signs, spaces, letters) is rejected before the store is ever consulted.
pub fn is_valid_order_number(number: &str) -> bool {
    !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()) && luhn_checksum_ok(number)
}

fn luhn_checksum_ok(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let mut d = u32::from(b - b'0');
            if i % 2 == 1 {
                d *= 2;
                if d > 9 {
                    d -= 9;
                }
            }
            d
        })
        .sum();
    sum % 10 == 0
}
