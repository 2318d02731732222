//! Character reference normalization for third-party text

/// Longest reference body we try to resolve (`#x10FFFF` plus slack)
const MAX_REFERENCE_LEN: usize = 10;

/// Replace numeric character references and `&quot;`/`&apos;`
///
/// Handles `&#xHHHH;`, `&#XHHHH;` and `&#DDDD;`. Any other named entity
/// (including `&amp;`, `&lt;` and `&gt;`) and any reference that does not
/// resolve to a valid `char` is left exactly as written.
pub fn unescape(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match resolve_reference(candidate) {
            Some((ch, consumed)) => {
                output.push(ch);
                rest = &candidate[consumed..];
            }
            None => {
                output.push('&');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Resolve the reference at the start of `s` (which begins with `&`)
///
/// Returns the character and the number of bytes consumed, including the
/// leading `&` and trailing `;`.
fn resolve_reference(s: &str) -> Option<(char, usize)> {
    let body_end = s[1..].find(';')? + 1;
    let body = &s[1..body_end];
    if body.is_empty() || body.len() > MAX_REFERENCE_LEN {
        return None;
    }

    let ch = match body {
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let num = body.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
                parse_digits(hex, 16)?
            } else {
                parse_digits(num, 10)?
            };
            char::from_u32(code)?
        }
    };

    Some((ch, body_end + 1))
}

fn parse_digits(digits: &str, radix: u32) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
