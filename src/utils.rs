pub fn parse_num<T: std::str::FromStr>(bstr: &[u8]) -> Option<T> {
    std::str::from_utf8(bstr).ok()?
        .parse::<T>().ok()
}

pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None
    }
}

/// Whether `tk` has the shape of a PDF number: optional sign, digits, at most one decimal 
/// point and at least one digit. No exponents.
pub fn is_number(tk: &[u8]) -> bool {
    let digits = match tk {
        [b'+' | b'-', rest @ ..] => rest,
        _ => tk
    };
    let mut seen_dot = false;
    let mut seen_digit = false;
    for c in digits {
        match c {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false
        }
    }
    seen_digit
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_number() {
        assert!(is_number(b"0"));
        assert!(is_number(b"+17"));
        assert!(is_number(b"-.002"));
        assert!(is_number(b"4."));
        assert!(!is_number(b"."));
        assert!(!is_number(b"-"));
        assert!(!is_number(b"++1"));
        assert!(!is_number(b"1..0"));
        assert!(!is_number(b"6.023E23"));
        assert!(!is_number(b"abs"));
    }
}
