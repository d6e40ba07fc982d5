//! Numbers in the header radix.

/// Writes `n` in `radix` (2..=36), lowercase.
pub(crate) fn push_number(out: &mut String, n: u32, radix: u32) {
    let mut digits = [0u8; 32];
    let mut len = 0;
    let mut n = n;
    loop {
        let d = n % radix;
        digits[len] = if d < 10 { b'0' + d as u8 } else { b'a' + (d - 10) as u8 };
        len += 1;
        n /= radix;
        if n == 0 {
            break;
        }
    }
    out.extend(digits[..len].iter().rev().map(|&b| char::from(b)));
}

/// Number of digits of `n` in `radix`.
pub(crate) fn digits(mut n: u32, radix: u32) -> usize {
    let mut count = 1;
    while n >= radix {
        n /= radix;
        count += 1;
    }
    count
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbers_in_radix() {
        let mut s = String::new();
        push_number(&mut s, 0, 10);
        s.push(' ');
        push_number(&mut s, 255, 16);
        s.push(' ');
        push_number(&mut s, 35, 36);
        s.push(' ');
        push_number(&mut s, u32::MAX, 36);
        assert_eq!(s, "0 ff z 1z141z3");
    }

    #[test]
    fn digit_counts() {
        assert_eq!(digits(0, 10), 1);
        assert_eq!(digits(9, 10), 1);
        assert_eq!(digits(10, 10), 2);
        assert_eq!(digits(35, 36), 1);
        assert_eq!(digits(36, 36), 2);
        assert_eq!(digits(u32::MAX, 10), 10);
    }

    #[test]
    fn written_length_matches_digit_count() {
        for radix in [10, 16, 36] {
            for n in [0, 1, 9, 10, 35, 36, 1295, 1296, 99_999, u32::MAX] {
                let mut s = String::new();
                push_number(&mut s, n, radix);
                assert_eq!(s.len(), digits(n, radix), "{n} in radix {radix}");
            }
        }
    }
}
