/// Fully transparent black, used when a KML color cannot be decoded.
pub const TRANSPARENT: &str = "#00000000";

/// Converts a KML `aabbggrr` color into a web `#rrggbbaa` color.
pub fn abgr_to_rgba(abgr: &str) -> String {
    let chars: Vec<char> = abgr.chars().collect();
    if chars.len() != 8 {
        log::warn!("Invalid ABGR color: {}", abgr);
        return TRANSPARENT.to_string();
    }
    let pair = |i: usize| -> String { chars[i..i + 2].iter().collect() };
    let (a, b, g, r) = (pair(0), pair(2), pair(4), pair(6));
    format!("#{}{}{}{}", r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_alpha_to_the_back() {
        assert_eq!(abgr_to_rgba("ff0000ff"), "#ff0000ff");
        assert_eq!(abgr_to_rgba("4d112233"), "#3322114d");
        assert_eq!(abgr_to_rgba("80ff8000"), "#0080ff80");
    }

    #[test]
    fn test_keeps_case() {
        assert_eq!(abgr_to_rgba("FFaBcDeF"), "#eFcDaBFF");
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(abgr_to_rgba(""), TRANSPARENT);
        assert_eq!(abgr_to_rgba("ff00ff"), TRANSPARENT);
        assert_eq!(abgr_to_rgba("ff00ff00ff"), TRANSPARENT);
    }

    #[test]
    fn test_non_hex_is_passed_through() {
        assert_eq!(abgr_to_rgba("zzyyxxww"), "#wwxxyyzz");
    }
}
