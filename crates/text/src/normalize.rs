//! Accent folding, special character removal and URL slugs.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Accented Vietnamese letters, paired by position with [`FOLDED`].
const ACCENTED: &str = "ÀÁÂÃÈÉÊÌÍÒÓÔÕÙÚÝàáâãèéêìíòóôõùúýĂăĐđĨĩŨũƠơƯưẠạẢảẤấẦầẨẩẪẫẬậẮắẰằẲẳẴẵẶặẸẹẺẻẼẽẾếỀềỂểỄễỆệỈỉỊịỌọỎỏỐốỒồỔổỖỗỘộỚớỜờỞởỠỡỢợỤụỦủỨứỪừỬửỮữỰựỲỳỴỵỶỷỸỹ";
const FOLDED: &str = "AAAAEEEIIOOOOUUYaaaaeeeiioooouuyAaDdIiUuOoUuAaAaAaAaAaAaAaAaAaAaAaAaEeEeEeEeEeEeEeEeIiIiOoOoOoOoOoOoOoOoOoOoOoOoUuUuUuUuUuUuUuYyYyYyYy";

static ACCENT_MAP: LazyLock<HashMap<char, char>> =
    LazyLock::new(|| ACCENTED.chars().zip(FOLDED.chars()).collect());

static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N} ]+").expect("special character pattern is valid")
});

/// Replace Vietnamese accented letters with their ASCII base letter.
///
/// Characters outside the Vietnamese alphabet are kept as they are.
///
/// ```
/// assert_eq!(utilkit_text::remove_accents("Đường Lê Lợi"), "Duong Le Loi");
/// ```
pub fn remove_accents(s: &str) -> String {
    s.chars()
        .map(|c| ACCENT_MAP.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Drop everything except letters, digits and spaces.
///
/// Double spaces left behind are collapsed in a single pass and the result
/// is trimmed.
///
/// ```
/// assert_eq!(utilkit_text::remove_special_chars(" Hello, world! "), "Hello world");
/// ```
pub fn remove_special_chars(s: &str) -> String {
    SPECIAL_CHARS
        .replace_all(s, "")
        .replace("  ", " ")
        .trim()
        .to_string()
}

/// Lower-case, accent-free, hyphen-separated slug.
///
/// ```
/// assert_eq!(utilkit_text::to_url("Phở Bò Hà Nội!"), "pho-bo-ha-noi");
/// ```
pub fn to_url(s: &str) -> String {
    remove_special_chars(&remove_accents(s).to_lowercase()).replace(' ', "-")
}
