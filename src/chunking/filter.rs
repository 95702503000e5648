/// CJK Unified Ideographs block.
const CJK_START: char = '\u{4E00}';
const CJK_END: char = '\u{9FFF}';

/// Keeps multi-character names written entirely in CJK ideographs.
///
/// Drops single-character noise, latin fragments and punctuation.
pub fn is_person_candidate(text: &str) -> bool {
    let mut count = 0usize;
    for ch in text.chars() {
        if !(CJK_START..=CJK_END).contains(&ch) {
            return false;
        }
        count += 1;
    }
    count > 1
}
