use unicode_normalization::UnicodeNormalization;

/// Canonical form used for every label comparison: NFC composed, trimmed,
/// internal whitespace runs collapsed to one space.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn same_label(a: &str, b: &str) -> bool {
    normalize_text(a) == normalize_text(b)
}

#[cfg(test)]
mod tests {
    use crate::goals::normalize::{normalize_text, same_label};

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(normalize_text("  논문   초록\t작성 \n"), "논문 초록 작성");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn composes_decomposed_hangul_and_accents() {
        // U+1100 U+1161 is the decomposed jamo sequence for U+AC00.
        let decomposed = "\u{1100}\u{1161}방";
        assert_eq!(normalize_text(decomposed), "가방");
        assert_eq!(normalize_text("e\u{0301}tude"), "\u{e9}tude");
        assert!(same_label("caf\u{e9}", "cafe\u{0301}"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "   ",
            "기타 -  논문초록",
            "e\u{0301}\u{3000}x",
            "[연구]\n- 실험\t 설계",
            "\u{1100}\u{1161}\u{11a8}  \u{0301}",
        ];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once, "not idempotent for {sample:?}");
        }
    }
}
