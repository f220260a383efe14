use std::sync::LazyLock;

use regex::Regex;

use crate::goals::ParsedItem;

/// Section assigned to bullets that appear before any `[header]`.
pub const DEFAULT_SECTION: &str = "기타";

static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]*)\](.*)$").expect("header pattern is valid")
});

static RE_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*•·▪◦]\s*(.*)$").expect("bullet pattern is valid")
});

/// Extracts `(section, item)` pairs from bulleted free text.
///
/// Lines starting with `[name]` switch the current section; a bullet on the
/// same line after the bracket is emitted right away. Lines whose trimmed form
/// starts with a bullet glyph emit an item under the current section, or
/// `fallback_section` when no header has been seen. Everything else is skipped.
pub fn parse_goal_text(text: &str, fallback_section: &str) -> Vec<ParsedItem> {
    let mut current: Option<String> = None;
    let mut items = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = RE_HEADER.captures(line) {
            let section = caps[1].trim();
            current = (!section.is_empty()).then(|| section.to_string());
            if let Some(item) = bullet_item(caps[2].trim()) {
                items.push(ParsedItem {
                    section: section_or(&current, fallback_section),
                    item,
                });
            }
            continue;
        }

        if let Some(item) = bullet_item(line) {
            items.push(ParsedItem {
                section: section_or(&current, fallback_section),
                item,
            });
        }
    }

    items
}

fn bullet_item(line: &str) -> Option<String> {
    let caps = RE_BULLET.captures(line)?;
    let item = caps[1].trim();
    if item.is_empty() {
        return None;
    }
    Some(item.to_string())
}

fn section_or(current: &Option<String>, fallback: &str) -> String {
    current.clone().unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use crate::goals::parser::{parse_goal_text, DEFAULT_SECTION};

    fn pairs(text: &str) -> Vec<(String, String)> {
        parse_goal_text(text, DEFAULT_SECTION)
            .into_iter()
            .map(|p| (p.section, p.item))
            .collect()
    }

    #[test]
    fn empty_and_unstructured_input_yield_nothing() {
        assert!(pairs("").is_empty());
        assert!(pairs("\n\n   \n").is_empty());
        assert!(pairs("그냥 메모\n아무 구조 없음").is_empty());
    }

    #[test]
    fn headers_scope_following_bullets() {
        let text = "[연구]\n- 논문초록\n- 실험 설계\n\n[건강]\n• 발레 주2회\n";
        assert_eq!(
            pairs(text),
            vec![
                ("연구".to_string(), "논문초록".to_string()),
                ("연구".to_string(), "실험 설계".to_string()),
                ("건강".to_string(), "발레 주2회".to_string()),
            ]
        );
    }

    #[test]
    fn bullets_before_any_header_use_fallback_section() {
        assert_eq!(
            pairs("  - 논문초록\n* 식단기록"),
            vec![
                ("기타".to_string(), "논문초록".to_string()),
                ("기타".to_string(), "식단기록".to_string()),
            ]
        );
        let custom = parse_goal_text("- a", "uncategorized");
        assert_eq!(custom[0].section, "uncategorized");
    }

    #[test]
    fn inline_bullet_after_header_is_emitted() {
        assert_eq!(
            pairs("[글쓰기] - 에세이 1편\n- 퇴고"),
            vec![
                ("글쓰기".to_string(), "에세이 1편".to_string()),
                ("글쓰기".to_string(), "퇴고".to_string()),
            ]
        );
    }

    #[test]
    fn header_text_without_bullet_is_not_an_item() {
        assert_eq!(
            pairs("[운동] 주 3회 목표\n- 스쿼트"),
            vec![("운동".to_string(), "스쿼트".to_string())]
        );
    }

    #[test]
    fn empty_bracket_and_bare_bullet_fall_back() {
        assert_eq!(
            pairs("[]\n- 정리\n-\n- "),
            vec![("기타".to_string(), "정리".to_string())]
        );
    }

    #[test]
    fn odd_input_never_panics() {
        for text in ["[", "]", "[[]]", "-", "[a", "\u{0}", "[x]-", "•\u{301}", "\r\n- x\r\n"] {
            let _ = parse_goal_text(text, DEFAULT_SECTION);
        }
        assert_eq!(pairs("\r\n- x\r\n"), vec![("기타".to_string(), "x".to_string())]);
    }
}
