//! Small scanners over semi-structured report text.

/// Text strictly between the first `start` and the next `end` after it.
/// Empty when either marker is missing.
pub fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_idx) = text.find(start) else {
        return "";
    };
    let body_start = start_idx + start.len();
    let Some(end_offset) = text[body_start..].find(end) else {
        return "";
    };
    &text[body_start..body_start + end_offset]
}

/// A count token: a run of digits, or the literal word `a` meaning one.
fn count_token(rest: &str) -> Option<(u32, usize)> {
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let value = rest[..digits].parse().unwrap_or(u32::MAX);
        return Some((value, digits));
    }
    if rest.starts_with('a') {
        return Some((1, 1));
    }
    None
}

/// Sums every `<prefix><count><suffix>` occurrence, matching case-insensitively.
/// Missing matches sum to zero.
pub fn sum_counts(text: &str, prefix: &str, suffix: &str) -> u32 {
    let haystack = text.to_ascii_lowercase();
    let prefix = prefix.to_ascii_lowercase();
    let suffix = suffix.to_ascii_lowercase();
    let mut total: u32 = 0;
    let mut cursor = 0;
    while let Some(offset) = haystack[cursor..].find(&prefix) {
        let token_start = cursor + offset + prefix.len();
        cursor = cursor + offset + 1;
        let Some((value, len)) = count_token(&haystack[token_start..]) else {
            continue;
        };
        if haystack[token_start + len..].starts_with(&suffix) {
            total = total.saturating_add(value);
            cursor = token_start + len + suffix.len();
        }
    }
    total
}

/// Every `(first, second)` pair of `<open><first><mid><second><close>` where
/// both captures stay on one line and are the shortest possible.
pub fn scan_pairs<'a>(text: &'a str, open: &str, mid: &str, close: &str) -> Vec<(&'a str, &'a str)> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(open) {
        let first_start = cursor + offset + open.len();
        cursor = cursor + offset + 1;
        let line = line_from(text, first_start);
        let Some(mid_at) = line.find(mid) else {
            continue;
        };
        let second_start = mid_at + mid.len();
        let Some(close_at) = line[second_start..].find(close) else {
            continue;
        };
        out.push((
            &line[..mid_at],
            &line[second_start..second_start + close_at],
        ));
        cursor = first_start + second_start + close_at + close.len();
    }
    out
}

/// Every line fragment following `marker` (case-insensitive) up to the first `close`.
pub fn scan_after<'a>(text: &'a str, marker: &str, close: &str) -> Vec<&'a str> {
    let haystack = text.to_ascii_lowercase();
    let marker = marker.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = haystack[cursor..].find(&marker) {
        let body_start = cursor + offset + marker.len();
        cursor = cursor + offset + 1;
        let line = line_from(text, body_start);
        let Some(close_at) = line.find(close) else {
            continue;
        };
        out.push(&line[..close_at]);
        cursor = body_start + close_at + close.len();
    }
    out
}

fn line_from(text: &str, start: usize) -> &str {
    let rest = &text[start..];
    match rest.find('\n') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_requires_both_markers() {
        assert_eq!(between("a<x>b<y>c", "<x>", "<y>"), "b");
        assert_eq!(between("a<x>b", "<x>", "<y>"), "");
        assert_eq!(between("b<y>c", "<x>", "<y>"), "");
    }

    #[test]
    fn counts_accept_the_article_token() {
        let text = "Got the carriageman 120 sheet(s) drunker\n\
                    got the carriageman a sheet(s) drunker\n\
                    got the carriageman many sheet(s) drunker";
        assert_eq!(sum_counts(text, "got the carriageman ", " sheet(s) drunker"), 121);
        assert_eq!(sum_counts("", "got the carriageman ", " sheet(s) drunker"), 0);
    }

    #[test]
    fn pairs_stay_on_one_line() {
        let text = "drove some ghosts out of the village (1 turn)\ndrove some cats out\nof the town (";
        let pairs = scan_pairs(text, "drove some ", " out of the ", " (");
        assert_eq!(pairs, vec![("ghosts", "village")]);
    }
}
