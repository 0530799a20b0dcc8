const MAX_VISIBLE_CHARS: usize = 80;

/// Shortens a submitted job description for a single log field: first line
/// only, whitespace collapsed, cut on a char boundary.
pub fn text_preview(text: &str) -> String {
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty());

    let Some(line) = first_line else {
        return String::from("[EMPTY]");
    };

    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let total_chars = text.chars().count();

    if collapsed.chars().count() > MAX_VISIBLE_CHARS {
        let visible: String = collapsed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", visible, total_chars)
    } else if collapsed.chars().count() < total_chars {
        format!("{} ({} chars total)", collapsed, total_chars)
    } else {
        collapsed
    }
}
