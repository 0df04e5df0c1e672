/// Split `text` at the first occurrence of `target` into `(before, target, after)`.
///
/// `None` when `target` is empty or not a literal substring of `text`.
pub fn split_emphasis<'a>(text: &'a str, target: &str) -> Option<(&'a str, &'a str, &'a str)> {
    if target.is_empty() {
        return None;
    }
    let start = text.find(target)?;
    let end = start + target.len();
    Some((&text[..start], &text[start..end], &text[end..]))
}

/// Left x of each of three adjacent segments whose combined width is centered on `center_x`.
pub fn place_segments(widths: [f32; 3], center_x: f32) -> [f32; 3] {
    let total: f32 = widths.iter().sum();
    let x0 = center_x - total / 2.0;
    [x0, x0 + widths[0], x0 + widths[0] + widths[1]]
}

#[cfg(test)]
#[path = "../../tests/unit/text/emphasis.rs"]
mod tests;
