//! Display sanitization for rich-text content.
//!
//! Listings show post content as plain text: every tag is dropped, the
//! contents of `script` and `style` elements are discarded, common entities
//! are decoded and whitespace is collapsed.

/// Strip all markup from `markup` and return readable plain text.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let after = &rest[lt + 1..];
        let Some(gt) = after.find('>') else {
            // Unterminated tag: drop the remainder.
            rest = "";
            break;
        };

        let tag = tag_name(&after[..gt]);
        rest = &after[gt + 1..];

        if tag == "script" || tag == "style" {
            rest = skip_element_body(rest, &tag);
        }
        // Tags separate words, e.g. `<p>a</p><p>b</p>`.
        text.push(' ');
    }
    text.push_str(rest);

    collapse_whitespace(&decode_entities(&text))
}

/// Plain-text preview of at most `max_chars` characters.
pub fn excerpt(markup: &str, max_chars: usize) -> String {
    let text = plain_text(markup);
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut cut: String = text.chars().take(max_chars).collect();
    let trimmed_len = cut.trim_end().len();
    cut.truncate(trimmed_len);
    cut.push('…');
    cut
}

fn tag_name(inner: &str) -> String {
    inner
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn skip_element_body<'a>(rest: &'a str, tag: &str) -> &'a str {
    let closing = format!("</{tag}");
    let lower = rest.to_ascii_lowercase();
    match lower.find(&closing) {
        Some(pos) => {
            let tail = &rest[pos..];
            match tail.find('>') {
                Some(gt) => &tail[gt + 1..],
                None => "",
            }
        }
        None => "",
    }
}

fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 6] = [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&amp;", "&"),
    ];

    // `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, ch)| acc.replace(entity, ch))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
