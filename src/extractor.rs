//! Link extraction from document text: embeds, wikilinks, and inline images.
//!
//! Only link syntax is recognised; everything else in the markdown is ignored.
//! Each syntax family is matched independently and the results concatenated in
//! family order (embeds, wikilinks, inline images). Nothing is deduplicated here:
//! findings are per occurrence, and the reference index deduplicates on its own.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ReferenceToken, final_extension, final_segment, is_image_extension};

/// `![[target]]` and `[[target]]` on a single line, with the leading `!` captured separately.
/// The regex crate has no lookbehind, so embeds and plain wikilinks share one pattern.
#[allow(clippy::expect_used, reason = "regex is a compile-time constant")]
static WIKILINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"(!?)\[\[([^\[\]\n]*)\]\]").expect("valid regex"));

/// `![alt](target)`, allowing one level of parentheses inside the target.
#[allow(clippy::expect_used, reason = "regex is a compile-time constant")]
static INLINE_IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"!\[[^\]]*\]\(((?:[^()]|\([^()]*\))*)\)").expect("valid regex");
});

/// Which link syntax produced an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax {
    /// `![[target]]` or `![[target|alias]]`.
    Embed,
    /// `![alt](target)`.
    InlineImage,
    /// `[[target]]` or `[[target|alias]]`.
    Wikilink,
}

/// One link found in text, with anchor and alias already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    /// Syntax family that matched.
    pub syntax: LinkSyntax,
    /// Link target as written, minus `#anchor` and `|alias`, trimmed. May contain `/`.
    pub target: String,
}

impl LinkOccurrence {
    /// The normalized attachment token: the final path segment of the target.
    pub fn token(&self) -> ReferenceToken {
        return ReferenceToken(final_segment(&self.target).trim().to_string());
    }

    /// Whether the target's final extension is an image extension.
    pub fn has_image_extension(&self) -> bool {
        return final_extension(&self.target).is_some_and(is_image_extension);
    }
}

/// Every link occurrence in `text`, grouped by syntax family in the order
/// embeds, wikilinks, inline images. Empty targets are dropped.
pub fn occurrences(text: &str) -> Vec<LinkOccurrence> {
    let mut embeds = Vec::new();
    let mut wikilinks = Vec::new();

    for cap in WIKILINK_PATTERN.captures_iter(text) {
        let is_embed = cap.get(1).is_some_and(|bang| return !bang.as_str().is_empty());
        let Some(inner) = cap.get(2) else { continue };
        let target = normalize_wikilink_inner(inner.as_str());
        if target.is_empty() {
            continue;
        }
        if is_embed {
            embeds.push(LinkOccurrence { syntax: LinkSyntax::Embed, target });
        } else {
            wikilinks.push(LinkOccurrence { syntax: LinkSyntax::Wikilink, target });
        }
    }

    let inline = INLINE_IMAGE_PATTERN
        .captures_iter(text)
        .filter_map(|cap| return cap.get(1))
        .filter_map(|raw| return normalize_inline_target(raw.as_str()))
        .map(|target| return LinkOccurrence { syntax: LinkSyntax::InlineImage, target });

    embeds.append(&mut wikilinks);
    embeds.extend(inline);
    return embeds;
}

/// Attachment tokens referenced in `text`.
///
/// Embeds and wikilinks count only when their target has an image extension.
/// Inline images count regardless of extension; callers filter further if needed.
pub fn extract(text: &str) -> Vec<ReferenceToken> {
    return occurrences(text)
        .into_iter()
        .filter(|occ| return occ.syntax == LinkSyntax::InlineImage || occ.has_image_extension())
        .map(|occ| return occ.token())
        .filter(|token| return !token.as_str().is_empty())
        .collect();
}

/// Document-style link targets in `text`, in document order, with no extension filtering.
/// Embedded wikilinks (`![[note]]`) are included: they point at a file just the same.
pub fn extract_backlinks(text: &str) -> Vec<String> {
    return WIKILINK_PATTERN
        .captures_iter(text)
        .filter_map(|cap| return cap.get(2))
        .map(|inner| return normalize_wikilink_inner(inner.as_str()))
        .filter(|target| return !target.is_empty())
        .collect();
}

/// Strip `|alias` and `#subpath` from the inside of a wikilink and trim it.
/// A pipe escaped for use inside a table (`\|`) leaves a trailing backslash, which is dropped.
fn normalize_wikilink_inner(inner: &str) -> String {
    let before_alias = inner.split('|').next().unwrap_or_default();
    let before_anchor = before_alias.split('#').next().unwrap_or_default();
    return before_anchor.trim_end_matches('\\').trim().to_string();
}

/// Normalize the parenthesised target of an inline image.
/// Returns `None` for external URLs and empty targets.
fn normalize_inline_target(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let path = match raw.strip_prefix('<') {
        Some(rest) => rest.split('>').next().unwrap_or_default(),
        None => strip_link_title(raw),
    };

    if path.contains("://") || path.starts_with("data:") {
        return None;
    }

    let path = path.split('#').next().unwrap_or_default().replace("%20", " ");
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    return Some(path.to_string());
}

/// Drop a trailing `"title"` from an inline link target.
fn strip_link_title(raw: &str) -> &str {
    return raw
        .strip_suffix('"')
        .and_then(|rest| return rest.rsplit_once(" \""))
        .map_or(raw, |(path, _title)| return path.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        extract(text).into_iter().map(|t| t.0).collect()
    }

    #[test]
    fn text_without_links_yields_nothing() {
        assert!(extract("plain prose, a [bracket] and (parens)").is_empty());
        assert!(extract_backlinks("# Heading\n\n- list item").is_empty());
    }

    #[test]
    fn embed_alias_and_folder_normalize_to_file_name() {
        assert_eq!(tokens("![[photo.png]]"), vec!["photo.png"]);
        assert_eq!(tokens("![[sub/folder/photo.png|alias]]"), vec!["photo.png"]);
    }

    #[test]
    fn anchor_is_stripped_before_extension_check() {
        assert_eq!(tokens("![[diagram.png#right]]"), vec!["diagram.png"]);
    }

    #[test]
    fn extension_check_ignores_case_but_token_keeps_it() {
        assert_eq!(tokens("![[Cat.JPG]]"), vec!["Cat.JPG"]);
    }

    #[test]
    fn non_image_wikilinks_are_not_attachments() {
        assert!(tokens("[[Some note]] and ![[report.pdf]]").is_empty());
    }

    #[test]
    fn plain_wikilink_to_image_counts() {
        assert_eq!(tokens("see [[img/shot.gif|the shot]]"), vec!["shot.gif"]);
    }

    #[test]
    fn inline_images_accept_any_extension() {
        assert_eq!(tokens("![diagram](assets/flow.svg)"), vec!["flow.svg"]);
        assert_eq!(tokens("![x](<my pics/a b.png>)"), vec!["a b.png"]);
        assert_eq!(tokens("![x](my%20pics/a%20b.png \"Title\")"), vec!["a b.png"]);
        assert_eq!(tokens("![x](shots/photo (1).png)"), vec!["photo (1).png"]);
    }

    #[test]
    fn external_inline_images_are_skipped() {
        assert!(tokens("![logo](https://example.com/logo.png)").is_empty());
        assert!(tokens("![px](data:image/png;base64,AAAA)").is_empty());
    }

    #[test]
    fn families_are_concatenated_in_order_without_dedup() {
        let text = "![a](one.png) [[two.png]] ![[three.png]] ![[three.png]]";
        assert_eq!(tokens(text), vec!["three.png", "three.png", "two.png", "one.png"]);
    }

    #[test]
    fn backlinks_keep_paths_and_drop_anchors() {
        let text = "[[b]] [[dir/c#Heading|alias]] ![[d]] [[#local]] [[e.png]]";
        assert_eq!(extract_backlinks(text), vec!["b", "dir/c", "d", "e.png"]);
    }

    #[test]
    fn escaped_table_pipe_is_handled() {
        assert_eq!(extract_backlinks("| [[page\\|Page]] |"), vec!["page"]);
        assert_eq!(tokens("| ![[pic.png\\|200]] |"), vec!["pic.png"]);
    }

    #[test]
    fn brackets_never_pair_across_lines() {
        let text = "see [[draft\n\nlater paragraph]] here\n![[a.png\n]]";
        assert!(extract_backlinks(text).is_empty());
        assert!(tokens(text).is_empty());
        assert_eq!(extract_backlinks("[[open\n[[closed]]"), vec!["closed"]);
    }

    #[test]
    fn occurrence_records_syntax_family() {
        let found = occurrences("![[a.png]] [[b]] ![c](d.png)");
        let families: Vec<LinkSyntax> = found.iter().map(|o| o.syntax).collect();
        assert_eq!(families, vec![LinkSyntax::Embed, LinkSyntax::Wikilink, LinkSyntax::InlineImage]);
    }
}
