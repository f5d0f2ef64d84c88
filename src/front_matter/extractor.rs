use once_cell::sync::Lazy;
use regex::Regex;

use crate::front_matter::types::FrontMatter;
use crate::utils::error::{PagemillError, Result};

// `---` ... `---` or `<!--` ... `-->`, each delimiter alone on its line,
// anchored at the very start of the file. The body is optional.
static FRONT_MATTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A(?s:---\r?\n(?:(?P<dash>.*?)\r?\n)?---|<!--\r?\n(?:(?P<comment>.*?)\r?\n)?-->)(?:\r?\n|\z)",
    )
    .expect("front matter pattern is valid")
});

/// A frontmatter block located at the top of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterBlock<'a> {
    /// The block exactly as written, delimiters and trailing newline included
    pub raw: &'a str,
    /// The text between the delimiters, if any
    pub body: Option<&'a str>,
    /// Everything after the block
    pub rest: &'a str,
}

/// Locate the frontmatter block without parsing it.
///
/// `raw` followed by `rest` is always the original text.
pub fn split_front_matter(text: &str) -> Option<FrontMatterBlock<'_>> {
    let captures = FRONT_MATTER_REGEX.captures(text)?;
    let whole = captures.get(0)?;
    let body = captures
        .name("dash")
        .or_else(|| captures.name("comment"))
        .map(|m| m.as_str());

    Some(FrontMatterBlock {
        raw: whole.as_str(),
        body,
        rest: &text[whole.end()..],
    })
}

/// Extract front matter and content.
///
/// Without a block the frontmatter is empty and the content is the input,
/// untouched. A block whose body is not a YAML mapping is an error.
pub fn extract_front_matter(text: &str) -> Result<(FrontMatter, String)> {
    let block = match split_front_matter(text) {
        Some(block) => block,
        None => return Ok((FrontMatter::default(), text.to_string())),
    };

    let front_matter = match block.body {
        Some(body) => FrontMatter::from_yaml(body)
            .map_err(|message| PagemillError::FrontMatter { path: None, message })?,
        None => FrontMatter::default(),
    };

    Ok((front_matter, block.rest.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_block() {
        let text = "---\ntitle: Test Page\ntemplate: post\n---\nPage content here";
        let (fm, content) = extract_front_matter(text).unwrap();
        assert_eq!(fm.get_str("title"), Some("Test Page".to_string()));
        assert_eq!(fm.template(), Some("post".to_string()));
        assert_eq!(content, "Page content here");
    }

    #[test]
    fn test_comment_block() {
        let text = "<!--\npermalink: /feed.xml\n-->\n<rss></rss>\n";
        let (fm, content) = extract_front_matter(text).unwrap();
        assert_eq!(fm.permalink(), Some("/feed.xml".to_string()));
        assert_eq!(content, "<rss></rss>\n");
    }

    #[test]
    fn test_empty_block() {
        let (fm, content) = extract_front_matter("---\n---\nbody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(content, "body");
    }

    #[test]
    fn test_crlf_block() {
        let (fm, content) = extract_front_matter("---\r\ntitle: Win\r\n---\r\nbody").unwrap();
        assert_eq!(fm.get_str("title"), Some("Win".to_string()));
        assert_eq!(content, "body");
    }

    #[test]
    fn test_no_block_leaves_text_untouched() {
        let text = "# Heading\n\n---\nnot: frontmatter\n---\n";
        let (fm, content) = extract_front_matter(text).unwrap();
        assert!(fm.is_empty());
        assert_eq!(content, text);
    }

    #[test]
    fn test_unclosed_block_is_not_a_block() {
        let text = "---\ntitle: nope\nno closing delimiter";
        let (fm, content) = extract_front_matter(text).unwrap();
        assert!(fm.is_empty());
        assert_eq!(content, text);
    }

    #[test]
    fn test_delimiter_must_be_alone_on_its_line() {
        let text = "---\ntitle: a\n---more";
        assert!(split_front_matter(text).is_none());

        let text = "<!--\ntitle: a\n--> trailing\n";
        assert!(split_front_matter(text).is_none());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        let err = extract_front_matter("---\ntitle: [broken\n---\nbody").unwrap_err();
        assert!(matches!(err, PagemillError::FrontMatter { .. }));
    }

    #[test]
    fn test_round_trip_reassembles_original() {
        let inputs = [
            "---\ntitle: A\n---\nbody\n",
            "---\n---\n",
            "<!--\na: 1\nb: two\n-->\n<p>x</p>",
            "---\ntitle: A\n---",
        ];
        for input in inputs {
            let block = split_front_matter(input).unwrap();
            assert_eq!(format!("{}{}", block.raw, block.rest), input);

            let (_, content) = extract_front_matter(input).unwrap();
            assert_eq!(content, block.rest);
        }
    }
}
