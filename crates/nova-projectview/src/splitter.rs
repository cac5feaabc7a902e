use regex::Regex;
use std::sync::OnceLock;

/// One `header: body` slice of a project view, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub name: String,
    pub body: String,
}

impl RawSection {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Raw sections in document order. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSections {
    sections: Vec<RawSection>,
}

impl RawSections {
    pub fn new(sections: Vec<RawSection>) -> Self {
        Self { sections }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawSection> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn last_with_name(&self, name: &str) -> Option<&RawSection> {
        self.sections.iter().rev().find(|section| section.name == name)
    }

    pub fn all_with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawSection> + 'a {
        self.sections
            .iter()
            .filter(move |section| section.name == name)
    }
}

fn section_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A header starts at column 0 and its name can't contain `:`, `-`, `/`, `*` or whitespace.
    // The trailing `:` (or space, for `import path`) belongs to the header.
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[^:\-/*\s]+[: ]").expect("section header regex should compile")
    })
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#.*(?:\n|\z)").expect("comment regex should compile"))
}

/// Split project view text into raw sections.
///
/// Comments (`#` up to the end of the line) are replaced by a single newline so line
/// structure outside of them is preserved. Everything before the first header is dropped.
/// This never fails: text that doesn't contain a header simply yields no sections.
pub fn split_raw_sections(content: &str) -> RawSections {
    let content = comment_regex().replace_all(content, "\n");

    let headers: Vec<_> = section_header_regex().find_iter(&content).collect();
    let sections = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let header_text = header.as_str();
            // Drop the `:`/space terminator; it's always a single ASCII byte.
            let name = &header_text[..header_text.len() - 1];
            let body_end = headers
                .get(idx + 1)
                .map_or(content.len(), |next| next.start());
            RawSection::new(name, &content[header.end()..body_end])
        })
        .collect();

    RawSections::new(sections)
}
