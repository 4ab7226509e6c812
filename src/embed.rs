//! Embed descriptors and template rendering
//!
//! An embed is the HTML fragment that represents one accepted notification
//! inside the target document. Verification produces an `EmbedDescriptor`
//! holding the template variables, the merger renders it against either a
//! template stored as a repository property or the built-in one for its kind.
//!
//! Templates use `${name}` placeholders. Every user supplied value `x` is
//! available escaped as `${x}` and raw as `${x_unsafe}`. The raw form is only
//! used by the built-in templates inside URL attributes, for values the
//! verifier already checked to be URLs.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::warn;
use regex::{Captures, Regex};

/// Suffix of the variable holding the unescaped form of a value.
pub const UNSAFE_SUFFIX: &str = "_unsafe";

/// Template for verified mentions from another site.
pub const DEFAULT_TEMPLATE: &str =
    r#"<iframe class="u-mention" src="${source_unsafe}" title="${source}"></iframe>"#;

/// Template for comments submitted through the site itself.
pub const LOCAL_COMMENT_TEMPLATE: &str = r#"<article class="h-entry p-comment"><p class="p-author h-card">${author}</p><div class="e-content">${content}</div></article>"#;

/// Id of the element all embeds live under.
pub const WEBMENTIONS_ANCHOR: &str = "webmentions";

/// What produced an embed, which decides where it goes and how it is
/// deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    /// A mention verified against a remote source.
    Default,
    /// A comment posted directly to this site.
    LocalComment,
}

impl EmbedKind {
    /// Id of the sub-anchor under `webmentions` that receives this kind.
    pub fn anchor_id(self) -> &'static str {
        match self {
            EmbedKind::Default => "comments",
            EmbedKind::LocalComment => "comments",
        }
    }

    /// Attributes of an existing embed compared against the descriptor
    /// identity when deduplicating. A repository template must put the
    /// source URL in one of these on its root element to be deduplicated.
    pub fn identity_attributes(self) -> &'static [&'static str] {
        &["src", "href"]
    }

    pub fn builtin_template(self) -> &'static str {
        match self {
            EmbedKind::Default => DEFAULT_TEMPLATE,
            EmbedKind::LocalComment => LOCAL_COMMENT_TEMPLATE,
        }
    }

    /// Whether a repeat notification replaces nothing and is skipped.
    pub fn deduplicates(self) -> bool {
        !matches!(self, EmbedKind::LocalComment)
    }
}

/// Verified description of one embed, consumed once by the merger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedDescriptor {
    pub kind: EmbedKind,
    pub variables: BTreeMap<String, String>,
    pub rendered_html: String,
    /// Source-identifying value used to detect repeat notifications.
    pub identity: Option<String>,
}

impl EmbedDescriptor {
    /// Descriptor for a mention verified against `source`.
    pub fn mention(source: &str) -> Self {
        let mut variables = BTreeMap::new();
        insert_variable(&mut variables, "source", source);
        Self::build(EmbedKind::Default, variables, Some(source.to_string()))
    }

    /// Descriptor for a comment posted by `author`.
    pub fn local_comment(content: &str, author: &str) -> Self {
        let mut variables = BTreeMap::new();
        insert_variable(&mut variables, "content", content);
        insert_variable(&mut variables, "author", author);
        Self::build(EmbedKind::LocalComment, variables, None)
    }

    fn build(
        kind: EmbedKind,
        variables: BTreeMap<String, String>,
        identity: Option<String>,
    ) -> Self {
        let rendered_html = render_template(kind.builtin_template(), &variables);
        Self {
            kind,
            variables,
            rendered_html,
            identity,
        }
    }

    /// Render with a repository template, or the built-in one if `None`.
    pub fn render(&self, template: Option<&str>) -> String {
        match template {
            Some(template) => render_template(template, &self.variables),
            None => self.rendered_html.clone(),
        }
    }
}

/// Store `value` escaped under `name` and raw under `name_unsafe`.
pub fn insert_variable(variables: &mut BTreeMap<String, String>, name: &str, value: &str) {
    variables.insert(name.to_string(), escape_html(value));
    variables.insert(format!("{}{}", name, UNSAFE_SUFFIX), value.to_string());
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitute `${name}` placeholders verbatim from `variables`.
///
/// Unknown placeholders are left untouched.
pub fn render_template(template: &str, variables: &BTreeMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                warn!("template placeholder ${{{}}} has no value", &caps[1]);
                caps[0].to_string()
            }
        })
        .into_owned()
}
