use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

use crate::{bookmark::Bookmark, tag::join_tags};

pub static ENVIRONMENT: Lazy<Environment> = Lazy::new(|| {
    let mut e = Environment::new();
    e.set_undefined_behavior(UndefinedBehavior::Strict);
    e.set_auto_escape_callback(|_| AutoEscape::None);
    e
});

const SHORT: &str = "{{ url }}";
const LONG: &str = "{% if unread %}[#]{% endif %}{% if private %}[*]{% endif %}{{ title }}
{{ url }}{% if extended %}
{{ extended }}{% endif %}
{{ tags }}";

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        r#"Failed to initialise template string.
            Template:   {template}
            Error:      {error}"#
    )]
    TemplateInitialisationError {
        template: String,
        error: Box<minijinja::Error>,
    },
    #[error(
        r#"Failed to render template string.
            Template:   {template}
            Bookmark:   {url}
            Error:      {error}"#
    )]
    RenderFailure {
        template: String,
        url: String,
        error: Box<minijinja::Error>,
    },
}

/// How `ls` prints each bookmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// Just the URL.
    Short,
    /// Markers, title, URL, extended text and tags, followed by a blank line.
    Long,
    Custom(String),
}

impl Format {
    pub fn template(&self) -> Template {
        match self {
            Format::Short => Template::new(SHORT.to_owned()),
            Format::Long => Template::new(LONG.to_owned()),
            Format::Custom(s) => Template::new(s.clone()),
        }
    }

    /// Whether records are separated by a blank line.
    pub fn spaced(&self) -> bool {
        matches!(self, Format::Long)
    }
}

/// A template string
pub struct Template(String);
impl Template {
    pub fn new(string: String) -> Self {
        Self(string)
    }

    /// Compile without rendering, so a broken template fails before any request is made.
    pub fn check(&self) -> Result<(), Error> {
        // Syntax doesn't depend on environment settings.
        let env = Environment::new();
        env.template_from_str(&self.0)
            .map(|_| ())
            .map_err(|e| Error::TemplateInitialisationError {
                template: self.0.clone(),
                error: Box::new(e),
            })
    }

    /// Substitute the keys in a template string with the bookmark's fields
    pub fn render(&self, bookmark: &Bookmark) -> Result<String, Error> {
        ENVIRONMENT
            .render_str(&self.0, context_value(bookmark))
            .map_err(|e| match e.kind() {
                ErrorKind::SyntaxError => Error::TemplateInitialisationError {
                    template: self.0.clone(),
                    error: Box::new(e),
                },
                _ => Error::RenderFailure {
                    template: self.0.clone(),
                    url: bookmark.url.clone(),
                    error: Box::new(e),
                },
            })
    }
}

#[derive(Serialize)]
pub(crate) struct BookmarkView<'a> {
    url: &'a str,
    title: &'a str,
    extended: &'a str,
    tags: String,
    shared: bool,
    private: bool,
    unread: bool,
}

impl<'a> From<&'a Bookmark> for BookmarkView<'a> {
    fn from(b: &'a Bookmark) -> Self {
        BookmarkView {
            url: &b.url,
            title: &b.title,
            extended: &b.extended,
            tags: join_tags(&b.tags),
            shared: b.shared,
            private: !b.shared,
            unread: b.unread,
        }
    }
}

/// Build the MiniJinja value map used to render a bookmark.
pub fn context_value(bookmark: &Bookmark) -> Value {
    Value::from_serialize(BookmarkView::from(bookmark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::parse_tags;

    fn bookmark(url: &str, shared: bool, unread: bool) -> Bookmark {
        Bookmark {
            url: url.to_owned(),
            title: "Title".to_owned(),
            extended: String::new(),
            tags: parse_tags("rust cli"),
            shared,
            unread,
        }
    }

    #[test]
    fn long_format_markers() {
        let long = Format::Long.template();
        assert_eq!(
            long.render(&bookmark("https://a.example", true, true)).unwrap(),
            "[#]Title\nhttps://a.example\ncli rust"
        );
        assert_eq!(
            long.render(&bookmark("https://b.example", false, false)).unwrap(),
            "[*]Title\nhttps://b.example\ncli rust"
        );
        assert_eq!(
            long.render(&bookmark("https://c.example", false, true)).unwrap(),
            "[#][*]Title\nhttps://c.example\ncli rust"
        );
    }

    #[test]
    fn long_format_includes_extended_text() {
        let mut b = bookmark("https://a.example", true, false);
        b.extended = "worth a read".to_owned();
        assert_eq!(
            Format::Long.template().render(&b).unwrap(),
            "Title\nhttps://a.example\nworth a read\ncli rust"
        );
    }

    #[test]
    fn custom_template_fields() {
        let template = Template::new("{{ title }} <{{ url }}> {{ tags }}".to_owned());
        assert_eq!(
            template.render(&bookmark("https://a.example", true, false)).unwrap(),
            "Title <https://a.example> cli rust"
        );
    }

    #[test]
    fn unknown_field_is_error() {
        let template = Template::new("{{ nonsense }}".to_owned());
        assert!(template.check().is_ok());
        let result = template.render(&bookmark("https://a.example", true, false));
        assert!(matches!(result, Err(Error::RenderFailure { .. })));
    }

    #[test]
    fn broken_template_fails_check() {
        let template = Template::new("{{ url ".to_owned());
        assert!(matches!(
            template.check(),
            Err(Error::TemplateInitialisationError { .. })
        ));
    }
}
