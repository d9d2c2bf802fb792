//! HTML rendering based on [maud](https://maud.lambda.xyz/) plus the few common elements pages need.

pub use maud::{html, Markup, PreEscaped, Render, DOCTYPE};

/// Stylesheet providing the `fa` icon classes used by the components
pub const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";

/// Renders into a `<head>` tag with builder-like interface
pub struct Head<'a> {
    title: &'a str,
    viewport: Option<&'a str>,
    stylesheets: Vec<&'a str>,
    styles: Vec<&'a str>,
}

impl<'a> Head<'a> {
    pub fn with_title(title: &'a str) -> Self {
        Self::default().title(title)
    }
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }
    pub fn css(mut self, path: &'a str) -> Self {
        self.stylesheets.push(path);
        self
    }
    pub fn style(mut self, style: &'a str) -> Self {
        self.styles.push(style);
        self
    }
}

impl<'a> Default for Head<'a> {
    fn default() -> Self {
        Self {
            title: "Todo",
            viewport: Some("width=device-width, initial-scale=1.0"),
            stylesheets: vec![FONT_AWESOME_CSS],
            styles: vec![],
        }
    }
}

impl<'a> Render for Head<'a> {
    fn render(&self) -> Markup {
        html!(
            head {
                meta charset="utf-8";
                title {(self.title)}
                @if let Some(viewport) = self.viewport { meta name="viewport" content=(viewport); }
                @for stylesheet in &self.stylesheets {
                    link href=(stylesheet) rel="stylesheet";
                }
                @for style in &self.styles {
                    style {(PreEscaped(style))}
                }
            }
        )
    }
}

/// Wraps content into a full html document
pub fn into_page(head: Head, content: Markup) -> Markup {
    html! {(DOCTYPE) html {(head)
        body {
            (content)
        }
    }}
}
