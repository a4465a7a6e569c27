//! Template engine for rendering documentation pages.

use std::path::Path;

use minijinja::{context, Environment};

/// Entry template for every page.
pub const ROOT_TEMPLATE_NAME: &str = "root.html";

/// Template holding the page body; included by the root template.
pub const PAGE_TEMPLATE_NAME: &str = "page.html";

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Page description
    pub description: Option<String>,
    /// Site title
    pub site_title: String,
    /// Rendered content HTML
    pub content: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in templates.
    pub fn builtin() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template(ROOT_TEMPLATE_NAME, ROOT_TEMPLATE)?;
        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Create a template engine that loads templates from `dir`.
    ///
    /// Both `root.html` and `page.html` must exist and parse.
    pub fn from_dir(dir: &Path) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));

        env.get_template(ROOT_TEMPLATE_NAME)?;
        env.get_template(PAGE_TEMPLATE_NAME)?;

        Ok(Self { env })
    }

    /// Render a page through the root template.
    pub fn render_page(&self, context: &Context) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(ROOT_TEMPLATE_NAME)?;

        tmpl.render(context! {
            front => context! {
                title => &context.title,
                description => &context.description,
            },
            site_title => &context.site_title,
            content => &context.content,
        })
    }
}

const ROOT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ front.title }}</title>
  {% if front.description %}<meta name="description" content="{{ front.description }}">
  {% endif %}<style>
    body { font-family: system-ui, sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; }
    pre { background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }
  </style>
</head>
<body>
  <header class="site-header"><a href="/">{{ site_title }}</a></header>
  <main class="main">
    {% include "page.html" %}
  </main>
</body>
</html>"##;

const PAGE_TEMPLATE: &str = r##"<article class="doc">
  {{ content | safe }}
</article>"##;
