//! HTML views.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Every page template wraps itself in the `layout` partial, which draws the
//! navigation and highlights the active tab with the `eq` helper.

use axum::response::Html;
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use thiserror::Error;

macro_rules! template {
    ($path:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/views/", $path))
    };
}

const LAYOUT: &str = template!("layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("index", template!("index.hbs")),
    ("login", template!("login.hbs")),
    ("register", template!("register.hbs")),
    ("user/index", template!("user/index.hbs")),
];

handlebars_helper!(strict_eq: |left: Json, right: Json| left == right);

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),
    #[error("render failed: {0}")]
    Render(#[from] handlebars::RenderError),
}

pub struct Views {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views")
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

impl Views {
    /// # Errors
    /// Returns an error if a bundled template does not parse.
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_helper("eq", Box::new(strict_eq));
        registry
            .register_partial("layout", LAYOUT)
            .map_err(Box::new)?;

        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    /// # Errors
    /// Returns an error for an unknown template or a failed render.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, ViewError> {
        Ok(Html(self.registry.render(name, context)?))
    }

    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

/// Data handed to a page template. Unset fields are left out of the context.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PageContext<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
}

impl<'a> PageContext<'a> {
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tab(mut self, tab: &'a str) -> Self {
        self.tab = Some(tab);
        self
    }

    #[must_use]
    pub fn header(mut self, header: &'a str) -> Self {
        self.header = Some(header);
        self
    }

    #[must_use]
    pub fn msg(mut self, msg: &'a str) -> Self {
        self.msg = Some(msg);
        self
    }

    #[must_use]
    pub fn error(mut self, error: &'a str) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn username(mut self, username: &'a str) -> Self {
        self.username = Some(username);
        self
    }
}
