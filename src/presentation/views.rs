use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_content(self, title: String, description: String) -> Self {
        Self {
            title,
            description,
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    pub fn with_meta(self, meta: PageMetaView) -> Self {
        Self { meta, ..self }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub published: String,
    pub relative: String,
    pub iso_date: String,
    pub tags: Vec<String>,
    pub views_label: Option<String>,
}

pub struct HomeContext {
    pub tagline: String,
    pub recent: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeContext>,
}

pub struct BlogIndexContext {
    pub posts: Vec<PostCard>,
    pub posts_ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogIndexTemplate {
    pub view: LayoutContext<BlogIndexContext>,
}

pub struct PostDetailContext {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub published: String,
    pub iso_date: String,
    pub tags: Vec<String>,
    pub reading_minutes: u64,
    pub views_label: Option<String>,
    pub body_html: String,
    pub has_code_blocks: bool,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

#[derive(Clone)]
pub struct ProjectCard {
    pub name: String,
    pub tagline: String,
    pub url: Option<String>,
    pub stack: Vec<String>,
    pub status_label: String,
}

pub struct ProjectsContext {
    pub projects: Vec<ProjectCard>,
}

#[derive(Template)]
#[template(path = "projects.html")]
pub struct ProjectsTemplate {
    pub view: LayoutContext<ProjectsContext>,
}

#[derive(Clone)]
pub struct TestimonialView {
    pub author: String,
    pub role: String,
    pub quote: String,
    pub link: Option<String>,
}

pub struct TestimonialGroup {
    pub heading: String,
    pub entries: Vec<TestimonialView>,
}

pub struct TestimonialsContext {
    pub groups: Vec<TestimonialGroup>,
}

#[derive(Template)]
#[template(path = "testimonials.html")]
pub struct TestimonialsTemplate {
    pub view: LayoutContext<TestimonialsContext>,
}

#[derive(Clone)]
pub struct BookmarkView {
    pub title: String,
    pub url: String,
    pub note: String,
    pub topic: String,
}

pub struct BookmarksContext {
    pub bookmarks: Vec<BookmarkView>,
}

#[derive(Template)]
#[template(path = "bookmarks.html")]
pub struct BookmarksTemplate {
    pub view: LayoutContext<BookmarksContext>,
}

#[derive(Clone)]
pub struct SnippetView {
    pub anchor: String,
    pub title: String,
    pub language: String,
    pub description: String,
    pub body_html: String,
}

pub struct SnippetsContext {
    pub snippets: Vec<SnippetView>,
    pub has_code_blocks: bool,
}

#[derive(Template)]
#[template(path = "snippets.html")]
pub struct SnippetsTemplate {
    pub view: LayoutContext<SnippetsContext>,
}

#[derive(Clone)]
pub struct ResourceView {
    pub title: String,
    pub url: String,
    pub blurb: String,
}

pub struct ResourcesContext {
    pub resources: Vec<ResourceView>,
}

#[derive(Template)]
#[template(path = "resources.html")]
pub struct ResourcesTemplate {
    pub view: LayoutContext<ResourcesContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to continue exploring.".to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
