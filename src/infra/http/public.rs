use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{
        error::HttpError,
        feed::{FeedError, FeedService},
        site::SiteService,
        sitemap::SitemapService,
        views::{ViewCounter, ViewStore},
    },
    cache::{CacheState, response_cache_layer},
    presentation::views::{
        BlogIndexTemplate, BookmarksTemplate, IndexTemplate, LayoutChrome, LayoutContext,
        PageMetaView, PostDetailContext, PostTemplate, ProjectsTemplate, ResourcesTemplate,
        SnippetsTemplate, TestimonialsTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    middleware::{log_responses, set_request_context},
    store_health_response,
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub site: Arc<SiteService>,
    pub sitemap: Arc<SitemapService>,
    pub counter: Arc<ViewCounter>,
    pub store: Arc<dyn ViewStore>,
    pub cache: Option<CacheState>,
}

pub fn build_router(state: HttpState) -> Router {
    // Routes that flow through the response cache (public content).
    let cached_routes = Router::new()
        .route("/", get(index))
        .route("/blog", get(blog_index))
        .route("/blog/{slug}", get(post_detail))
        .route("/projects", get(projects))
        .route("/testimonials", get(testimonials))
        .route("/bookmarks", get(bookmarks))
        .route("/snippets", get(snippets))
        .route("/resources", get(resources))
        .route("/sitemap.xml", get(sitemap))
        .fallback(not_found);

    let cached_routes = if let Some(cache_state) = state.cache.clone() {
        cached_routes.layer(middleware::from_fn_with_state(
            cache_state,
            response_cache_layer,
        ))
    } else {
        cached_routes
    };

    // Routes that bypass the cache (health, robots, immutable assets).
    let static_routes = Router::new()
        .route("/robots.txt", get(robots_txt))
        .route("/_health/store", get(store_health))
        .route("/static/{*path}", get(crate::infra::assets::serve_static));

    cached_routes
        .merge(static_routes)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/");
    let recent = state.feed.home_cards().await;

    let content = crate::presentation::views::HomeContext {
        tagline: state.site.settings().description.clone(),
        recent,
    };
    let canonical = canonical_url(&chrome.meta.canonical, "/");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

async fn blog_index(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/blog");
    let content = state.feed.blog_context().await;
    let canonical = canonical_url(&chrome.meta.canonical, "/blog");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(BlogIndexTemplate { view }, StatusCode::OK)
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let chrome = state.site.chrome("/blog");

    match state.feed.post_detail(&slug).await {
        Ok(Some(content)) => {
            // Two-phase tracking: the optimistic label is already in the
            // context; recording the view is scheduled here, explicitly,
            // detached from this request.
            state.counter.clone().schedule_increment(&content.slug);

            let canonical =
                canonical_url(&chrome.meta.canonical, &format!("/blog/{}", content.slug));
            let meta = post_meta(&chrome, &content, canonical);
            let view = LayoutContext::new(chrome.clone().with_meta(meta), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => feed_error_to_response(err),
    }
}

async fn projects(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/projects");
    let content = state.site.projects_context();
    let canonical = canonical_url(&chrome.meta.canonical, "/projects");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(ProjectsTemplate { view }, StatusCode::OK)
}

async fn testimonials(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/testimonials");
    let content = state.site.testimonials_context();
    let canonical = canonical_url(&chrome.meta.canonical, "/testimonials");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(TestimonialsTemplate { view }, StatusCode::OK)
}

async fn bookmarks(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/bookmarks");
    let content = state.site.bookmarks_context();
    let canonical = canonical_url(&chrome.meta.canonical, "/bookmarks");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(BookmarksTemplate { view }, StatusCode::OK)
}

async fn snippets(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/snippets");

    match state.site.snippets_context() {
        Ok(content) => {
            let canonical = canonical_url(&chrome.meta.canonical, "/snippets");
            let view = LayoutContext::new(chrome.with_canonical(canonical), content);
            render_template_response(SnippetsTemplate { view }, StatusCode::OK)
        }
        Err(err) => HttpError::from_error(
            "infra::http::public::snippets",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render snippets",
            &err,
        )
        .into_response(),
    }
}

async fn resources(State(state): State<HttpState>) -> Response {
    let chrome = state.site.chrome("/resources");
    let content = state.site.resources_context();
    let canonical = canonical_url(&chrome.meta.canonical, "/resources");
    let view = LayoutContext::new(chrome.with_canonical(canonical), content);
    render_template_response(ResourcesTemplate { view }, StatusCode::OK)
}

async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.site.chrome(""))
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    xml_response(state.sitemap.sitemap_xml(), "application/xml")
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    plain_response(state.sitemap.robots_txt())
}

async fn store_health(State(state): State<HttpState>) -> Response {
    store_health_response(state.store.health().await)
}

fn feed_error_to_response(err: FeedError) -> Response {
    HttpError::from_error(
        "infra::http::public::post_detail",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to render post",
        &err,
    )
    .into_response()
}

pub(crate) fn post_meta(
    chrome: &LayoutChrome,
    content: &PostDetailContext,
    canonical: String,
) -> PageMetaView {
    let description = fallback_description(&content.excerpt, &chrome.meta.description);

    chrome
        .meta
        .clone()
        .with_canonical(canonical)
        .with_content(content.title.clone(), description)
}

fn fallback_description(candidate: &str, fallback: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_public_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root.clone()
    } else {
        format!("{root}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

fn xml_response(body: String, content_type: &str) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn plain_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_joins_base_and_path() {
        assert_eq!(
            canonical_url("https://example.test", "/blog"),
            "https://example.test/blog"
        );
        assert_eq!(
            canonical_url("https://example.test/", "/"),
            "https://example.test/"
        );
    }
}
