//! Site content model.
//!
//! All content ships with the binary: posts carry markdown bodies rendered at
//! request time, the remaining collections are plain structured data. The
//! authored entries live in `content/data.rs`.

mod data;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use time::{Date, format_description::FormatItem, macros::format_description};

pub use data::{BOOKMARKS, POSTS, PROJECTS, RESOURCES, SNIPPETS, TESTIMONIALS};

use crate::domain::error::DomainError;
use crate::domain::slug;

static POSTS_BY_SLUG: Lazy<HashMap<&'static str, &'static Post>> =
    Lazy::new(|| POSTS.iter().map(|post| (post.slug, post)).collect());

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Clone)]
pub struct Post {
    pub slug: &'static str,
    pub title: &'static str,
    pub excerpt: &'static str,
    pub date: Date,
    pub tags: &'static [&'static str],
    pub body_markdown: &'static str,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Live,
    InProgress,
    Archived,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Live => "Live",
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Archived => "Archived",
        }
    }
}

#[derive(Clone)]
pub struct Project {
    pub slug: &'static str,
    pub name: &'static str,
    pub tagline: &'static str,
    pub url: Option<&'static str>,
    pub stack: &'static [&'static str],
    pub status: ProjectStatus,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TestimonialKind {
    Client,
    Lead,
    Colleague,
}

impl TestimonialKind {
    pub const ALL: [TestimonialKind; 3] = [
        TestimonialKind::Client,
        TestimonialKind::Lead,
        TestimonialKind::Colleague,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            TestimonialKind::Client => "Clients",
            TestimonialKind::Lead => "Leads",
            TestimonialKind::Colleague => "Colleagues",
        }
    }
}

#[derive(Clone)]
pub struct Testimonial {
    pub author: &'static str,
    pub role: &'static str,
    pub kind: TestimonialKind,
    pub quote: &'static str,
    pub link: Option<&'static str>,
}

#[derive(Clone)]
pub struct Bookmark {
    pub title: &'static str,
    pub url: &'static str,
    pub note: &'static str,
    pub topic: &'static str,
}

#[derive(Clone)]
pub struct Snippet {
    pub title: &'static str,
    pub language: &'static str,
    pub description: &'static str,
    pub body_markdown: &'static str,
}

#[derive(Clone)]
pub struct Resource {
    pub title: &'static str,
    pub url: &'static str,
    pub blurb: &'static str,
}

pub fn all_posts() -> &'static [Post] {
    &POSTS
}

/// Posts in reverse chronological order.
pub fn posts_by_date() -> Vec<&'static Post> {
    let mut posts: Vec<&Post> = POSTS.iter().collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

pub fn recent_posts(limit: usize) -> Vec<&'static Post> {
    let mut posts = posts_by_date();
    posts.truncate(limit);
    posts
}

/// Look up a post by raw route slug; the slug is normalized first so
/// path-prefixed forms resolve to the same post.
pub fn find_post(raw_slug: &str) -> Option<&'static Post> {
    let canonical = slug::normalize(raw_slug);
    POSTS_BY_SLUG.get(canonical.as_str()).copied()
}

/// Check the authored content invariants once at startup.
///
/// Slugs double as storage key suffixes, so every post slug must already be
/// in canonical form and unique.
pub fn validate() -> Result<(), DomainError> {
    let mut seen = std::collections::BTreeSet::new();
    for post in POSTS.iter() {
        if slug::normalize(post.slug) != post.slug {
            return Err(DomainError::invariant(format!(
                "post slug `{}` is not canonical",
                post.slug
            )));
        }
        if !seen.insert(post.slug) {
            return Err(DomainError::invariant(format!(
                "duplicate post slug `{}`",
                post.slug
            )));
        }
    }
    Ok(())
}

/// Canonical slugs of every post, in reverse chronological order.
pub fn post_slugs() -> Vec<&'static str> {
    posts_by_date().into_iter().map(|post| post.slug).collect()
}

pub fn testimonials_of_kind(kind: TestimonialKind) -> Vec<&'static Testimonial> {
    TESTIMONIALS.iter().filter(|t| t.kind == kind).collect()
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).expect("valid calendar date")
}
