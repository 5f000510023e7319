//! Blog feed assembly: post cards for the listings, full detail views, and
//! the view-count labels that ride along with both.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;

use serde_json::json;

use crate::application::render::{self, RenderError};
use crate::application::views::{ViewsAggregator, view_count_label};
use crate::domain::content::{self, Post};
use crate::presentation::views::{BlogIndexContext, PostCard, PostDetailContext};
use crate::util::dates;

const HOME_POST_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("post body failed to render: {0}")]
    Render(#[from] RenderError),
}

#[derive(Clone)]
pub struct FeedService {
    aggregator: Arc<ViewsAggregator>,
}

impl FeedService {
    pub fn new(aggregator: Arc<ViewsAggregator>) -> Self {
        Self { aggregator }
    }

    /// Cards for the homepage: the most recent posts.
    pub async fn home_cards(&self) -> Vec<PostCard> {
        let posts = content::recent_posts(HOME_POST_LIMIT);
        self.cards_for(&posts).await
    }

    /// Cards for the blog index, newest first.
    pub async fn blog_cards(&self) -> Vec<PostCard> {
        let posts = content::posts_by_date();
        self.cards_for(&posts).await
    }

    /// Full blog index context: cards plus the structured-data payload.
    pub async fn blog_context(&self) -> BlogIndexContext {
        let posts = self.blog_cards().await;
        let posts_ld_json = posts_ld_json(&posts);
        BlogIndexContext {
            posts,
            posts_ld_json,
        }
    }

    /// Full detail context for one post, or `None` when the slug is unknown.
    ///
    /// The returned view-count label is the tracking variant (`stored + 1`);
    /// scheduling the increment itself is the caller's explicit second step.
    pub async fn post_detail(
        &self,
        raw_slug: &str,
    ) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(post) = content::find_post(raw_slug) else {
            return Ok(None);
        };

        let slugs = content::post_slugs();
        let counts = self.aggregator.all_counts(&slugs).await;
        let views_label = view_count_label(post.slug, &counts, true);

        let body = render::render_markdown(post.body_markdown)?;

        Ok(Some(PostDetailContext {
            slug: post.slug.to_string(),
            title: post.title.to_string(),
            excerpt: post.excerpt.to_string(),
            published: content::format_human_date(post.date),
            iso_date: content::format_iso_date(post.date),
            tags: post.tags.iter().map(|tag| tag.to_string()).collect(),
            reading_minutes: body.reading_minutes,
            views_label,
            body_html: body.html,
            has_code_blocks: body.has_code_blocks,
        }))
    }

    async fn cards_for(&self, posts: &[&'static Post]) -> Vec<PostCard> {
        let slugs = content::post_slugs();
        let counts = self.aggregator.all_counts(&slugs).await;
        let today = OffsetDateTime::now_utc().date();

        posts
            .iter()
            .map(|post| PostCard {
                slug: post.slug.to_string(),
                title: post.title.to_string(),
                excerpt: post.excerpt.to_string(),
                published: content::format_human_date(post.date),
                relative: dates::relative_label(post.date, today),
                iso_date: content::format_iso_date(post.date),
                tags: post.tags.iter().map(|tag| tag.to_string()).collect(),
                views_label: view_count_label(post.slug, &counts, false),
            })
            .collect()
    }
}

/// Schema.org `ItemList` for the blog index, or `None` when there is nothing
/// to announce.
fn posts_ld_json(posts: &[PostCard]) -> Option<String> {
    if posts.is_empty() {
        return None;
    }

    let elements: Vec<serde_json::Value> = posts
        .iter()
        .enumerate()
        .map(|(index, card)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "url": format!("/blog/{}", card.slug),
                "name": card.title,
            })
        })
        .collect();

    let payload = json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "itemListElement": elements,
    });

    serde_json::to_string(&payload).ok()
}
