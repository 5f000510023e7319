//! Static site surfaces: layout chrome and the non-blog collection pages.

use crate::application::render::{self, RenderError};
use crate::config::SiteSettings;
use crate::domain::content::{self, TestimonialKind};
use crate::domain::slug::AnchorSlugger;
use crate::presentation::views::{
    BookmarkView, BookmarksContext, BrandView, FooterView, LayoutChrome, NavigationLinkView,
    NavigationView, PageMetaView, ProjectCard, ProjectsContext, ResourceView, ResourcesContext,
    SnippetView, SnippetsContext, TestimonialGroup, TestimonialView, TestimonialsContext,
};

/// The public route table, in navigation order.
pub const NAV_ROUTES: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/blog", "Blog"),
    ("/projects", "Projects"),
    ("/testimonials", "Testimonials"),
    ("/bookmarks", "Bookmarks"),
    ("/snippets", "Snippets"),
    ("/resources", "Resources"),
];

#[derive(Clone)]
pub struct SiteService {
    settings: SiteSettings,
}

impl SiteService {
    pub fn new(settings: SiteSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Layout chrome shared by every page, with the active route marked.
    pub fn chrome(&self, active_path: &str) -> LayoutChrome {
        let entries = NAV_ROUTES
            .iter()
            .map(|(href, label)| NavigationLinkView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                is_active: *href == active_path,
            })
            .collect();

        LayoutChrome {
            brand: BrandView {
                title: self.settings.title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: format!("© {}", self.settings.author),
            },
            meta: PageMetaView {
                title: self.settings.title.clone(),
                description: self.settings.description.clone(),
                canonical: self.settings.base_url.to_string(),
            },
        }
    }

    pub fn projects_context(&self) -> ProjectsContext {
        let projects = content::PROJECTS
            .iter()
            .map(|project| ProjectCard {
                name: project.name.to_string(),
                tagline: project.tagline.to_string(),
                url: project.url.map(str::to_string),
                stack: project.stack.iter().map(|item| item.to_string()).collect(),
                status_label: project.status.label().to_string(),
            })
            .collect();

        ProjectsContext { projects }
    }

    pub fn testimonials_context(&self) -> TestimonialsContext {
        let groups = TestimonialKind::ALL
            .into_iter()
            .map(|kind| TestimonialGroup {
                heading: kind.heading().to_string(),
                entries: content::testimonials_of_kind(kind)
                    .into_iter()
                    .map(|testimonial| TestimonialView {
                        author: testimonial.author.to_string(),
                        role: testimonial.role.to_string(),
                        quote: testimonial.quote.to_string(),
                        link: testimonial.link.map(str::to_string),
                    })
                    .collect(),
            })
            .collect();

        TestimonialsContext { groups }
    }

    pub fn bookmarks_context(&self) -> BookmarksContext {
        let bookmarks = content::BOOKMARKS
            .iter()
            .map(|bookmark| BookmarkView {
                title: bookmark.title.to_string(),
                url: bookmark.url.to_string(),
                note: bookmark.note.to_string(),
                topic: bookmark.topic.to_string(),
            })
            .collect();

        BookmarksContext { bookmarks }
    }

    /// Snippets with rendered bodies and unique in-page anchors.
    pub fn snippets_context(&self) -> Result<SnippetsContext, RenderError> {
        let mut slugger = AnchorSlugger::new();
        let mut snippets = Vec::with_capacity(content::SNIPPETS.len());
        let mut has_code_blocks = false;

        for snippet in content::SNIPPETS.iter() {
            let anchor = slugger
                .anchor_for(snippet.title)
                .unwrap_or_else(|_| format!("snippet-{}", snippets.len() + 1));
            let body = render::render_markdown(snippet.body_markdown)?;
            has_code_blocks |= body.has_code_blocks;

            snippets.push(SnippetView {
                anchor,
                title: snippet.title.to_string(),
                language: snippet.language.to_string(),
                description: snippet.description.to_string(),
                body_html: body.html,
            });
        }

        Ok(SnippetsContext {
            snippets,
            has_code_blocks,
        })
    }

    pub fn resources_context(&self) -> ResourcesContext {
        let resources = content::RESOURCES
            .iter()
            .map(|resource| ResourceView {
                title: resource.title.to_string(),
                url: resource.url.to_string(),
                blurb: resource.blurb.to_string(),
            })
            .collect();

        ResourcesContext { resources }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSettings;

    fn service() -> SiteService {
        SiteService::new(SiteSettings::default())
    }

    #[test]
    fn chrome_marks_the_active_route() {
        let chrome = service().chrome("/blog");

        let active: Vec<&str> = chrome
            .navigation
            .entries
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.href.as_str())
            .collect();
        assert_eq!(active, vec!["/blog"]);
        assert_eq!(chrome.navigation.entries.len(), NAV_ROUTES.len());
    }

    #[test]
    fn snippet_anchors_are_unique() {
        let context = service().snippets_context().expect("snippets");

        let mut anchors: Vec<&str> = context
            .snippets
            .iter()
            .map(|snippet| snippet.anchor.as_str())
            .collect();
        let before = anchors.len();
        anchors.sort_unstable();
        anchors.dedup();
        assert_eq!(anchors.len(), before);
        assert!(context.has_code_blocks);
    }

    #[test]
    fn testimonial_groups_follow_kind_order() {
        let context = service().testimonials_context();
        let headings: Vec<&str> = context
            .groups
            .iter()
            .map(|group| group.heading.as_str())
            .collect();
        assert_eq!(headings, vec!["Clients", "Leads", "Colleagues"]);
    }
}
