//! Sitemap and robots.txt generation from the route table and content set.

use url::Url;

use crate::application::site::NAV_ROUTES;
use crate::domain::content;

#[derive(Clone)]
pub struct SitemapService {
    base_url: Url,
}

impl SitemapService {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn sitemap_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );

        for (path, _) in NAV_ROUTES {
            self.push_url(&mut xml, path, None);
        }
        for post in content::posts_by_date() {
            let path = format!("/blog/{}", post.slug);
            self.push_url(&mut xml, &path, Some(content::format_iso_date(post.date)));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\n\nSitemap: {}\n",
            self.absolute("/sitemap.xml")
        )
    }

    fn push_url(&self, xml: &mut String, path: &str, lastmod: Option<String>) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", self.absolute(path)));
        if let Some(date) = lastmod {
            xml.push_str(&format!("    <lastmod>{date}</lastmod>\n"));
        }
        xml.push_str("  </url>\n");
    }

    fn absolute(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{trimmed}")
        }
    }
}
