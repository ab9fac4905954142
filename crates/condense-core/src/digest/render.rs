//! HTML rendering of a digest

use std::fmt::Write;

use chrono::NaiveDate;

use super::types::SummarizedArticle;

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; }
    .header { background: #4f5bd5; color: white; padding: 30px; text-align: center; border-radius: 10px; margin-bottom: 30px; }
    .source { margin: 25px 0; }
    .source h3 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
    .article { margin: 20px 0; padding: 20px; border-left: 5px solid #3498db; background-color: #f8f9fa; border-radius: 5px; }
    .article-title { font-size: 18px; font-weight: bold; margin-bottom: 10px; }
    .article-meta { font-size: 12px; color: #666; margin-bottom: 10px; }
    .article-link { color: #3498db; text-decoration: none; font-weight: bold; }
    .footer { margin-top: 40px; padding: 20px; background-color: #f4f4f4; text-align: center; border-radius: 10px; font-size: 12px; color: #666; }
"#;

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Group articles by source, keeping the order in which sources first appear
pub fn group_by_source(articles: &[SummarizedArticle]) -> Vec<(&str, Vec<&SummarizedArticle>)> {
    let mut groups: Vec<(&str, Vec<&SummarizedArticle>)> = Vec::new();
    for item in articles {
        let source = item.article.source.as_str();
        match groups.iter().position(|(name, _)| *name == source) {
            Some(i) => groups[i].1.push(item),
            None => groups.push((source, vec![item])),
        }
    }
    groups
}

/// Render the digest as a standalone HTML document
pub fn render_digest(date: NaiveDate, articles: &[SummarizedArticle]) -> String {
    let groups = group_by_source(articles);
    let mut html = String::new();

    // writes into a String cannot fail
    let _ = write!(
        html,
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{}</style>\n</head>\n<body>\n\
         <div class=\"header\">\n<h1>AI &amp; Gen AI News Digest</h1>\n\
         <p>{} | Top {} Articles from {} Sources</p>\n</div>\n",
        STYLE,
        date.format("%B %d, %Y"),
        articles.len(),
        groups.len()
    );

    for (source, members) in &groups {
        let _ = write!(
            html,
            "<div class=\"source\"><h3>{}</h3>\n",
            escape_html(source)
        );
        for item in members {
            let article = &item.article;
            let published = if article.published.trim().is_empty() {
                "unknown".to_string()
            } else {
                escape_html(&article.published)
            };
            let _ = write!(
                html,
                "<div class=\"article\">\n\
                 <div class=\"article-title\">{}</div>\n\
                 <div class=\"article-meta\">Category: {} | Published: {}</div>\n\
                 <div class=\"article-summary\">{}</div>\n\
                 <a href=\"{}\" class=\"article-link\">Read full article &rarr;</a>\n\
                 </div>\n",
                escape_html(&article.title),
                escape_html(&article.category),
                published,
                escape_html(&item.digest_summary),
                escape_html(&article.link),
            );
        }
        html.push_str("</div>\n");
    }

    html.push_str(
        "<div class=\"footer\">\n\
         <p>This digest is generated automatically from AI news feeds.</p>\n\
         <p>Sources are selected by their recent publishing activity.</p>\n\
         </div>\n</body>\n</html>\n",
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::types::Article;

    fn item(source: &str, title: &str) -> SummarizedArticle {
        SummarizedArticle {
            article: Article {
                title: title.to_string(),
                link: format!("https://example.com/{}", title),
                published: "Mon, 13 Oct 2025 10:00:00 GMT".to_string(),
                summary: "raw".to_string(),
                source: source.to_string(),
                category: "Research".to_string(),
            },
            digest_summary: format!("about {}", title),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_grouping_keeps_first_appearance_order() {
        let articles = vec![item("B", "one"), item("A", "two"), item("B", "three")];
        let groups = group_by_source(&articles);

        let names: Vec<_> = groups.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].article.title, "three");
    }

    #[test]
    fn test_render_header_and_sections() {
        let articles = vec![item("B", "one"), item("A", "two"), item("B", "three")];
        let html = render_digest(date(), &articles);

        assert!(html.contains("October 18, 2025 | Top 3 Articles from 2 Sources"));
        let b = html.find("<h3>B</h3>").unwrap();
        let a = html.find("<h3>A</h3>").unwrap();
        assert!(b < a);
        assert!(html.contains("about three"));
        assert!(html.contains("href=\"https://example.com/one\""));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_render_escapes_feed_text() {
        let mut hostile = item("<script>", "x");
        hostile.article.title = "<b>bold</b>".to_string();
        hostile.digest_summary = "a < b & c".to_string();
        let html = render_digest(date(), &[hostile]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_render_empty() {
        let html = render_digest(date(), &[]);
        assert!(html.contains("Top 0 Articles from 0 Sources"));
    }
}
