use scraper::Html;

use crate::dom::dom_model::Document;

/// Parse an HTML page into a mutable `Document`.
///
/// html5ever does the tree construction (implied html/head/body, table
/// fix-ups, unclosed tags); the fill engines then mutate control state on
/// top of scraper's tree and record notifications.
pub fn parse_document(html: &str, url: Option<&str>) -> Document {
    Document::from_html(Html::parse_document(html), url)
}
