//! Result rendering.
//!
//! Turns raw result records into [`ResultCard`]s: a front-end independent
//! description of what one grid cell shows, as an ordered list of blocks.
//! The terminal UI and the plain-text printer both draw from these.

use crate::inline::{self, InlineNode};
use crate::model::{Infobox, ResultRecord, SearchType, Thumbnail, display_text};

/// How an image is fitted into its card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Fixed square, cropped to cover.
    Square,
    /// Full card width, natural height.
    FullWidth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub fit: ImageFit,
}

/// One vertical block of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Image(ImageView),
    /// Parsed title, optionally wrapped in an outbound link.
    Title { nodes: Vec<InlineNode>, href: Option<String> },
    /// Title shown as-is, without markup interpretation.
    Heading(String),
    /// Secondary metadata line (news source and age).
    Meta(String),
    /// Parsed body text.
    Body(Vec<InlineNode>),
    /// Small plain caption (image source).
    Caption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Web,
    News,
    Image,
    Infobox,
}

/// Display representation of a single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub kind: CardKind,
    pub blocks: Vec<Block>,
}

impl ResultCard {
    pub fn title_href(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Title { href, .. } => href.as_deref(),
            _ => None,
        })
    }
}

/// Options that affect how results are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_images: true }
    }
}

fn parsed(value: Option<&serde_json::Value>) -> Vec<InlineNode> {
    value.map(|v| inline::parse_value(v).collect()).unwrap_or_default()
}

fn image(thumbnail: &Thumbnail, alt_fallback: Option<String>, fit: ImageFit) -> Option<ImageView> {
    let src = thumbnail.src.clone()?;
    let alt = thumbnail
        .alt
        .clone()
        .filter(|a| !a.is_empty())
        .or(alt_fallback)
        .unwrap_or_default();
    Some(ImageView { src, alt, fit })
}

/// Render one result record according to the active search type.
pub fn render_result(record: &ResultRecord, search_type: SearchType, options: RenderOptions) -> ResultCard {
    match search_type {
        SearchType::Web => render_web(record, options),
        SearchType::News => render_news(record, options),
        SearchType::Image => render_image(record),
    }
}

/// Render a whole result list, preserving its order.
pub fn render_results(records: &[ResultRecord], search_type: SearchType, options: RenderOptions) -> Vec<ResultCard> {
    records
        .iter()
        .map(|r| render_result(r, search_type, options))
        .collect()
}

fn gated_thumbnail(record: &ResultRecord, options: RenderOptions) -> Option<Block> {
    if !options.show_images {
        return None;
    }
    let thumbnail = record.thumbnail.as_ref()?;
    image(thumbnail, record.title_text(), ImageFit::Square).map(Block::Image)
}

fn title_block(record: &ResultRecord) -> Block {
    Block::Title { nodes: parsed(record.title.as_ref()), href: record.url.clone() }
}

fn render_web(record: &ResultRecord, options: RenderOptions) -> ResultCard {
    let mut blocks = Vec::with_capacity(3);
    blocks.extend(gated_thumbnail(record, options));
    blocks.push(title_block(record));
    blocks.push(Block::Body(parsed(record.description.as_ref())));
    ResultCard { kind: CardKind::Web, blocks }
}

/// `hostname - age`; a missing side is left blank.
fn news_meta(record: &ResultRecord) -> String {
    let hostname = record
        .meta_url
        .as_ref()
        .and_then(|m| m.hostname.as_ref())
        .map(display_text)
        .unwrap_or_default();
    let age = record.age.as_ref().map(display_text).unwrap_or_default();
    format!("{hostname} - {age}")
}

fn render_news(record: &ResultRecord, options: RenderOptions) -> ResultCard {
    let mut blocks = Vec::with_capacity(4);
    blocks.extend(gated_thumbnail(record, options));
    blocks.push(title_block(record));
    blocks.push(Block::Meta(news_meta(record)));
    blocks.push(Block::Body(parsed(record.description.as_ref())));
    ResultCard { kind: CardKind::News, blocks }
}

fn render_image(record: &ResultRecord) -> ResultCard {
    let mut blocks = Vec::with_capacity(3);
    if let Some(view) = record
        .thumbnail
        .as_ref()
        .and_then(|t| image(&Thumbnail { alt: None, ..t.clone() }, record.title_text(), ImageFit::FullWidth))
    {
        blocks.push(Block::Image(view));
    }
    blocks.push(Block::Body(parsed(record.title.as_ref())));
    blocks.push(Block::Caption(record.source.as_ref().map(display_text).unwrap_or_default()));
    ResultCard { kind: CardKind::Image, blocks }
}

/// Render the infobox panel, or nothing when it has no entries.
pub fn render_infobox(infobox: Option<&Infobox>) -> Option<ResultCard> {
    let entry = infobox?.first()?;

    let mut blocks = Vec::with_capacity(3);
    blocks.push(Block::Heading(entry.title.as_ref().map(display_text).unwrap_or_default()));
    blocks.push(Block::Body(parsed(entry.description.as_ref())));
    if let Some(view) = entry
        .images
        .first()
        .and_then(|img| image(img, None, ImageFit::FullWidth))
    {
        blocks.push(Block::Image(view));
    }
    Some(ResultCard { kind: CardKind::Infobox, blocks })
}

/// Everything the grid shows, in order: the infobox (web searches only)
/// followed by the results.
pub fn render_grid(
    records: &[ResultRecord], infobox: Option<&Infobox>, search_type: SearchType, options: RenderOptions,
) -> Vec<ResultCard> {
    let infobox = match search_type {
        SearchType::Web => render_infobox(infobox),
        _ => None,
    };
    infobox
        .into_iter()
        .chain(render_results(records, search_type, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InfoboxEntry, MetaUrl, SearchPayload};
    use serde_json::json;

    fn record(value: serde_json::Value) -> ResultRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_web_result() {
        let r = record(json!({"title": "Cats", "description": "Feline <strong>facts</strong>", "url": "http://x"}));
        let card = render_result(&r, SearchType::Web, RenderOptions::default());

        assert_eq!(card.kind, CardKind::Web);
        assert_eq!(
            card.blocks,
            vec![
                Block::Title { nodes: vec![InlineNode::Text("Cats".into())], href: Some("http://x".into()) },
                Block::Body(vec![InlineNode::Text("Feline ".into()), InlineNode::Bold("facts".into())]),
            ]
        );
        assert_eq!(card.title_href(), Some("http://x"));
    }

    #[test]
    fn test_web_thumbnail_gated_by_visibility() {
        let r = record(json!({"title": "Cats", "thumbnail": {"src": "t.png"}}));

        let shown = render_result(&r, SearchType::Web, RenderOptions { show_images: true });
        assert_eq!(
            shown.blocks[0],
            Block::Image(ImageView { src: "t.png".into(), alt: "Cats".into(), fit: ImageFit::Square })
        );

        let hidden = render_result(&r, SearchType::Web, RenderOptions { show_images: false });
        assert!(!hidden.blocks.iter().any(|b| matches!(b, Block::Image(_))));
    }

    #[test]
    fn test_thumbnail_alt_preferred_over_title() {
        let r = record(json!({"title": "Cats", "thumbnail": {"src": "t.png", "alt": "tabby"}}));
        let card = render_result(&r, SearchType::News, RenderOptions::default());
        assert!(matches!(&card.blocks[0], Block::Image(img) if img.alt == "tabby"));
    }

    #[test]
    fn test_thumbnail_without_src_is_skipped() {
        let r = record(json!({"title": "Cats", "thumbnail": {"alt": "tabby"}}));
        let card = render_result(&r, SearchType::Web, RenderOptions::default());
        assert!(matches!(card.blocks[0], Block::Title { .. }));
    }

    #[test]
    fn test_news_meta_line() {
        let r = ResultRecord {
            title: Some(json!("Headline")),
            meta_url: Some(MetaUrl { hostname: Some(json!("news.example")) }),
            age: Some(json!("2 hours ago")),
            ..Default::default()
        };
        let card = render_result(&r, SearchType::News, RenderOptions::default());

        assert_eq!(card.kind, CardKind::News);
        assert!(matches!(card.blocks[0], Block::Title { .. }));
        assert_eq!(card.blocks[1], Block::Meta("news.example - 2 hours ago".into()));
        assert_eq!(card.blocks[2], Block::Body(vec![]));
    }

    #[test]
    fn test_null_title_renders_as_text() {
        let r = record(json!({"title": null, "description": null, "url": "http://x"}));
        let card = render_result(&r, SearchType::Web, RenderOptions::default());

        assert_eq!(
            card.blocks,
            vec![
                Block::Title { nodes: vec![InlineNode::Text("null".into())], href: Some("http://x".into()) },
                Block::Body(vec![InlineNode::Text("null".into())]),
            ]
        );
    }

    #[test]
    fn test_news_meta_null_hostname() {
        let r = record(json!({"title": "t", "meta_url": {"hostname": null}, "age": null}));
        let card = render_result(&r, SearchType::News, RenderOptions::default());
        assert_eq!(card.blocks[1], Block::Meta("null - null".into()));
    }

    #[test]
    fn test_news_meta_missing_sides_stay_blank() {
        let r = ResultRecord { age: Some(json!("1d")), ..Default::default() };
        let card = render_result(&r, SearchType::News, RenderOptions::default());
        assert_eq!(card.blocks[1], Block::Meta(" - 1d".into()));
    }

    #[test]
    fn test_image_result_ignores_visibility_flag() {
        let r = record(json!({
            "title": "<b>Sunset</b>",
            "source": "photos.example",
            "url": "http://p",
            "thumbnail": {"src": "s.jpg", "alt": "ignored"}
        }));
        let card = render_result(&r, SearchType::Image, RenderOptions { show_images: false });

        assert_eq!(card.kind, CardKind::Image);
        assert_eq!(
            card.blocks,
            vec![
                Block::Image(ImageView { src: "s.jpg".into(), alt: "<b>Sunset</b>".into(), fit: ImageFit::FullWidth }),
                Block::Body(vec![InlineNode::Bold("Sunset".into())]),
                Block::Caption("photos.example".into()),
            ]
        );
        assert_eq!(card.title_href(), None);
    }

    #[test]
    fn test_infobox() {
        let infobox = Infobox {
            results: vec![InfoboxEntry {
                title: Some(json!("Cat <i>(animal)</i>")),
                description: Some(json!("A small <b>mammal</b>")),
                images: vec![Thumbnail { src: Some("c.png".into()), alt: Some("cat".into()) }],
            }],
        };
        let card = render_infobox(Some(&infobox)).unwrap();

        assert_eq!(card.kind, CardKind::Infobox);
        assert_eq!(card.blocks[0], Block::Heading("Cat <i>(animal)</i>".into()));
        assert_eq!(card.blocks[1], Block::Body(vec![InlineNode::Text("A small ".into()), InlineNode::Bold("mammal".into())]));
        assert_eq!(card.blocks[2], Block::Image(ImageView { src: "c.png".into(), alt: "cat".into(), fit: ImageFit::FullWidth }));
    }

    #[test]
    fn test_empty_infobox_renders_nothing() {
        assert!(render_infobox(None).is_none());
        assert!(render_infobox(Some(&Infobox::default())).is_none());
    }

    #[test]
    fn test_grid_puts_infobox_first_for_web_only() {
        let payload = SearchPayload::from_slice(
            br#"{"web": {"results": [{"title": "a"}, {"title": "b"}]}, "infobox": {"results": [{"title": "box"}]}}"#,
        )
        .unwrap();
        let infobox = payload.infobox.clone();
        let (records, _) = payload.into_bucket(SearchType::Web);

        let grid = render_grid(&records, infobox.as_ref(), SearchType::Web, RenderOptions::default());
        let kinds: Vec<_> = grid.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CardKind::Infobox, CardKind::Web, CardKind::Web]);

        let grid = render_grid(&records, infobox.as_ref(), SearchType::News, RenderOptions::default());
        assert!(grid.iter().all(|c| c.kind == CardKind::News));
    }

    #[test]
    fn test_empty_grid() {
        let grid = render_grid(&[], None, SearchType::Image, RenderOptions::default());
        assert!(grid.is_empty());
    }
}
