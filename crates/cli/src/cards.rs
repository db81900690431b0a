//! Drawing result cards as terminal lines or plain text.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use sift_core::render::{Block as CardBlock, ImageFit, ImageView, ResultCard};
use sift_core::InlineNode;

const LINK: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
const DIM: Style = Style::new().fg(Color::DarkGray);

/// Split inline nodes into styled lines, breaking at `<br>`.
fn inline_lines(nodes: &[InlineNode], base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans = Vec::new();

    for node in nodes {
        match node {
            InlineNode::Break => lines.push(Line::from(std::mem::take(&mut spans))),
            InlineNode::Text(text) | InlineNode::Span(text) => spans.push(Span::styled(text.clone(), base)),
            InlineNode::Bold(text) => spans.push(Span::styled(text.clone(), base.add_modifier(Modifier::BOLD))),
            InlineNode::Link { text, .. } => spans.push(Span::styled(text.clone(), base.patch(LINK))),
        }
    }
    lines.push(Line::from(spans));
    lines
}

fn image_lines(image: &ImageView) -> Vec<Line<'static>> {
    let label = if image.alt.is_empty() { "image".to_string() } else { image.alt.clone() };
    match image.fit {
        ImageFit::Square => vec![Line::styled(format!("[▣ {label}]"), DIM).centered()],
        ImageFit::FullWidth => vec![
            Line::styled(format!("[▣ {label}]"), DIM),
            Line::styled(image.src.clone(), DIM),
        ],
    }
}

/// Terminal lines for one card, top to bottom.
pub fn card_lines(card: &ResultCard) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for block in &card.blocks {
        match block {
            CardBlock::Image(image) => lines.extend(image_lines(image)),
            CardBlock::Title { nodes, href } => {
                let base = Style::new().add_modifier(Modifier::BOLD);
                let base = if href.is_some() { base.patch(LINK) } else { base };
                lines.extend(inline_lines(nodes, base));
            }
            CardBlock::Heading(text) => {
                lines.push(Line::styled(text.clone(), Style::new().add_modifier(Modifier::BOLD)))
            }
            CardBlock::Meta(text) => lines.push(Line::styled(text.clone(), DIM)),
            CardBlock::Body(nodes) => lines.extend(inline_lines(nodes, Style::new().fg(Color::Gray))),
            CardBlock::Caption(text) => lines.push(Line::styled(text.clone(), DIM)),
        }
    }
    lines
}

/// Rows a card needs when wrapped to `width` columns, borders included.
pub fn card_height(lines: &[Line<'_>], width: u16) -> u16 {
    let inner = width.saturating_sub(2).max(1) as usize;
    let body: usize = lines.iter().map(|l| l.width().div_ceil(inner).max(1)).sum();
    (body + 2).min(u16::MAX as usize) as u16
}

fn inline_plain(nodes: &[InlineNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            InlineNode::Link { href: Some(href), text } => format!("{text} <{href}>"),
            InlineNode::Bold(text) => format!("**{text}**"),
            other => other.text().to_string(),
        })
        .collect()
}

/// Plain-text rendering of one card.
pub fn card_plain(card: &ResultCard) -> String {
    let mut out = Vec::new();
    for block in &card.blocks {
        match block {
            CardBlock::Image(image) => out.push(format!("[image: {}] {}", image.alt, image.src)),
            CardBlock::Title { nodes, href } => match href {
                Some(href) => out.push(format!("{} <{href}>", sift_core::inline::plain_text(nodes))),
                None => out.push(inline_plain(nodes)),
            },
            CardBlock::Heading(text) => out.push(format!("# {text}")),
            CardBlock::Meta(text) | CardBlock::Caption(text) => out.push(text.clone()),
            CardBlock::Body(nodes) => out.push(inline_plain(nodes)),
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{RenderOptions, ResultRecord, SearchType};
    use sift_core::render::render_result;

    fn web_card() -> ResultCard {
        let record: ResultRecord = serde_json::from_str(
            r#"{"title":"Cats","description":"Feline <strong>facts</strong><br>and <a href=\"http://y\">more</a>","url":"http://x"}"#,
        )
        .unwrap();
        render_result(&record, SearchType::Web, RenderOptions::default())
    }

    #[test]
    fn test_card_lines() {
        let lines = card_lines(&web_card());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].to_string(), "Cats");
        assert_eq!(lines[1].to_string(), "Feline facts");
        assert!(lines[1].spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(lines[2].to_string(), "and more");
        assert!(lines[2].spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_card_plain() {
        assert_eq!(card_plain(&web_card()), "Cats <http://x>\nFeline **facts**\nand more <http://y>");
    }

    #[test]
    fn test_card_height_wraps() {
        let lines = vec![Line::from("x".repeat(20)), Line::from("")];
        assert_eq!(card_height(&lines, 12), 2 + 1 + 2);
    }
}
