use dom_smoothie::{Config as ReadabilityConfig, Readability, TextMode};
use scraper::{Html, Node};
use tracing::debug;

/// Subtrees that never carry article text.
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Elements that start a new line in the extracted text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article",
    "blockquote", "pre",
];

pub fn looks_like_markup(content: &str) -> bool {
    content.contains('<') && content.contains('>')
}

/// Extracts readable text from HTML. Boilerplate subtrees never contribute.
/// Whole documents go through readability after pruning; fragments, or
/// documents readability gives up on, are walked directly. Entities are
/// decoded by the parser.
pub fn extract_text(markup: &str) -> String {
    if is_full_document(markup) {
        if let Some(text) = readable_text(&prune_boilerplate(markup)) {
            return text;
        }
    }
    strip_boilerplate(markup)
}

/// Re-serializes `markup` without any boilerplate subtree.
fn prune_boilerplate(markup: &str) -> String {
    let mut document = Html::parse_document(markup);
    let doomed: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| BOILERPLATE_TAGS.contains(&el.name()))
        })
        .map(|node| node.id())
        .collect();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    document.html()
}

fn is_full_document(markup: &str) -> bool {
    let lower = markup.to_ascii_lowercase();
    lower.contains("<html") || lower.contains("<body")
}

fn readable_text(markup: &str) -> Option<String> {
    let cfg = ReadabilityConfig {
        text_mode: TextMode::Formatted,
        ..Default::default()
    };

    let mut readability = match Readability::new(markup, None, Some(cfg)) {
        Ok(reader) => reader,
        Err(err) => {
            debug!(target: "quality", error = %err, "readability init failed");
            return None;
        }
    };

    match readability.parse() {
        Ok(article) => {
            let text = article.text_content.to_string();
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(err) => {
            debug!(target: "quality", error = %err, "readability parse failed");
            None
        }
    }
}

fn strip_boilerplate(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut text = String::with_capacity(markup.len() / 2);

    for node in document.tree.root().descendants() {
        let inside_boilerplate = || {
            node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| BOILERPLATE_TAGS.contains(&el.name()))
            })
        };

        match node.value() {
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) && !inside_boilerplate() => {
                if !text.ends_with('\n') && !text.is_empty() {
                    text.push('\n');
                }
            }
            Node::Text(chunk) if !inside_boilerplate() => text.push_str(chunk),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markup() {
        assert!(looks_like_markup("<p>hi</p>"));
        assert!(!looks_like_markup("3 < 4"));
    }

    #[test]
    fn strips_scripts_navigation_and_footers() {
        let html = "<div><nav>首页 | 登录</nav><script>var x = 1;</script>\
                    <p>正文第一段</p><p>正文第二段 &amp; 结尾</p>\
                    <footer>版权所有</footer></div>";
        let text = extract_text(html);
        assert!(text.contains("正文第一段"));
        assert!(text.contains("正文第二段 & 结尾"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("首页"));
        assert!(!text.contains("版权所有"));
    }

    #[test]
    fn full_documents_drop_header_nav_and_footer() {
        let html = "<html><head><title>站点</title><style>p { color: red; }</style></head><body>\
                    <header><h1>站点名称 网站首页</h1></header>\
                    <nav><a href=\"/\">首页导航</a> <a href=\"/login\">登录注册</a></nav>\
                    <div><p>正文第一段，介绍企业如何制定长期的战略规划，并把目标拆解到每个季度。</p>\
                    <p>正文第二段 &amp; 结尾。管理者需要定期复盘执行情况，及时调整资源配置。</p></div>\
                    <footer>版权所有 2024</footer><script>track();</script></body></html>";
        let text = extract_text(html);
        assert!(text.contains("正文第一段"), "{text}");
        assert!(text.contains("正文第二段 & 结尾"), "{text}");
        for boilerplate in ["站点名称", "首页导航", "登录注册", "版权所有", "track()", "color"] {
            assert!(!text.contains(boilerplate), "{boilerplate} leaked into {text:?}");
        }
    }

    #[test]
    fn pruning_removes_boilerplate_subtrees() {
        let pruned = prune_boilerplate("<body><nav><p>导航</p></nav><p>正文</p></body>");
        assert!(!pruned.contains("导航"));
        assert!(pruned.contains("<p>正文</p>"));
    }

    #[test]
    fn boilerplate_blocks_add_no_line_breaks() {
        let text = strip_boilerplate("<p>开头</p><footer><p>版权</p><ul><li>链接</li></ul></footer>");
        assert_eq!(text, "开头");
    }

    #[test]
    fn block_elements_become_lines() {
        let text = strip_boilerplate("<p>甲</p><p>乙</p><ul><li>丙</li></ul>");
        let lines: Vec<_> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        assert_eq!(lines, vec!["甲", "乙", "丙"]);
    }
}
