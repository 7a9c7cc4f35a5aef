//! Markdown to neutral tree conversion using pulldown-cmark.
//!
//! Headings become sections:
//!
//! ```text
//! # Usage              section(ids=[usage])
//! text                 ├── h1, p
//! ## Hooks {#hooks}    └── section(ids=[hooks])
//! > ### Note           blockquote
//!                          └── section(ids=[note]) holding only its heading
//! ```
//!
//! A heading at block top level opens a section that runs until the next
//! heading of the same or a shallower level. A heading inside a container
//! (block quote, list item) cannot enclose the content after it, so its
//! section holds just the heading.

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::tree::{Node, NodeKind, REFURI};
use crate::utils::slug::SlugAllocator;

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        opts
    }
}

enum FrameKind {
    Element,
    /// Opened by a heading. `nested` sections close together with it.
    Section { level: u8, nested: bool },
    /// Heading body; its id is resolved once the text is complete.
    Heading { explicit_id: Option<String> },
    /// HTML block; its events accumulate into one raw node.
    HtmlBlock { source: String },
}

/// Stack frame for tracking nested elements
struct Frame {
    kind: FrameKind,
    node: Node,
}

impl Frame {
    fn into_node(self) -> Node {
        match self.kind {
            FrameKind::HtmlBlock { source } => Node::raw(source),
            _ => self.node,
        }
    }
}

/// Markdown to neutral tree converter
struct MarkdownConverter {
    /// Stack of open frames (sections and nested elements)
    stack: Vec<Frame>,
    /// Root children (collected when stack is empty)
    root_children: Vec<Node>,
    /// Section ids handed out so far in this document
    slugs: SlugAllocator,
}

impl MarkdownConverter {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root_children: Vec::new(),
            slugs: SlugAllocator::new(),
        }
    }

    fn convert(mut self, markdown: &str, options: &MarkdownOptions) -> Node {
        let opts = options.to_pulldown_options();

        // Explicit ids win over auto slugs wherever they appear
        for event in Parser::new_ext(markdown, opts) {
            if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
                self.slugs.reserve(&id);
            }
        }

        for event in Parser::new_ext(markdown, opts) {
            self.handle_event(event);
        }

        // Sections still open at the end of input
        while let Some(frame) = self.stack.pop() {
            let node = frame.into_node();
            self.add_node(node);
        }

        Node::document(self.root_children)
    }

    /// Handle a single pulldown-cmark event
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(text.as_ref()),
            Event::Code(code) => {
                self.add_node(Node::element("code", vec![Node::text(code.as_ref())]));
            }
            Event::Html(html) => self.add_html(html.as_ref()),
            Event::InlineHtml(html) => self.add_node(Node::raw(html.as_ref())),
            Event::SoftBreak => self.add_text("\n"),
            Event::HardBreak => self.add_node(Node::element("br", vec![])),
            Event::Rule => self.add_node(Node::element("hr", vec![])),
            Event::FootnoteReference(name) => {
                let marker = Node::element("sup", vec![Node::text(format!("[{name}]"))])
                    .with_attr("footnote", name.as_ref());
                self.add_node(marker);
            }
            Event::TaskListMarker(checked) => {
                let mut input = Node::element("input", vec![]).with_attr("type", "checkbox");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.add_node(input);
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.add_node(Node::element("math", vec![Node::text(math.as_ref())]));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, id, .. } => {
                self.open_heading(level as u8, id.map(|id| id.to_string()));
            }
            Tag::HtmlBlock => self.stack.push(Frame {
                kind: FrameKind::HtmlBlock {
                    source: String::new(),
                },
                node: Node::raw(""),
            }),
            tag => self.stack.push(Frame {
                kind: FrameKind::Element,
                node: element_for(tag),
            }),
        }
    }

    fn end_tag(&mut self, _tag: TagEnd) {
        let Some(Frame { kind, node }) = self.stack.pop() else {
            return;
        };
        match kind {
            FrameKind::Heading { explicit_id } => self.close_heading(node, explicit_id),
            kind => {
                let node = Frame { kind, node }.into_node();
                self.add_node(node);
            }
        }
    }

    fn open_heading(&mut self, level: u8, explicit_id: Option<String>) {
        let nested = !self
            .stack
            .iter()
            .all(|f| matches!(f.kind, FrameKind::Section { .. }));
        if !nested {
            self.close_sections(level);
        }

        self.stack.push(Frame {
            kind: FrameKind::Section { level, nested },
            node: Node::section(Vec::<String>::new(), vec![]),
        });
        self.stack.push(Frame {
            kind: FrameKind::Heading { explicit_id },
            node: Node::element(format!("h{level}"), vec![]),
        });
    }

    /// Resolve the heading's id onto its section and attach the heading.
    fn close_heading(&mut self, heading: Node, explicit_id: Option<String>) {
        let id = explicit_id.unwrap_or_else(|| self.slugs.allocate(&heading.text_content()));

        let Some(frame) = self.stack.last_mut() else {
            self.add_node(heading);
            return;
        };
        let nested = matches!(frame.kind, FrameKind::Section { nested: true, .. });
        if let NodeKind::Section { ids } = &mut frame.node.kind {
            ids.push(id);
        }
        frame.node.push(heading);

        if nested && let Some(section) = self.stack.pop() {
            self.add_node(section.node);
        }
    }

    /// Close open top-level sections at `level` or deeper.
    fn close_sections(&mut self, level: u8) {
        while self.stack.last().is_some_and(
            |f| matches!(f.kind, FrameKind::Section { level: open, .. } if open >= level),
        ) {
            let Some(frame) = self.stack.pop() else {
                break;
            };
            self.add_node(frame.node);
        }
    }

    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.add_node(Node::text(text));
    }

    fn add_html(&mut self, html: &str) {
        if let Some(Frame {
            kind: FrameKind::HtmlBlock { source },
            ..
        }) = self.stack.last_mut()
        {
            source.push_str(html);
        } else {
            self.add_node(Node::raw(html));
        }
    }

    /// Add a node to current context (top of stack or root)
    fn add_node(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.node.push(node);
        } else {
            self.root_children.push(node);
        }
    }
}

/// Neutral node for a pulldown-cmark tag.
fn element_for(tag: Tag) -> Node {
    match tag {
        Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        } => {
            let target = match link_type {
                LinkType::Email => format!("mailto:{dest_url}"),
                _ => dest_url.to_string(),
            };
            let link = Node::new(NodeKind::Reference).with_attr(REFURI, target);
            with_title(link, &title)
        }
        // Images are embedded resources, not hyperlinks
        Tag::Image {
            dest_url, title, ..
        } => with_title(
            Node::element("img", vec![]).with_attr("src", dest_url.as_ref()),
            &title,
        ),
        Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.is_empty() => {
            Node::element("pre", vec![]).with_attr("lang", lang.as_ref())
        }
        Tag::List(Some(start)) if start != 1 => {
            Node::element("ol", vec![]).with_attr("start", start.to_string())
        }
        Tag::FootnoteDefinition(name) => {
            Node::element("footnote", vec![]).with_attr("name", name.as_ref())
        }
        tag => Node::element(tag_name(&tag), vec![]),
    }
}

fn with_title(node: Node, title: &str) -> Node {
    if title.is_empty() {
        node
    } else {
        node.with_attr("title", title)
    }
}

fn tag_name(tag: &Tag) -> &'static str {
    match tag {
        // Block elements
        Tag::Paragraph => "p",
        Tag::Heading { .. } => "heading",
        Tag::BlockQuote(_) => "blockquote",
        Tag::CodeBlock(_) => "pre",
        Tag::HtmlBlock => "html",
        Tag::List(Some(_)) => "ol",
        Tag::List(None) => "ul",
        Tag::Item => "li",
        Tag::FootnoteDefinition(_) => "footnote",
        Tag::DefinitionList => "dl",
        Tag::DefinitionListTitle => "dt",
        Tag::DefinitionListDefinition => "dd",
        Tag::MetadataBlock(_) => "metadata",

        // Table elements
        Tag::Table(_) => "table",
        Tag::TableHead => "thead",
        Tag::TableRow => "tr",
        Tag::TableCell => "td",

        // Inline elements
        Tag::Emphasis => "em",
        Tag::Strong => "strong",
        Tag::Strikethrough => "del",
        Tag::Superscript => "sup",
        Tag::Subscript => "sub",
        Tag::Link { .. } => "a",
        Tag::Image { .. } => "img",
    }
}

/// Convert markdown source into a document tree.
pub fn from_markdown(markdown: &str, options: &MarkdownOptions) -> Node {
    MarkdownConverter::new().convert(markdown, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect_anchors;

    fn convert(markdown: &str) -> Node {
        from_markdown(markdown, &MarkdownOptions::all())
    }

    fn section_ids(node: &Node) -> Vec<&str> {
        node.descendants()
            .filter_map(|n| match &n.kind {
                NodeKind::Section { ids } => Some(ids.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn refuris(node: &Node) -> Vec<&str> {
        node.descendants().filter_map(Node::refuri).collect()
    }

    #[test]
    fn test_sections_nest_by_level() {
        let tree = convert("# A\n\ntext\n\n## B\n\n## C\n\n# D\n");

        assert_eq!(tree.children.len(), 2);
        let a = &tree.children[0];
        assert_eq!(a.kind, NodeKind::Section { ids: vec!["a".into()] });
        // h1, p, section b, section c
        assert_eq!(a.children.len(), 4);
        assert_eq!(section_ids(&a.children[2]), ["b"]);
        assert_eq!(section_ids(&a.children[3]), ["c"]);
        assert_eq!(section_ids(&tree.children[1]), ["d"]);
    }

    #[test]
    fn test_content_before_first_heading_stays_at_root() {
        let tree = convert("intro\n\n## Later\n");
        assert_eq!(tree.children[0].kind, NodeKind::Element { tag: "p".into() });
        assert_eq!(section_ids(&tree), ["later"]);
    }

    #[test]
    fn test_explicit_heading_id() {
        let tree = convert("## Install {#setup}\n\n## Setup\n");
        assert_eq!(section_ids(&tree), ["setup", "setup-1"]);
    }

    #[test]
    fn test_explicit_id_after_matching_slug() {
        let tree = convert("## Setup\n\n## Install {#setup}\n");
        assert_eq!(section_ids(&tree), ["setup-1", "setup"]);
    }

    #[test]
    fn test_duplicate_slugs() {
        let tree = convert("# Usage\n\n# Usage\n\n# Größe & Maße\n");
        assert_eq!(section_ids(&tree), ["usage", "usage-1", "grosse-masse"]);
    }

    #[test]
    fn test_heading_in_container_is_own_section() {
        let tree = convert("> # Quote\n>\n> body\n\n# After\n");

        let quote = &tree.children[0];
        assert_eq!(quote.kind, NodeKind::Element { tag: "blockquote".into() });
        let section = &quote.children[0];
        assert_eq!(section.kind, NodeKind::Section { ids: vec!["quote".into()] });
        assert_eq!(section.children.len(), 1);
        // body paragraph stays in the quote, outside the section
        assert_eq!(quote.children.len(), 2);
        assert_eq!(section_ids(&tree.children[1]), ["after"]);
    }

    #[test]
    fn test_links() {
        let tree = convert(
            "See [hooks](hooks.md#python \"Hooks\"), <https://dredd.org> and <me@example.com>.\n",
        );
        assert_eq!(
            refuris(&tree),
            ["hooks.md#python", "https://dredd.org", "mailto:me@example.com"]
        );
        let link = tree.descendants().find(|n| n.is_reference()).unwrap();
        assert_eq!(link.attr("title"), Some("Hooks"));
        assert_eq!(link.text_content(), "hooks");
    }

    #[test]
    fn test_reference_style_link() {
        let tree = convert("Read the [guide][g].\n\n[g]: ./guide.md#start\n");
        assert_eq!(refuris(&tree), ["./guide.md#start"]);
    }

    #[test]
    fn test_images_are_not_references() {
        let tree = convert("![diagram](img/flow.png)\n");
        assert!(refuris(&tree).is_empty());
        let img = tree.descendants().find(|n| n.attr("src").is_some()).unwrap();
        assert_eq!(img.attr("src"), Some("img/flow.png"));
    }

    #[test]
    fn test_html_becomes_raw() {
        let tree = convert("<div><a name=\"top\"></a></div>\n\n# Title\n\nInline <span id=\"mark\">x</span>.\n");

        assert!(matches!(
            &tree.children[0].kind,
            NodeKind::Raw { source } if source.contains("name=\"top\"")
        ));
        let mut anchors: Vec<_> = collect_anchors(&tree).into_iter().collect();
        anchors.sort();
        assert_eq!(anchors, ["mark", "title", "top"]);
    }

    #[test]
    fn test_inline_code_in_heading_slug() {
        let tree = convert("## The `check` command\n");
        assert_eq!(section_ids(&tree), ["the-check-command"]);
    }
}
