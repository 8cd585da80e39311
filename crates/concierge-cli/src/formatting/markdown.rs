//! Markdown to styled terminal lines
//!
//! Parses assistant answers with markdown-it and renders them as
//! colorized lines for the terminal.

use colored::{Color, Colorize};
use markdown_it::parser::inline::Text;
use markdown_it::plugins::cmark::block::blockquote::Blockquote;
use markdown_it::plugins::cmark::block::code::CodeBlock as MdCodeBlock;
use markdown_it::plugins::cmark::block::fence::CodeFence;
use markdown_it::plugins::cmark::block::heading::ATXHeading;
use markdown_it::plugins::cmark::block::hr::ThematicBreak;
use markdown_it::plugins::cmark::block::list::{BulletList, ListItem, OrderedList};
use markdown_it::plugins::cmark::block::paragraph::Paragraph;
use markdown_it::plugins::cmark::inline::backticks::CodeInline;
use markdown_it::plugins::cmark::inline::emphasis::{Em, Strong};
use markdown_it::plugins::cmark::inline::link::Link;
use markdown_it::plugins::cmark::inline::newline::{Hardbreak, Softbreak};
use markdown_it::plugins::extra::tables::{TableCell, TableRow};
use markdown_it::{MarkdownIt, Node};

/// Render markdown into display lines (no trailing newline)
pub fn render_markdown(markdown: &str) -> String {
    let md = create_parser();
    let ast = md.parse(markdown);

    let mut ctx = RenderContext::new();
    render_node(&ast, &mut ctx);
    ctx.finish()
}

fn create_parser() -> MarkdownIt {
    let mut md = MarkdownIt::new();
    markdown_it::plugins::cmark::add(&mut md);
    markdown_it::plugins::extra::tables::add(&mut md);
    md
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SpanStyle {
    color: Option<Color>,
    bold: bool,
    italic: bool,
    dimmed: bool,
}

impl SpanStyle {
    fn fg(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    fn paint(&self, text: &str) -> String {
        if *self == SpanStyle::default() {
            return text.to_string();
        }
        let mut styled = text.normal();
        if let Some(color) = self.color {
            styled = styled.color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.italic {
            styled = styled.italic();
        }
        if self.dimmed {
            styled = styled.dimmed();
        }
        styled.to_string()
    }
}

struct RenderContext {
    lines: Vec<String>,
    current: String,
    style_stack: Vec<SpanStyle>,
    /// Prefix for every emitted line (blockquotes)
    prefix: String,
    list_depth: usize,
    list_counter: Option<usize>,
}

impl RenderContext {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            style_stack: vec![SpanStyle::default()],
            prefix: String::new(),
            list_depth: 0,
            list_counter: None,
        }
    }

    fn current_style(&self) -> SpanStyle {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, style: SpanStyle) {
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            let painted = self.current_style().paint(text);
            self.current.push_str(&painted);
        }
    }

    fn push_styled(&mut self, text: &str, style: SpanStyle) {
        self.current.push_str(&style.paint(text));
    }

    fn flush_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.current);
        self.lines.push(format!("{}{}", self.prefix, line));
    }

    fn push_line(&mut self, line: String) {
        self.flush_line();
        self.lines.push(format!("{}{}", self.prefix, line));
    }

    /// Blank line between top-level blocks
    fn block_gap(&mut self) {
        self.flush_line();
        if self.list_depth == 0 && self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.trim().is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

fn render_node(node: &Node, ctx: &mut RenderContext) {
    if node.cast::<Paragraph>().is_some() {
        render_children(node, ctx);
        ctx.flush_line();
        if ctx.list_depth == 0 {
            ctx.block_gap();
        }
        return;
    }

    if let Some(heading) = node.cast::<ATXHeading>() {
        ctx.block_gap();
        ctx.push_style(heading_style(heading.level));
        render_children(node, ctx);
        ctx.pop_style();
        ctx.flush_line();
        ctx.block_gap();
        return;
    }

    if node.cast::<CodeFence>().is_some() || node.cast::<MdCodeBlock>().is_some() {
        render_code_block(node, ctx);
        ctx.block_gap();
        return;
    }

    if node.cast::<Blockquote>().is_some() {
        ctx.flush_line();
        let nested = format!("{}│ ", ctx.prefix);
        let saved = std::mem::replace(&mut ctx.prefix, nested);
        render_children(node, ctx);
        ctx.flush_line();
        ctx.prefix = saved;
        return;
    }

    if node.cast::<ThematicBreak>().is_some() {
        ctx.push_line("─".repeat(40).dimmed().to_string());
        ctx.block_gap();
        return;
    }

    if node.cast::<BulletList>().is_some() {
        let saved = ctx.list_counter.take();
        ctx.list_depth += 1;
        render_children(node, ctx);
        ctx.list_depth -= 1;
        ctx.list_counter = saved;
        if ctx.list_depth == 0 {
            ctx.block_gap();
        }
        return;
    }

    if node.cast::<OrderedList>().is_some() {
        let saved = ctx.list_counter.replace(1);
        ctx.list_depth += 1;
        render_children(node, ctx);
        ctx.list_depth -= 1;
        ctx.list_counter = saved;
        if ctx.list_depth == 0 {
            ctx.block_gap();
        }
        return;
    }

    if node.cast::<ListItem>().is_some() {
        render_list_item(node, ctx);
        return;
    }

    if node.cast::<TableRow>().is_some() {
        let cells: Vec<String> = node
            .children
            .iter()
            .filter(|child| child.cast::<TableCell>().is_some())
            .map(|cell| extract_all_text(cell).trim().to_string())
            .collect();
        ctx.push_line(cells.join(" │ "));
        return;
    }

    if let Some(text) = node.cast::<Text>() {
        ctx.push_text(&text.content);
        return;
    }

    if node.cast::<Strong>().is_some() {
        let style = ctx.current_style().bold();
        ctx.push_style(style);
        render_children(node, ctx);
        ctx.pop_style();
        return;
    }

    if node.cast::<Em>().is_some() {
        let style = ctx.current_style().italic();
        ctx.push_style(style);
        render_children(node, ctx);
        ctx.pop_style();
        return;
    }

    if node.cast::<CodeInline>().is_some() {
        let code_text = extract_all_text(node);
        ctx.push_styled(&code_text, SpanStyle::default().fg(Color::Yellow));
        return;
    }

    if let Some(link) = node.cast::<Link>() {
        let style = ctx.current_style().fg(Color::Cyan);
        ctx.push_style(style);
        render_children(node, ctx);
        ctx.pop_style();
        let text = extract_all_text(node);
        if text.trim() != link.url {
            ctx.push_styled(&format!(" ({})", link.url), SpanStyle::default().dimmed());
        }
        return;
    }

    if node.cast::<Softbreak>().is_some() {
        ctx.push_text(" ");
        return;
    }

    if node.cast::<Hardbreak>().is_some() {
        ctx.flush_line();
        return;
    }

    render_children(node, ctx);
}

fn render_children(node: &Node, ctx: &mut RenderContext) {
    for child in node.children.iter() {
        render_node(child, ctx);
    }
}

fn render_code_block(node: &Node, ctx: &mut RenderContext) {
    let content = if let Some(fence) = node.cast::<CodeFence>() {
        fence.content.clone()
    } else if let Some(code) = node.cast::<MdCodeBlock>() {
        code.content.clone()
    } else {
        extract_all_text(node)
    };

    let code_style = SpanStyle::default().fg(Color::Green);
    for line in content.lines() {
        ctx.push_line(code_style.paint(&format!("  {}", line)));
    }
}

fn render_list_item(node: &Node, ctx: &mut RenderContext) {
    ctx.flush_line();
    let indent = "  ".repeat(ctx.list_depth.saturating_sub(1));

    let bullet = if let Some(counter) = ctx.list_counter.as_mut() {
        let n = *counter;
        *counter += 1;
        format!("{}{}. ", indent, n)
    } else {
        format!("{}• ", indent)
    };

    ctx.push_styled(&bullet, SpanStyle::default().dimmed());
    render_children(node, ctx);
    ctx.flush_line();
}

fn heading_style(level: u8) -> SpanStyle {
    match level {
        1 => SpanStyle::default().fg(Color::Cyan).bold(),
        2 => SpanStyle::default().fg(Color::Blue).bold(),
        3 => SpanStyle::default().fg(Color::Magenta).bold(),
        _ => SpanStyle::default().bold(),
    }
}

fn extract_all_text(node: &Node) -> String {
    let mut result = String::new();
    if let Some(text) = node.cast::<Text>() {
        result.push_str(&text.content);
    }
    if node.cast::<Softbreak>().is_some() || node.cast::<Hardbreak>().is_some() {
        result.push('\n');
    }
    for child in node.children.iter() {
        result.push_str(&extract_all_text(child));
    }
    result
}
