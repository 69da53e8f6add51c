use crate::tree::{RenderElement, RenderNode, RenderTree};

/// Options for writing markup
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// One element per line, indented by depth
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: WriteOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: WriteOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Write a render tree as pretty-printed markup.
pub fn write_markup(tree: &RenderTree) -> String {
    write_markup_with(tree, WriteOptions::default())
}

pub fn write_markup_with(tree: &RenderTree, options: WriteOptions) -> String {
    let mut ctx = Context::new(options);

    for node in &tree.prolog {
        write_node(node, &mut ctx);
    }
    write_element(&tree.root, &mut ctx);

    ctx.get_output()
}

fn write_node(node: &RenderNode, ctx: &mut Context) {
    match node {
        RenderNode::Element(element) => write_element(element, ctx),
        RenderNode::Text { content } => ctx.add_line(&escape_text(content)),
        RenderNode::Raw { content } => ctx.add_line(content),
    }
}

fn write_element(element: &RenderElement, ctx: &mut Context) {
    // Indenting around character data would change it, so elements holding
    // text are written on a single line.
    let has_text = element
        .children
        .iter()
        .any(|child| matches!(child, RenderNode::Text { .. }));

    if element.children.is_empty() || has_text {
        let mut line = String::new();
        write_compact(element, &mut line);
        ctx.add_line(&line);
        return;
    }

    ctx.add_line(&open_tag(element, false));
    ctx.indent();
    for child in &element.children {
        write_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", element.tag));
}

fn write_compact(element: &RenderElement, output: &mut String) {
    if element.children.is_empty() {
        output.push_str(&open_tag(element, true));
        return;
    }

    output.push_str(&open_tag(element, false));
    for child in &element.children {
        match child {
            RenderNode::Element(child) => write_compact(child, output),
            RenderNode::Text { content } => output.push_str(&escape_text(content)),
            RenderNode::Raw { content } => output.push_str(content),
        }
    }
    output.push_str("</");
    output.push_str(&element.tag);
    output.push('>');
}

fn open_tag(element: &RenderElement, self_closing: bool) -> String {
    let mut tag = format!("<{}", element.tag);
    for (name, value) in &element.attributes {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attribute(value));
        tag.push('"');
    }
    tag.push_str(if self_closing { "/>" } else { ">" });
    tag
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
