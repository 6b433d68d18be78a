//! HTML Outline Exporter
//!
//! Renders a lowered syntax tree as nested, collapsible HTML lists.
//!
//! Every node becomes an item whose caret label is the node kind, followed by a
//! hidden list holding one entry per structural slot, in schema order:
//! - scalar slots become plain leaves (`String getIdent: 'main'`), or nothing
//!   when the value is absent
//! - single-child slots become a labelled item (`Block getBlock`) holding the
//!   child, except for documentation comments which are left out entirely
//! - child-list slots become a labelled item (`List<Stmt> getStmts`) holding
//!   each element in order

use std::fmt::{self, Write};
use std::path::Path;

use tracing::info;

use crate::domain::accessor::{accessor_name, return_type_name};
use crate::domain::ast::{AstNode, SlotRef};
use crate::domain::schema::{SchemaRegistry, SlotDescriptor, SlotKind, DOC_COMMENT_KIND};
use crate::error::Result;
use crate::infrastructure::file_io;
use crate::ports::page_template::{self, escape_html, PageConfig};
use crate::ports::OutputExporter;

const ITEM_HEADER: &str = "<li><span class=\"caret\">";
const NESTED_LIST_HEADER: &str = "</span>\n<ul class=\"nested\">\n";
const NESTED_LIST_FOOTER: &str = "</ul>\n</li>\n";

pub struct HtmlExporter {
    registry: SchemaRegistry,
    page: PageConfig,
}

impl HtmlExporter {
    pub fn new(registry: SchemaRegistry, page: PageConfig) -> Self {
        Self { registry, page }
    }

    /// Complete HTML document for the tree rooted at `root`.
    pub fn to_html(&self, root: &AstNode) -> String {
        let mut out = page_template::head(&self.page);
        out.push_str("<ul id=\"myUL\">\n");
        self.append_node(&mut out, root);
        out.push_str("</ul>\n\n");
        out.push_str(page_template::FOOT);
        out
    }

    /// Markup for one subtree, without page boilerplate.
    pub fn render_fragment(&self, node: &AstNode) -> String {
        let mut out = String::new();
        self.append_node(&mut out, node);
        out
    }

    fn append_node(&self, out: &mut String, node: &AstNode) {
        open_item(out, format_args!("{}", node.kind()));
        for descriptor in self.registry.slots_of(node) {
            match self.registry.value_of(node, descriptor) {
                SlotRef::Scalar(value) => {
                    // Absent scalars render nothing, not an empty leaf.
                    if let Some(value) = value {
                        let _ = writeln!(
                            out,
                            "<li>{} {}: '{}'</li>",
                            value.type_name(),
                            accessor_name(descriptor, Some(value)),
                            escape_html(&value.to_string())
                        );
                    }
                }
                SlotRef::Child(child) => self.append_child(out, node, descriptor, child),
                SlotRef::Children(children) => {
                    let element_kind = match descriptor.kind {
                        SlotKind::ChildList { element_kind } => element_kind,
                        _ => unreachable!("child list value for non-list slot"),
                    };
                    open_item(
                        out,
                        format_args!(
                            "List&lt;{}&gt; {}",
                            escape_html(element_kind),
                            accessor_name(descriptor, None)
                        ),
                    );
                    for child in children {
                        self.append_node(out, child);
                    }
                    out.push_str(NESTED_LIST_FOOTER);
                }
            }
        }
        out.push_str(NESTED_LIST_FOOTER);
    }

    fn append_child(
        &self,
        out: &mut String,
        parent: &AstNode,
        descriptor: &SlotDescriptor,
        child: Option<&AstNode>,
    ) {
        let accessor = accessor_name(descriptor, None);
        let return_type = return_type_name(&self.registry, parent, &accessor);
        if return_type == DOC_COMMENT_KIND {
            return;
        }

        open_item(out, format_args!("{} {}", escape_html(return_type), accessor));
        if let Some(child) = child {
            self.append_node(out, child);
        }
        out.push_str(NESTED_LIST_FOOTER);
    }
}

impl OutputExporter for HtmlExporter {
    fn export(&self, root: &AstNode, path: &Path) -> Result<()> {
        let html = self.to_html(root);
        info!(
            nodes = root.count_nodes(),
            bytes = html.len(),
            "Rendered outline"
        );
        file_io::write_atomically(path, &html)
    }
}

fn open_item(out: &mut String, label: fmt::Arguments<'_>) {
    out.push_str(ITEM_HEADER);
    let _ = out.write_fmt(label);
    out.push_str(NESTED_LIST_HEADER);
}
