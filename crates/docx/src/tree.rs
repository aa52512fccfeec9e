//! # Document Tree
//!
//! A small node model for the body of a Word document, built from the
//! `docx-rs` reader output and flattened back to plain text.
//!
//! In `Structured` mode tables keep their row/cell shape:
//!
//! ```json
//! {"type": "table", "children": [
//!   {"type": "table-row", "children": [
//!     {"type": "table-cell", "children": [{"type": "text", "value": "Qty"}]}
//!   ]}
//! ]}
//! ```

use crate::DocxMode;
use base64::{engine::general_purpose, Engine as _};
use docx_rs::{
    Docx, DocumentChild, DrawingData, Paragraph, ParagraphChild, RunChild, Table,
    TableCellContent, TableChild, TableRowChild,
};
use serde::Serialize;
use std::collections::HashMap;

/// One node of the document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DocNode {
    Paragraph { children: Vec<DocNode> },
    Text { value: String },
    /// An embedded raster image as a `data:` URL.
    Image { value: String },
    Table { children: Vec<DocNode> },
    TableRow { children: Vec<DocNode> },
    TableCell { children: Vec<DocNode> },
}

/// Relationship id -> data URL for every image part in the package.
type ImageUrls = HashMap<String, String>;

/// Builds the node list for the body of `docx`.
pub(crate) fn build_nodes(docx: &Docx, mode: DocxMode) -> Vec<DocNode> {
    let images = match mode {
        DocxMode::Structured => Some(collect_image_urls(docx)),
        DocxMode::Raw => None,
    };

    let mut nodes = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                nodes.push(paragraph_node(paragraph, images.as_ref()));
            }
            DocumentChild::Table(table) => match &images {
                Some(images) => nodes.push(table_node(table, images)),
                None => unroll_table(table, &mut nodes),
            },
            _ => {}
        }
    }
    nodes
}

fn collect_image_urls(docx: &Docx) -> ImageUrls {
    docx.images
        .iter()
        .map(|(id, path, image, _png)| (id.clone(), image_data_url(path, &image.0)))
        .collect()
}

/// Encodes `bytes` as a `data:` URL, inferring the content type from `path`.
pub fn image_data_url(path: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_content_type(path),
        general_purpose::STANDARD.encode(bytes)
    )
}

fn image_content_type(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}

// --- Inline content ---

/// Accumulates the inline leaves of one paragraph, merging adjacent text.
#[derive(Default)]
struct InlineCollector {
    leaves: Vec<DocNode>,
    text: String,
}

impl InlineCollector {
    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.leaves.push(DocNode::Text {
                value: std::mem::take(&mut self.text),
            });
        }
    }

    fn push_image(&mut self, value: String) {
        self.flush();
        self.leaves.push(DocNode::Image { value });
    }

    fn finish(mut self) -> Vec<DocNode> {
        self.flush();
        self.leaves
    }
}

fn collect_inline(children: &[ParagraphChild], images: Option<&ImageUrls>, out: &mut InlineCollector) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.text.push_str(&t.text),
                        RunChild::Tab(_) => out.text.push('\t'),
                        RunChild::Break(_) => out.text.push('\n'),
                        RunChild::Drawing(drawing) => {
                            if let (Some(images), Some(DrawingData::Pic(pic))) =
                                (images, &drawing.data)
                            {
                                if let Some(url) = images.get(&pic.id) {
                                    out.push_image(url.clone());
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_inline(&link.children, images, out),
            _ => {}
        }
    }
}

fn paragraph_leaves(paragraph: &Paragraph, images: Option<&ImageUrls>) -> Vec<DocNode> {
    let mut collector = InlineCollector::default();
    collect_inline(&paragraph.children, images, &mut collector);
    collector.finish()
}

fn paragraph_node(paragraph: &Paragraph, images: Option<&ImageUrls>) -> DocNode {
    DocNode::Paragraph {
        children: paragraph_leaves(paragraph, images),
    }
}

// --- Tables ---

/// Raw mode: every cell paragraph becomes a top-level paragraph.
fn unroll_table(table: &Table, nodes: &mut Vec<DocNode>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        nodes.push(paragraph_node(paragraph, None));
                    }
                    TableCellContent::Table(inner) => unroll_table(inner, nodes),
                    _ => {}
                }
            }
        }
    }
}

/// Structured mode: an explicit table -> row -> cell tree with flat leaves.
fn table_node(table: &Table, images: &ImageUrls) -> DocNode {
    let rows = table
        .rows
        .iter()
        .map(|TableChild::TableRow(row)| {
            let cells = row
                .cells
                .iter()
                .map(|TableRowChild::TableCell(cell)| DocNode::TableCell {
                    children: cell_leaves(&cell.children, images),
                })
                .collect();
            DocNode::TableRow { children: cells }
        })
        .collect();
    DocNode::Table { children: rows }
}

fn cell_leaves(contents: &[TableCellContent], images: &ImageUrls) -> Vec<DocNode> {
    let mut leaves = Vec::new();
    for content in contents {
        match content {
            TableCellContent::Paragraph(paragraph) => {
                leaves.extend(paragraph_leaves(paragraph, Some(images)).into_iter().filter(
                    |leaf| !matches!(leaf, DocNode::Text { value } if value.trim().is_empty()),
                ));
            }
            TableCellContent::Table(inner) => {
                let value = render_text(&[table_node(inner, images)]).trim().to_string();
                if !value.is_empty() {
                    leaves.push(DocNode::Text { value });
                }
            }
            _ => {}
        }
    }
    leaves
}

// --- Rendering ---

/// Flattens nodes to plain text.
///
/// Paragraphs end with a blank line. Table rows render as `| a | b |` lines
/// and the table is followed by a blank line. Images render as their data URL.
pub fn render_text(nodes: &[DocNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        render_node(node, &mut out);
    }
    out
}

fn render_node(node: &DocNode, out: &mut String) {
    match node {
        DocNode::Paragraph { children } => {
            out.push_str(&inline_text(children, ""));
            out.push_str("\n\n");
        }
        DocNode::Text { value } | DocNode::Image { value } => out.push_str(value),
        DocNode::Table { children } => {
            for row in children {
                render_node(row, out);
            }
            out.push('\n');
        }
        DocNode::TableRow { children } => {
            let cells: Vec<String> = children
                .iter()
                .map(|cell| match cell {
                    DocNode::TableCell { children } => inline_text(children, " "),
                    other => render_text(std::slice::from_ref(other)),
                })
                .collect();
            out.push_str("| ");
            out.push_str(&cells.join(" | "));
            out.push_str(" |\n");
        }
        DocNode::TableCell { children } => out.push_str(&inline_text(children, " ")),
    }
}

fn inline_text(children: &[DocNode], separator: &str) -> String {
    children
        .iter()
        .map(|child| render_text(std::slice::from_ref(child)))
        .collect::<Vec<String>>()
        .join(separator)
}
