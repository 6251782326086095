//! Built-in HTML-to-reStructuredText renderer.
//!
//! [`RstRenderer`] is the default [`MarkupConverter`]: a deliberately small
//! renderer covering the constructs worksheet markup actually uses
//! (headings, paragraphs, lists, literal blocks, inline emphasis/code,
//! links, images). HTML parsing is delegated to the `scraper` crate; this
//! module only walks the tree and emits text.
//!
//! Image references are rewritten into the media directory the pipeline
//! created: `cells/<id>/<file>` style sources map to the relocated
//! `cell_<id>_<file>` name, everything else maps to its base file name with
//! spaces normalized to underscores, matching what the relocation stage
//! wrote to disk.
//!
//! Anything smarter (math, nested lists, tables) belongs in a caller's own
//! [`MarkupConverter`] implementation; the pipeline does not depend on this
//! renderer's output shape.

use scraper::{ElementRef, Html, Node};

use crate::converter::{ConvertError, MarkupConverter};

/// Underline characters for heading levels 1-6, in reStructuredText's
/// conventional order.
const HEADING_CHARS: [char; 6] = ['=', '-', '~', '^', '"', '\''];

/// Tags rendered inline, as part of the surrounding paragraph.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "em", "font", "i", "span", "strong", "sub", "sup", "tt", "u",
];

/// Tags whose content never reaches the output.
const SKIP_TAGS: &[&str] = &["head", "script", "style", "title"];

/// The default HTML-to-reST converter.
#[derive(Debug, Default, Clone, Copy)]
pub struct RstRenderer;

impl MarkupConverter for RstRenderer {
    fn convert(&self, markup: &str, media_dir: &str) -> Result<String, ConvertError> {
        let doc = Html::parse_document(markup);
        let mut w = Writer {
            out: String::new(),
            media_dir,
        };
        w.render_blocks(doc.root_element());
        Ok(w.out)
    }
}

struct Writer<'a> {
    out: String,
    media_dir: &'a str,
}

impl Writer<'_> {
    /// Walk `parent`'s children, accumulating inline content into paragraphs
    /// and dispatching block elements as they appear.
    fn render_blocks(&mut self, parent: ElementRef<'_>) {
        let mut para = String::new();
        for child in parent.children() {
            match child.value() {
                Node::Text(t) => para.push_str(t),
                Node::Element(e) if e.name() == "img" => {
                    self.flush_paragraph(&mut para);
                    self.image(e.attr("src"));
                }
                Node::Element(e) if INLINE_TAGS.contains(&e.name()) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        inline(&mut para, el);
                    }
                }
                Node::Element(e) if e.name() == "br" => para.push('\n'),
                Node::Element(_) => {
                    self.flush_paragraph(&mut para);
                    if let Some(el) = ElementRef::wrap(child) {
                        self.block(el);
                    }
                }
                _ => {}
            }
        }
        self.flush_paragraph(&mut para);
    }

    fn block(&mut self, el: ElementRef<'_>) {
        let tag = el.value().name();
        match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                self.heading(el, level);
            }
            "p" => self.render_blocks(el),
            "pre" => self.literal_block(el),
            "ul" => self.list(el, "- "),
            "ol" => self.list(el, "#. "),
            "hr" => self.out.push_str("----\n\n"),
            t if SKIP_TAGS.contains(&t) => {}
            _ => self.render_blocks(el),
        }
    }

    fn heading(&mut self, el: ElementRef<'_>, level: usize) {
        let title = collapse_whitespace(&el.text().collect::<String>());
        if title.is_empty() {
            return;
        }
        let ch = HEADING_CHARS[level.clamp(1, 6) - 1];
        let underline: String = std::iter::repeat(ch).take(title.chars().count()).collect();
        self.out.push_str(&title);
        self.out.push('\n');
        self.out.push_str(&underline);
        self.out.push_str("\n\n");
    }

    /// `<pre>` keeps its internal line structure, indented under a `::`
    /// marker.
    fn literal_block(&mut self, el: ElementRef<'_>) {
        let raw = el.text().collect::<String>();
        let raw = raw.trim_matches('\n');
        if raw.trim().is_empty() {
            return;
        }
        self.out.push_str("::\n\n");
        for line in raw.lines() {
            self.out.push_str("    ");
            self.out.push_str(line.trim_end());
            self.out.push('\n');
        }
        self.out.push('\n');
    }

    fn list(&mut self, el: ElementRef<'_>, marker: &str) {
        let mut wrote = false;
        for item in el.child_elements() {
            if item.value().name() != "li" {
                continue;
            }
            let text = collapse_whitespace(&item.text().collect::<String>());
            if text.is_empty() {
                continue;
            }
            self.out.push_str(marker);
            self.out.push_str(&text);
            self.out.push('\n');
            wrote = true;
        }
        if wrote {
            self.out.push('\n');
        }
    }

    fn image(&mut self, src: Option<&str>) {
        let Some(src) = src else { return };
        let Some(name) = media_file_name(src) else {
            return;
        };
        self.out.push_str(".. image:: ");
        self.out.push_str(self.media_dir);
        self.out.push('/');
        self.out.push_str(&name);
        self.out.push_str("\n\n");
    }

    fn flush_paragraph(&mut self, para: &mut String) {
        let text = collapse_whitespace(para);
        para.clear();
        if !text.is_empty() {
            self.out.push_str(&text);
            self.out.push_str("\n\n");
        }
    }
}

/// Render an inline element into the current paragraph buffer.
fn inline(para: &mut String, el: ElementRef<'_>) {
    let text = collapse_whitespace(&el.text().collect::<String>());
    if text.is_empty() {
        return;
    }
    if !para.is_empty() && !para.ends_with(char::is_whitespace) {
        para.push(' ');
    }
    match el.value().name() {
        "strong" | "b" => {
            para.push_str("**");
            para.push_str(&text);
            para.push_str("**");
        }
        "em" | "i" => {
            para.push('*');
            para.push_str(&text);
            para.push('*');
        }
        "code" | "tt" => {
            para.push_str("``");
            para.push_str(&text);
            para.push_str("``");
        }
        "a" => match el.value().attr("href") {
            Some(href) if !href.is_empty() => {
                para.push('`');
                para.push_str(&text);
                para.push_str(" <");
                para.push_str(href);
                para.push_str(">`_");
            }
            _ => para.push_str(&text),
        },
        _ => para.push_str(&text),
    }
    para.push(' ');
}

/// Map an image source reference to the file name the relocation stage
/// produced in the media directory.
///
/// `.../cells/<id>/<file>` references resolve to `cell_<id>_<file>`; every
/// other reference resolves to its base file name. Spaces become
/// underscores either way, matching the relocation naming.
fn media_file_name(src: &str) -> Option<String> {
    let src = src.split(['?', '#']).next().unwrap_or(src);
    let segments: Vec<&str> = src.split('/').filter(|s| !s.is_empty()).collect();
    let file = (*segments.last()?).trim();
    if file.is_empty() {
        return None;
    }

    // cells/<id>/<file> (any prefix before "cells") -> relocated cell name
    if segments.len() >= 3 {
        let id = segments[segments.len() - 2];
        if segments[segments.len() - 3].ends_with("cells") && id.parse::<u64>().is_ok() {
            return Some(format!("cell_{id}_{}", file.replace(' ', "_")));
        }
    }

    Some(file.replace(' ', "_"))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
