//! Loading and saving `database.xml`.
//!
//! VirtualDJ rereads this file on start and is picky about its layout: one
//! space indentation, CRLF line endings and a space before `/>` on empty
//! elements. The writer reproduces that layout exactly. Children of a song are
//! written as Tags, Infos, Scan, then points, then anything else, whatever
//! their order in the source document.

use super::{
    AttributeBag, Catalog, Element, FILE_PATH_ATTR, FILE_SIZE_ATTR, INFOS_ELEMENT, POI_ELEMENT,
    Poi, SCAN_ELEMENT, SONG_ELEMENT, SongRecord, TAGS_ELEMENT,
};
use crate::error::{Error, Result};
use log::{debug, info};
use roxmltree::{Document, Node};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const NEWLINE: &str = "\r\n";
const INDENT: &str = " ";

pub fn load(path: &Path) -> Result<Catalog> {
    info!("Loading catalog: {}", path.display());
    let xml = fs::read_to_string(path)?;
    let catalog = parse(&xml, &path.display().to_string())?;
    debug!("Loaded {} songs from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn save(path: &Path, catalog: &Catalog) -> Result<()> {
    info!(
        "Saving catalog: {} ({} songs)",
        path.display(),
        catalog.len()
    );
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(catalog))?;
    Ok(())
}

/// Parse a catalog document. `origin` names the document in error messages.
pub fn parse(xml: &str, origin: &str) -> Result<Catalog> {
    let malformed = |reason: String| Error::MalformedCatalog {
        origin: origin.to_string(),
        reason,
    };

    let doc = Document::parse(xml).map_err(|e| malformed(e.to_string()))?;
    let root = doc.root_element();

    let mut catalog = Catalog {
        root_name: root.tag_name().name().to_string(),
        root_attrs: attributes_of(root),
        songs: Vec::new(),
        extra: Vec::new(),
    };

    for child in root.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == SONG_ELEMENT {
            let song = parse_song(child).map_err(|reason| {
                let pos = doc.text_pos_at(child.range().start);
                malformed(format!("{reason} (line {})", pos.row))
            })?;
            catalog.songs.push(song);
        } else {
            catalog.extra.push(parse_element(child));
        }
    }

    Ok(catalog)
}

fn parse_song(node: Node) -> std::result::Result<SongRecord, String> {
    let mut song = SongRecord::default();
    let mut file_path = None;

    for attr in node.attributes() {
        match attr.name() {
            FILE_PATH_ATTR => file_path = Some(attr.value().to_string()),
            FILE_SIZE_ATTR => {
                let size = attr.value().trim().parse::<u64>().map_err(|_| {
                    format!("FileSize '{}' is not a byte count", attr.value())
                })?;
                song.file_size = Some(size);
            }
            name => song.attrs.set(name, attr.value()),
        }
    }
    song.file_path = file_path.ok_or_else(|| "Song element without FilePath".to_string())?;

    for child in node.children().filter(|n| n.is_element()) {
        let slot = match child.tag_name().name() {
            TAGS_ELEMENT => &mut song.tags,
            INFOS_ELEMENT => &mut song.infos,
            SCAN_ELEMENT => &mut song.scan,
            POI_ELEMENT => {
                song.points.push(Poi::new(attributes_of(child)));
                continue;
            }
            _ => {
                song.extra.push(parse_element(child));
                continue;
            }
        };
        if slot.is_none() {
            *slot = Some(attributes_of(child));
        } else {
            song.extra.push(parse_element(child));
        }
    }

    Ok(song)
}

fn parse_element(node: Node) -> Element {
    let children: Vec<Element> = node
        .children()
        .filter(|n| n.is_element())
        .map(parse_element)
        .collect();
    let text = if children.is_empty() {
        node.text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
    } else {
        None
    };

    Element {
        name: node.tag_name().name().to_string(),
        attrs: attributes_of(node),
        text,
        children,
    }
}

fn attributes_of(node: Node) -> AttributeBag {
    node.attributes()
        .map(|attr| (attr.name(), attr.value()))
        .collect()
}

/// Render a catalog in the layout VirtualDJ writes.
pub fn render(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push_str(NEWLINE);

    let has_children = !catalog.songs.is_empty() || !catalog.extra.is_empty();
    open_tag(&mut out, 0, &catalog.root_name, catalog.root_attrs.iter(), !has_children);
    if has_children {
        for song in &catalog.songs {
            write_song(&mut out, 1, song);
        }
        for element in &catalog.extra {
            write_element(&mut out, 1, element);
        }
        close_tag(&mut out, 0, &catalog.root_name);
    }

    out.trim().to_string()
}

fn write_song(out: &mut String, depth: usize, song: &SongRecord) {
    let size = song.file_size.map(|s| s.to_string());
    let mut attrs = vec![(FILE_PATH_ATTR, song.file_path.as_str())];
    if let Some(size) = &size {
        attrs.push((FILE_SIZE_ATTR, size.as_str()));
    }
    attrs.extend(song.attrs.iter());

    let singletons = [
        (TAGS_ELEMENT, &song.tags),
        (INFOS_ELEMENT, &song.infos),
        (SCAN_ELEMENT, &song.scan),
    ];
    let has_children = singletons.iter().any(|(_, bag)| bag.is_some())
        || !song.points.is_empty()
        || !song.extra.is_empty();

    open_tag(out, depth, SONG_ELEMENT, attrs.into_iter(), !has_children);
    if !has_children {
        return;
    }

    for (name, bag) in singletons {
        if let Some(bag) = bag {
            open_tag(out, depth + 1, name, bag.iter(), true);
        }
    }
    for poi in &song.points {
        open_tag(out, depth + 1, POI_ELEMENT, poi.attrs.iter(), true);
    }
    for element in &song.extra {
        write_element(out, depth + 1, element);
    }
    close_tag(out, depth, SONG_ELEMENT);
}

fn write_element(out: &mut String, depth: usize, element: &Element) {
    let text = element.text.as_deref().filter(|t| !t.is_empty());

    if element.children.is_empty() {
        match text {
            None => open_tag(out, depth, &element.name, element.attrs.iter(), true),
            Some(text) => {
                indent(out, depth);
                let _ = write!(out, "<{}", element.name);
                write_attrs(out, element.attrs.iter());
                let _ = write!(out, ">{}</{}>{NEWLINE}", escape_text(text), element.name);
            }
        }
        return;
    }

    open_tag(out, depth, &element.name, element.attrs.iter(), false);
    for child in &element.children {
        write_element(out, depth + 1, child);
    }
    close_tag(out, depth, &element.name);
}

fn open_tag<'a>(
    out: &mut String,
    depth: usize,
    name: &str,
    attrs: impl Iterator<Item = (&'a str, &'a str)>,
    self_closing: bool,
) {
    indent(out, depth);
    out.push('<');
    out.push_str(name);
    write_attrs(out, attrs);
    out.push_str(if self_closing { " />" } else { ">" });
    out.push_str(NEWLINE);
}

fn close_tag(out: &mut String, depth: usize, name: &str) {
    indent(out, depth);
    let _ = write!(out, "</{name}>{NEWLINE}");
}

fn write_attrs<'a>(out: &mut String, attrs: impl Iterator<Item = (&'a str, &'a str)>) {
    for (key, value) in attrs {
        let _ = write!(out, " {key}=\"{}\"", escape_attr(value));
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#xD;"),
            c => escaped.push(c),
        }
    }
    escaped
}
