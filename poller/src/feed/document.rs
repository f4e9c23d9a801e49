//! RSS 2.0 feed document
//!
//! The whole `rss::Channel` is kept in memory, so rewriting a loaded feed
//! carries over every element the `rss` crate models (channel `language`,
//! `ttl`, `image`, item `enclosure`, `source`, namespaced extensions).
//!
//! The `rss` crate produces compact XML; it is then streamed through
//! `quick-xml` into the on-disk shape: UTF-8 declaration, two-space
//! indentation, CDATA descriptions, an explicit `isPermaLink` on every guid and
//! no characters outside the XML 1.0 range.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use quick_xml::events::{BytesCData, BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use rss::{Channel, Item};

use crate::domain::entities::SourceKind;
use crate::error::FeedError;

/// Channel metadata (title, link, description)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
}

impl ChannelMeta {
    /// Metadata for a freshly created feed of `kind` over `repo`
    pub fn defaults_for(kind: SourceKind, repo: &str) -> Self {
        match kind {
            SourceKind::Commits => Self {
                title: "GitHub Commits Feed".to_string(),
                link: format!("https://github.com/{}/commits", repo),
                description: format!("Recent commits from GitHub repo {}", repo),
            },
            SourceKind::Issues => Self {
                title: "GitHub Issues Feed".to_string(),
                link: format!("https://github.com/{}/issues", repo),
                description: format!("Recent issues from GitHub repo {}", repo),
            },
        }
    }
}

/// An RSS document, newest batch first
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub channel: Channel,
}

impl FeedDocument {
    /// Empty document carrying `defaults` as its metadata
    pub fn skeleton(defaults: &ChannelMeta) -> Self {
        let mut channel = Channel::default();
        channel.set_title(defaults.title.clone());
        channel.set_link(defaults.link.clone());
        channel.set_description(defaults.description.clone());
        Self { channel }
    }

    /// Read an existing feed. Any failure (missing file, unreadable file,
    /// malformed XML, not an RSS document) yields `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("No feed at {}, starting a new one", path.display());
                return None;
            }
            Err(err) => {
                tracing::warn!("Cannot open {}: {}, starting fresh", path.display(), err);
                return None;
            }
        };

        match Channel::read_from(BufReader::new(file)) {
            Ok(channel) => Some(Self { channel }),
            Err(err) => {
                tracing::warn!(
                    "{} is not a readable RSS feed ({}), starting fresh",
                    path.display(),
                    err
                );
                None
            }
        }
    }

    /// `load`, falling back to a skeleton, with missing metadata filled in
    pub fn load_or_default(path: &Path, defaults: &ChannelMeta) -> Self {
        let mut doc = Self::load(path).unwrap_or_else(|| Self::skeleton(defaults));
        doc.fill_missing_metadata(defaults);
        doc
    }

    pub fn items(&self) -> &[Item] {
        self.channel.items()
    }

    /// Set blank metadata fields from `defaults`; present values are kept
    pub fn fill_missing_metadata(&mut self, defaults: &ChannelMeta) {
        if self.channel.title().trim().is_empty() {
            self.channel.set_title(defaults.title.clone());
        }
        if self.channel.link().trim().is_empty() {
            self.channel.set_link(defaults.link.clone());
        }
        if self.channel.description().trim().is_empty() {
            self.channel.set_description(defaults.description.clone());
        }
    }

    /// Insert `items` ahead of every existing item, keeping both orders
    pub fn prepend(&mut self, items: Vec<Item>) {
        let existing = std::mem::replace(&mut self.channel.items, items);
        self.channel.items.extend(existing);
    }

    /// Serialize as an indented RSS 2.0 document
    pub fn to_xml(&self) -> Result<Vec<u8>, FeedError> {
        let compact = self
            .channel
            .write_to(Vec::new())
            .map_err(|e| FeedError::Xml(e.to_string()))?;

        let mut bytes = reshape(&compact).map_err(|e| FeedError::Xml(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Re-emit compact XML in the on-disk shape
fn reshape(compact: &[u8]) -> Result<Vec<u8>, quick_xml::Error> {
    let mut reader = Reader::from_reader(compact);
    let mut writer = Writer::new_with_indent(Vec::with_capacity(compact.len() * 5 / 4), b' ', 2);

    // Text and entity references arrive as separate events. They are joined
    // so the indenting writer never puts a line break inside element content.
    let mut text: Vec<u8> = Vec::new();
    // Held back until we know whether the element has content
    let mut open: Option<BytesStart<'static>> = None;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Text(e) => {
                text.extend_from_slice(e);
                continue;
            }
            Event::GeneralRef(e) => {
                text.push(b'&');
                text.extend_from_slice(e);
                text.push(b';');
                continue;
            }
            _ => {}
        }

        if let Some(start) = open.take() {
            if text.is_empty() && matches!(event, Event::End(_)) {
                writer.write_event(Event::Empty(start))?;
                continue;
            }
            writer.write_event(Event::Start(start))?;
        }
        if !text.is_empty() {
            let escaped = String::from_utf8_lossy(&text);
            writer.write_event(Event::Text(BytesText::from_escaped(xml_safe(&escaped))))?;
            text.clear();
        }

        match event {
            Event::Decl(_) => {
                writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?
            }
            Event::Start(e) => open = Some(clean_start(&e)?),
            Event::Empty(e) => writer.write_event(Event::Empty(clean_start(&e)?))?,
            Event::CData(e) => write_cdata(&mut writer, &xml_safe(&String::from_utf8_lossy(&e)))?,
            Event::Eof => break,
            other => writer.write_event(other)?,
        }
    }

    Ok(writer.into_inner())
}

/// Copy a start tag with cleaned attribute values. A guid without a
/// permalink flag gets an explicit `isPermaLink="true"`.
fn clean_start(e: &BytesStart<'_>) -> Result<BytesStart<'static>, quick_xml::Error> {
    let mut start = e.to_owned();
    start.clear_attributes();

    let mut has_permalink_flag = false;
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.into_inner();
        has_permalink_flag |= key == b"isPermaLink";
        let value = String::from_utf8_lossy(&attr.value);
        start.push_attribute((key, xml_safe(&value).as_bytes()));
    }

    if e.name().as_ref() == b"guid" && !has_permalink_flag {
        start.push_attribute(("isPermaLink", "true"));
    }
    Ok(start)
}

/// CDATA cannot contain `]]>`; split the terminator across two sections.
fn write_cdata(w: &mut Writer<Vec<u8>>, text: &str) -> std::io::Result<()> {
    let mut parts = text.split("]]>").peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            w.write_event(Event::CData(BytesCData::new(format!("{}]]", part))))?;
            w.write_event(Event::CData(BytesCData::new(">")))?;
        } else {
            w.write_event(Event::CData(BytesCData::new(part)))?;
        }
    }
    Ok(())
}

/// `Char` production of XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Drop characters XML 1.0 cannot carry (C0 controls such as ANSI `ESC`)
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}
