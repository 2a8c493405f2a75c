//! Codec for the backing document:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <articles>
//!   <article id="1" read="false">
//!     <title>...</title>
//!     <link>...</link>
//!   </article>
//! </articles>
//! ```
//!
//! Decoding is strict: ids must parse as positive integers, the read flag
//! must be the literal `true` or `false`, and both child elements must be
//! present. Anything else is reported as a corrupt file, never repaired.

use ht_core::{Article, Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::Ledger;

/// Serialize the full ledger.
///
/// Empty `title`/`link` values still get an explicit open/close pair so the
/// output always round-trips through [`decode`].
pub fn encode(ledger: &Ledger) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("articles")))
        .map_err(write_error)?;

    for article in ledger.articles() {
        let mut node = BytesStart::new("article");
        node.push_attribute(("id", article.id.to_string().as_str()));
        node.push_attribute(("read", if article.read { "true" } else { "false" }));
        writer.write_event(Event::Start(node)).map_err(write_error)?;

        write_text_element(&mut writer, "title", &article.title)?;
        write_text_element(&mut writer, "link", &article.link)?;

        writer
            .write_event(Event::End(BytesEnd::new("article")))
            .map_err(write_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("articles")))
        .map_err(write_error)?;

    Ok(writer.into_inner())
}

/// Parse a backing document back into a ledger.
pub fn decode(text: &str) -> Result<Ledger> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut articles = Vec::new();
    let mut root_seen = false;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Decl(_) | Event::Comment(_) => {}
            Event::Start(e) if e.name().as_ref() == b"articles" && !root_seen => {
                root_seen = true;
            }
            Event::Empty(e) if e.name().as_ref() == b"articles" && !root_seen => {
                root_seen = true;
            }
            Event::Start(e) if e.name().as_ref() == b"article" => {
                if !root_seen {
                    return Err(corrupt("<article> outside the <articles> root"));
                }
                articles.push(read_article(&mut reader, &e)?);
            }
            Event::End(e) if e.name().as_ref() == b"articles" => {}
            Event::Eof => break,
            other => return Err(corrupt(&format!("unexpected node: {other:?}"))),
        }
    }

    if !root_seen {
        return Err(corrupt("missing <articles> root"));
    }

    Ok(Ledger::from_articles(articles))
}

fn read_article(reader: &mut Reader<&[u8]>, node: &BytesStart) -> Result<Article> {
    let raw_id = required_attribute(node, "id")?;
    let id: u32 = raw_id
        .parse()
        .map_err(|_| corrupt(&format!("invalid article id {raw_id:?}")))?;
    if id == 0 {
        return Err(corrupt("article id must be a positive integer"));
    }

    let read = match required_attribute(node, "read")?.as_str() {
        "true" => true,
        "false" => false,
        other => return Err(corrupt(&format!("invalid read flag {other:?}"))),
    };

    let mut title = None;
    let mut link = None;
    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(e) if e.name().as_ref() == b"title" => {
                title = Some(read_text(reader, "title")?);
            }
            Event::Start(e) if e.name().as_ref() == b"link" => {
                link = Some(read_text(reader, "link")?);
            }
            Event::Empty(e) if e.name().as_ref() == b"title" => title = Some(String::new()),
            Event::Empty(e) if e.name().as_ref() == b"link" => link = Some(String::new()),
            Event::End(e) if e.name().as_ref() == b"article" => break,
            Event::Comment(_) => {}
            other => return Err(corrupt(&format!("unexpected node in <article>: {other:?}"))),
        }
    }

    let title = title.ok_or_else(|| corrupt(&format!("article {id} is missing <title>")))?;
    let link = link.ok_or_else(|| corrupt(&format!("article {id} is missing <link>")))?;

    Ok(Article {
        id,
        title,
        link,
        read,
    })
}

fn read_text(reader: &mut Reader<&[u8]>, name: &str) -> Result<String> {
    let mut value = String::new();
    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Text(t) => value.push_str(&t.unescape().map_err(parse_error)?),
            Event::End(e) if e.name().as_ref() == name.as_bytes() => break,
            other => return Err(corrupt(&format!("unexpected node in <{name}>: {other:?}"))),
        }
    }
    Ok(value)
}

fn required_attribute(node: &BytesStart, name: &str) -> Result<String> {
    let attribute = node
        .try_get_attribute(name)
        .map_err(parse_error)?
        .ok_or_else(|| corrupt(&format!("article node is missing the {name:?} attribute")))?;
    let value = attribute.unescape_value().map_err(parse_error)?;
    Ok(value.into_owned())
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_error)?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_error)?;
    Ok(())
}

fn corrupt(detail: &str) -> Error {
    Error::Corrupt(detail.to_string())
}

fn parse_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Corrupt(e.to_string())
}

fn write_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> Ledger {
        Ledger::from_articles(vec![
            Article {
                id: 1,
                title: "Ampersands & angles <ok>".to_string(),
                link: "https://www2.example.com/one.html?a=1&b=2".to_string(),
                read: false,
            },
            Article {
                id: 2,
                title: "Drugi artykuł".to_string(),
                link: String::new(),
                read: true,
            },
        ])
    }

    #[test]
    fn test_round_trip() {
        let ledger = sample_ledger();
        let bytes = encode(&ledger).unwrap();
        let decoded = decode(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(decoded, ledger);
    }

    #[test]
    fn test_encode_shape() {
        let bytes = encode(&sample_ledger()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("id=\"1\""));
        assert!(text.contains("read=\"false\""));
        assert!(text.contains("read=\"true\""));
        // Empty elements are written as explicit pairs, never self-closed.
        assert!(text.contains("</link>"));
        assert!(!text.contains("<link/>"));
        assert!(!text.contains("<title/>"));
    }

    #[test]
    fn test_decode_empty_document() {
        let ledger = decode("<?xml version=\"1.0\" encoding=\"utf-8\"?><articles></articles>")
            .unwrap();
        assert_eq!(ledger.count_all(), 0);

        let ledger = decode("<articles/>").unwrap();
        assert_eq!(ledger.count_all(), 0);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("this is not xml"), Err(Error::Corrupt(_))));
        assert!(matches!(decode(""), Err(Error::Corrupt(_))));
        assert!(matches!(decode("<other></other>"), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_bad_ids() {
        let missing = "<articles><article read=\"false\"><title>T</title><link>L</link></article></articles>";
        assert!(matches!(decode(missing), Err(Error::Corrupt(_))));

        let zero = "<articles><article id=\"0\" read=\"false\"><title>T</title><link>L</link></article></articles>";
        assert!(matches!(decode(zero), Err(Error::Corrupt(_))));

        let junk = "<articles><article id=\"abc\" read=\"false\"><title>T</title><link>L</link></article></articles>";
        assert!(matches!(decode(junk), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_bad_read_flag() {
        let junk = "<articles><article id=\"1\" read=\"maybe\"><title>T</title><link>L</link></article></articles>";
        assert!(matches!(decode(junk), Err(Error::Corrupt(_))));

        // Uppercase is not the documented literal form.
        let upper = "<articles><article id=\"1\" read=\"True\"><title>T</title><link>L</link></article></articles>";
        assert!(matches!(decode(upper), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_missing_children() {
        let no_title = "<articles><article id=\"1\" read=\"false\"><link>L</link></article></articles>";
        assert!(matches!(decode(no_title), Err(Error::Corrupt(_))));

        let no_link = "<articles><article id=\"1\" read=\"false\"><title>T</title></article></articles>";
        assert!(matches!(decode(no_link), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_document() {
        let truncated = "<articles><article id=\"1\" read=\"false\"><title>T";
        assert!(matches!(decode(truncated), Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_decode_accepts_self_closed_children() {
        // Lenient on read: older files may carry the short form even though
        // encode never produces it.
        let short = "<articles><article id=\"1\" read=\"false\"><title/><link/></article></articles>";
        let ledger = decode(short).unwrap();
        assert_eq!(ledger.articles()[0].title, "");
        assert_eq!(ledger.articles()[0].link, "");
    }
}
