//! WordprocessingML (`.docx`) package writer.

use std::{
    io::{Cursor, Write},
    sync::Arc,
};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    block::{
        Alignment, BorderEdge, DocumentBlock, HeadingLevel, ImageFormat, ImageRun, Inline,
        PageLayout, TextRun,
    },
    error::WriteError,
};

const EMU_PER_PIXEL: u64 = 9525;
const A4_WIDTH: u32 = 11906;
const A4_HEIGHT: u32 = 16838;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const GRAPHIC_PICTURE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

/// Serializes an ordered block list into a binary document.
pub trait DocumentWriter: Send + Sync {
    fn write(&self, blocks: &[DocumentBlock], layout: &PageLayout) -> Result<Vec<u8>, WriteError>;
}

/// Writes Office Open XML packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxWriter;

impl DocumentWriter for DocxWriter {
    fn write(&self, blocks: &[DocumentBlock], layout: &PageLayout) -> Result<Vec<u8>, WriteError> {
        let mut media = Vec::new();
        let document = document_xml(blocks, layout, &mut media)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut parts = vec![
            ("[Content_Types].xml".to_string(), content_types_xml(&media)?),
            ("_rels/.rels".to_string(), package_rels_xml()?),
            ("word/document.xml".to_string(), document),
            ("word/styles.xml".to_string(), styles_xml()?),
            (
                "word/_rels/document.xml.rels".to_string(),
                document_rels_xml(&media)?,
            ),
        ];
        for item in &media {
            parts.push((format!("word/{}", item.target()), item.data.to_vec()));
        }

        for (part, bytes) in parts {
            zip.start_file(part.as_str(), options)?;
            zip.write_all(&bytes)
                .map_err(|source| WriteError::Part {
                    part: part.clone(),
                    source,
                })?;
            tracing::debug!(part = %part, bytes = bytes.len(), "package part written");
        }

        Ok(zip.finish()?.into_inner())
    }
}

struct Media {
    index: usize,
    format: ImageFormat,
    data: Arc<[u8]>,
}

impl Media {
    fn rel_id(&self) -> String {
        format!("rIdImage{}", self.index)
    }

    fn target(&self) -> String {
        format!("media/image{}.{}", self.index, self.format.extension())
    }
}

/// One XML package part being serialized.
struct XmlPart {
    name: &'static str,
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new(name: &'static str) -> Result<Self, WriteError> {
        let mut part = Self {
            name,
            writer: Writer::new(Vec::new()),
        };
        part.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), WriteError> {
        self.writer
            .write_event(event)
            .map_err(|err| WriteError::Xml {
                part: self.name.to_string(),
                message: err.to_string(),
            })
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), WriteError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<(), WriteError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), WriteError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Empty(element))
    }

    /// Writes character data, dropping code points XML 1.0 cannot carry.
    fn text(&mut self, text: &str) -> Result<(), WriteError> {
        let legal = text.chars().filter(|c| is_xml_char(*c)).collect::<String>();
        self.event(Event::Text(BytesText::new(&legal)))
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}')
        || c >= '\u{10000}'
}

fn document_xml(
    blocks: &[DocumentBlock],
    layout: &PageLayout,
    media: &mut Vec<Media>,
) -> Result<Vec<u8>, WriteError> {
    let mut xml = XmlPart::new("word/document.xml")?;
    xml.open(
        "w:document",
        &[
            ("xmlns:w", NS_W),
            ("xmlns:r", NS_R),
            ("xmlns:wp", NS_WP),
            ("xmlns:a", NS_A),
            ("xmlns:pic", NS_PIC),
        ],
    )?;
    xml.open("w:body", &[])?;
    for block in blocks {
        paragraph_xml(&mut xml, block, media)?;
    }

    xml.open("w:sectPr", &[])?;
    let (width, height) = (A4_WIDTH.to_string(), A4_HEIGHT.to_string());
    xml.empty("w:pgSz", &[("w:w", &width), ("w:h", &height)])?;
    let top = layout.margin_top.to_string();
    let right = layout.margin_right.to_string();
    let bottom = layout.margin_bottom.to_string();
    let left = layout.margin_left.to_string();
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &top),
            ("w:right", &right),
            ("w:bottom", &bottom),
            ("w:left", &left),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    if layout.right_to_left {
        xml.empty("w:bidi", &[])?;
    }
    xml.close("w:sectPr")?;
    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn paragraph_xml(
    xml: &mut XmlPart,
    block: &DocumentBlock,
    media: &mut Vec<Media>,
) -> Result<(), WriteError> {
    xml.open("w:p", &[])?;
    xml.open("w:pPr", &[])?;
    if let Some(HeadingLevel::Heading1) = block.heading {
        xml.empty("w:pStyle", &[("w:val", "Heading1")])?;
    }
    if let Some(border) = &block.border {
        let edge = match border.edge {
            BorderEdge::Top => "w:top",
            BorderEdge::Bottom => "w:bottom",
        };
        let size = border.size.to_string();
        xml.open("w:pBdr", &[])?;
        xml.empty(
            edge,
            &[
                ("w:val", "single"),
                ("w:sz", &size),
                ("w:space", "1"),
                ("w:color", border.color),
            ],
        )?;
        xml.close("w:pBdr")?;
    }
    // unset paragraphs inherit direction from the section
    match block.bidirectional {
        Some(true) => xml.empty("w:bidi", &[])?,
        Some(false) => xml.empty("w:bidi", &[("w:val", "0")])?,
        None => {}
    }
    let before = block.spacing.before.to_string();
    let after = block.spacing.after.to_string();
    xml.empty("w:spacing", &[("w:before", &before), ("w:after", &after)])?;
    if let Some(indent) = block.indent_right {
        xml.empty("w:ind", &[("w:right", &indent.to_string())])?;
    }
    if let Some(alignment) = block.alignment {
        let value = match alignment {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        };
        xml.empty("w:jc", &[("w:val", value)])?;
    }
    xml.close("w:pPr")?;

    for inline in &block.inlines {
        match inline {
            Inline::Text(run) => text_run_xml(xml, run)?,
            Inline::Image(image) => {
                let index = media.len() + 1;
                media.push(Media {
                    index,
                    format: image.format,
                    data: image.data.clone(),
                });
                image_run_xml(xml, image, index)?;
            }
        }
    }
    xml.close("w:p")
}

fn text_run_xml(xml: &mut XmlPart, run: &TextRun) -> Result<(), WriteError> {
    xml.open("w:r", &[])?;
    xml.open("w:rPr", &[])?;
    if run.bold {
        xml.empty("w:b", &[])?;
        xml.empty("w:bCs", &[])?;
    }
    if let Some(color) = run.color {
        xml.empty("w:color", &[("w:val", color)])?;
    }
    if let Some(size) = run.size {
        let size = size.to_string();
        xml.empty("w:sz", &[("w:val", &size)])?;
        xml.empty("w:szCs", &[("w:val", &size)])?;
    }
    match run.right_to_left {
        Some(true) => xml.empty("w:rtl", &[])?,
        Some(false) => xml.empty("w:rtl", &[("w:val", "0")])?,
        None => {}
    }
    xml.close("w:rPr")?;
    xml.open("w:t", &[("xml:space", "preserve")])?;
    xml.text(&run.text)?;
    xml.close("w:t")?;
    xml.close("w:r")
}

fn image_run_xml(xml: &mut XmlPart, image: &ImageRun, index: usize) -> Result<(), WriteError> {
    let cx = (u64::from(image.width) * EMU_PER_PIXEL).to_string();
    let cy = (u64::from(image.height) * EMU_PER_PIXEL).to_string();
    let id = index.to_string();
    let picture = format!("Picture {index}");
    let name = format!("image{}.{}", index, image.format.extension());
    let rel_id = format!("rIdImage{index}");

    xml.open("w:r", &[])?;
    xml.open("w:drawing", &[])?;
    xml.open(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty("wp:extent", &[("cx", &cx), ("cy", &cy)])?;
    xml.empty(
        "wp:effectExtent",
        &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")],
    )?;
    xml.empty("wp:docPr", &[("id", &id), ("name", &picture)])?;
    xml.open("wp:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.close("wp:cNvGraphicFramePr")?;

    xml.open("a:graphic", &[])?;
    xml.open("a:graphicData", &[("uri", GRAPHIC_PICTURE)])?;
    xml.open("pic:pic", &[])?;
    xml.open("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &[("id", &id), ("name", &name)])?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.close("pic:nvPicPr")?;
    xml.open("pic:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", &rel_id)])?;
    xml.open("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.close("a:stretch")?;
    xml.close("pic:blipFill")?;
    xml.open("pic:spPr", &[])?;
    xml.open("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
    xml.close("a:xfrm")?;
    xml.open("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.close("a:prstGeom")?;
    xml.close("pic:spPr")?;
    xml.close("pic:pic")?;
    xml.close("a:graphicData")?;
    xml.close("a:graphic")?;

    xml.close("wp:inline")?;
    xml.close("w:drawing")?;
    xml.close("w:r")
}

fn content_types_xml(media: &[Media]) -> Result<Vec<u8>, WriteError> {
    let mut xml = XmlPart::new("[Content_Types].xml")?;
    xml.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", CT_RELATIONSHIPS)],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for format in [ImageFormat::Png, ImageFormat::Jpeg] {
        if media.iter().any(|item| item.format == format) {
            xml.empty(
                "Default",
                &[
                    ("Extension", format.extension()),
                    ("ContentType", format.content_type()),
                ],
            )?;
        }
    }
    xml.empty(
        "Override",
        &[("PartName", "/word/document.xml"), ("ContentType", CT_DOCUMENT)],
    )?;
    xml.empty(
        "Override",
        &[("PartName", "/word/styles.xml"), ("ContentType", CT_STYLES)],
    )?;
    xml.close("Types")?;
    Ok(xml.finish())
}

fn package_rels_xml() -> Result<Vec<u8>, WriteError> {
    let mut xml = XmlPart::new("_rels/.rels")?;
    xml.open("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_OFFICE_DOCUMENT),
            ("Target", "word/document.xml"),
        ],
    )?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn document_rels_xml(media: &[Media]) -> Result<Vec<u8>, WriteError> {
    let mut xml = XmlPart::new("word/_rels/document.xml.rels")?;
    xml.open("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    xml.empty(
        "Relationship",
        &[("Id", "rIdStyles"), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    for item in media {
        let (id, target) = (item.rel_id(), item.target());
        xml.empty(
            "Relationship",
            &[("Id", &id), ("Type", REL_IMAGE), ("Target", &target)],
        )?;
    }
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn styles_xml() -> Result<Vec<u8>, WriteError> {
    let mut xml = XmlPart::new("word/styles.xml")?;
    xml.open("w:styles", &[("xmlns:w", NS_W)])?;

    xml.open("w:docDefaults", &[])?;
    xml.open("w:rPrDefault", &[])?;
    xml.open("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[("w:ascii", "Arial"), ("w:hAnsi", "Arial"), ("w:cs", "Arial")],
    )?;
    xml.empty("w:sz", &[("w:val", "24")])?;
    xml.empty("w:szCs", &[("w:val", "24")])?;
    xml.empty("w:lang", &[("w:val", "en-US"), ("w:bidi", "he-IL")])?;
    xml.close("w:rPr")?;
    xml.close("w:rPrDefault")?;
    xml.empty("w:pPrDefault", &[])?;
    xml.close("w:docDefaults")?;

    xml.open(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.close("w:style")?;

    xml.open("w:style", &[("w:type", "paragraph"), ("w:styleId", "Heading1")])?;
    xml.empty("w:name", &[("w:val", "heading 1")])?;
    xml.empty("w:basedOn", &[("w:val", "Normal")])?;
    xml.empty("w:next", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.open("w:pPr", &[])?;
    xml.empty("w:keepNext", &[])?;
    xml.empty("w:outlineLvl", &[("w:val", "0")])?;
    xml.close("w:pPr")?;
    xml.open("w:rPr", &[])?;
    xml.empty("w:b", &[])?;
    xml.empty("w:bCs", &[])?;
    xml.empty("w:sz", &[("w:val", "32")])?;
    xml.empty("w:szCs", &[("w:val", "32")])?;
    xml.close("w:rPr")?;
    xml.close("w:style")?;

    xml.close("w:styles")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use pretty_assertions::assert_eq;
    use quick_xml::Reader;
    use zip::ZipArchive;

    use super::*;
    use crate::block::Border;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("zip archive");
        let mut file = archive.by_name(name).expect("part present");
        let mut contents = String::new();
        file.read_to_string(&mut contents).expect("utf-8 part");
        contents
    }

    /// Parses `xml` to the end and returns the unescaped `w:t` contents.
    fn run_texts(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut texts = Vec::new();
        let mut in_text = false;
        loop {
            match reader.read_event().expect("well-formed xml") {
                Event::Start(start) if start.name().as_ref() == b"w:t" => {
                    in_text = true;
                    texts.push(String::new());
                }
                Event::End(end) if end.name().as_ref() == b"w:t" => in_text = false,
                Event::Text(text) if in_text => {
                    let text = text.unescape().expect("valid escapes");
                    if let Some(last) = texts.last_mut() {
                        last.push_str(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        texts
    }

    fn write(blocks: &[DocumentBlock]) -> Vec<u8> {
        DocxWriter
            .write(blocks, &PageLayout::default())
            .expect("write")
    }

    #[test]
    fn package_contains_required_parts_and_layout() {
        let bytes = write(&[
            DocumentBlock::aligned(Alignment::Right).push(TextRun::new("שלום").size(24).bold()),
            DocumentBlock::new().border(Border {
                edge: BorderEdge::Top,
                size: 1,
                color: "CCCCCC",
            }),
        ]);

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert_eq!(run_texts(&document), vec!["שלום".to_string()]);
        assert!(document.contains("<w:b/>"));
        assert!(document.contains(r#"<w:jc w:val="right"/>"#));
        assert!(document.contains(r#"<w:top w:val="single" w:sz="1" w:space="1" w:color="CCCCCC"/>"#));
        assert!(document.contains(
            r#"<w:pgMar w:top="1000" w:right="1500" w:bottom="1000" w:left="1500""#
        ));
        assert!(document.ends_with("<w:bidi/></w:sectPr></w:body></w:document>"));

        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/word/document.xml"));
        assert!(!content_types.contains("image/png"));
        assert!(read_part(&bytes, "_rels/.rels").contains("word/document.xml"));
        assert!(read_part(&bytes, "word/styles.xml").contains("Heading1"));
    }

    #[test]
    fn markup_is_escaped_and_non_xml_characters_are_dropped() {
        let bytes = write(&[DocumentBlock::aligned(Alignment::Right).push(TextRun::new(
            "תל\"א <b> & 'x'\u{1}\u{FFFE}\u{FFFF}\tסוף",
        ))]);

        let document = read_part(&bytes, "word/document.xml");
        assert!(!document.contains(['\u{1}', '\u{FFFE}', '\u{FFFF}']));
        assert!(!document.contains("<b>"));
        assert_eq!(
            run_texts(&document),
            vec!["תל\"א <b> & 'x'\tסוף".to_string()]
        );
    }

    #[test]
    fn paragraph_direction_is_only_written_when_set() {
        let bytes = write(&[
            DocumentBlock::aligned(Alignment::Right)
                .spacing(0, 200)
                .push(TextRun::new("20.1.2025")),
            DocumentBlock::aligned(Alignment::Center)
                .bidirectional(false)
                .push(TextRun::new("כותרת")),
        ]);

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(
            r#"<w:pPr><w:spacing w:before="0" w:after="200"/><w:jc w:val="right"/></w:pPr>"#
        ));
        assert!(document.contains(r#"<w:pPr><w:bidi w:val="0"/><w:spacing"#));
        assert_eq!(document.matches("<w:bidi/>").count(), 1);
    }

    #[test]
    fn every_part_is_well_formed() {
        let bytes = write(&[DocumentBlock::aligned(Alignment::Center).push(ImageRun {
            data: Arc::from(b"\x89PNG\r\n\x1a\nrest".to_vec()),
            format: ImageFormat::Png,
            width: 120,
            height: 120,
        })]);

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
        ] {
            let xml = read_part(&bytes, part);
            let mut reader = Reader::from_str(&xml);
            loop {
                match reader.read_event() {
                    Ok(Event::Eof) => break,
                    Ok(_) => {}
                    Err(err) => panic!("{part} is not well-formed: {err}"),
                }
            }
        }
    }

    #[test]
    fn images_are_embedded_as_media_parts() {
        let png = b"\x89PNG\r\n\x1a\nrest".to_vec();
        let bytes = write(&[DocumentBlock::aligned(Alignment::Center).push(ImageRun {
            data: Arc::from(png.clone()),
            format: ImageFormat::Png,
            width: 120,
            height: 120,
        })]);

        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains(r#"r:embed="rIdImage1""#));
        assert!(document.contains(r#"cx="1143000""#));
        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="media/image1.png""#));
        assert!(read_part(&bytes, "[Content_Types].xml").contains("image/png"));

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).expect("zip");
        let mut media = archive.by_name("word/media/image1.png").expect("media part");
        let mut stored = Vec::new();
        media.read_to_end(&mut stored).expect("read media");
        assert_eq!(stored, png);
    }
}
