//! Office Open XML container writer.

use super::docx::{Alignment, ParagraphRole, WordParagraph, WordRun};
use crate::error::Result;
use crate::model::{non_blank, TestInfo};
use chrono::{SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Noto Sans KR" w:hAnsi="Noto Sans KR" w:eastAsia="Noto Sans KR"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>
</w:styles>"#;

/// Write the container for a paragraph stream.
pub(crate) fn write_package(paragraphs: &[WordParagraph], info: &TestInfo) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("word/document.xml", document_xml(paragraphs)),
        ("docProps/core.xml", core_xml(info)),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Body XML for the paragraph stream.
pub(crate) fn document_xml(paragraphs: &[WordParagraph]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>",
    );
    for paragraph in paragraphs {
        write_paragraph(&mut xml, paragraph);
    }
    xml.push_str("<w:sectPr/></w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &WordParagraph) {
    xml.push_str("<w:p><w:pPr>");
    if paragraph.role == ParagraphRole::Title {
        xml.push_str("<w:pStyle w:val=\"Heading1\"/>");
    }
    if let Some(fill) = paragraph.shading {
        let _ = write!(
            xml,
            "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>",
            fill.to_hex()
        );
    }
    let _ = write!(xml, "<w:spacing w:after=\"{}\"/>", paragraph.spacing_after);
    match paragraph.alignment {
        Alignment::Left => {}
        Alignment::Center => xml.push_str("<w:jc w:val=\"center\"/>"),
        Alignment::Right => xml.push_str("<w:jc w:val=\"right\"/>"),
    }
    xml.push_str("</w:pPr>");
    for run in &paragraph.runs {
        write_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &WordRun) {
    xml.push_str("<w:r><w:rPr>");
    if run.bold {
        xml.push_str("<w:b/>");
    }
    if run.italic {
        xml.push_str("<w:i/>");
    }
    if let Some(color) = run.color {
        let _ = write!(xml, "<w:color w:val=\"{}\"/>", color.to_hex());
    }
    if let Some(size) = run.size {
        let _ = write!(xml, "<w:sz w:val=\"{}\"/>", size);
    }
    xml.push_str("</w:rPr>");

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(xml, "<w:t xml:space=\"preserve\">{}</w:t>", escape(line));
    }
    xml.push_str("</w:r>");
}

fn core_xml(info: &TestInfo) -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );
    if let Some(title) = non_blank(&info.title) {
        let _ = write!(xml, "<dc:title>{}</dc:title>", escape(title));
    }
    if let Some(subject) = non_blank(&info.subject) {
        let _ = write!(xml, "<dc:subject>{}</dc:subject>", escape(subject));
    }
    let _ = write!(
        xml,
        "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:created>\
         <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{now}</dcterms:modified>",
    );
    xml.push_str("</cp:coreProperties>");
    xml
}
