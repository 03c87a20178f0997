//! 跨渲染版本元数据（`META-INF/metadata.xml`）

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::xml::XmlNode;

/// `META-INF/metadata.xml`解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationMetadata {
    pub internal_path: String,
    /// id等于`unique-identifier`属性的`<dc:identifier>`的文本
    pub unique_identifier: Option<String>,
    pub dcterms_modified: Option<String>,
}

impl PublicationMetadata {
    /// 解析metadata.xml
    ///
    /// # 参数
    /// * `bytes` - 文件内容
    /// * `internal_path` - 文件的内部路径
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<PublicationMetadata> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::METADATA, "metadata") {
            return Err(EpubError::MetadataParseError(format!(
                "{}: 根元素不是<metadata>",
                internal_path
            )));
        }

        let unique_identifier = root.attr("unique-identifier").and_then(|id| {
            root.children(namespace::DC, "identifier")
                .filter(|identifier| identifier.attr("id") == Some(id))
                .last()
                .map(|identifier| identifier.text().trim().to_string())
        });
        let dcterms_modified = root
            .children(namespace::METADATA, "meta")
            .filter(|meta| meta.attr("property") == Some("dcterms:modified"))
            .last()
            .map(|meta| meta.text().trim().to_string());

        Ok(PublicationMetadata {
            internal_path: internal_path.to_string(),
            unique_identifier,
            dcterms_modified,
        })
    }

    /// 发行标识符：`唯一标识符@修改时间`，没有修改时间时只有唯一标识符
    pub fn release_identifier(&self) -> Option<String> {
        let unique_identifier = self.unique_identifier.as_deref()?;
        Some(match self.dcterms_modified.as_deref() {
            Some(modified) => format!("{}@{}", unique_identifier, modified),
            None => unique_identifier.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_xml() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://www.idpf.org/2013/metadata" xmlns:dc="http://purl.org/dc/elements/1.1/" unique-identifier="pub-id">
    <dc:identifier id="other">urn:isbn:000</dc:identifier>
    <dc:identifier id="pub-id">urn:uuid:abcd</dc:identifier>
    <meta property="dcterms:modified">2016-01-01T00:00:01Z</meta>
</metadata>"#;
        let metadata = PublicationMetadata::parse(xml.as_bytes(), "META-INF/metadata.xml").unwrap();
        assert_eq!(metadata.unique_identifier.as_deref(), Some("urn:uuid:abcd"));
        assert_eq!(metadata.dcterms_modified.as_deref(), Some("2016-01-01T00:00:01Z"));
        assert_eq!(
            metadata.release_identifier().as_deref(),
            Some("urn:uuid:abcd@2016-01-01T00:00:01Z")
        );
    }

    #[test]
    fn test_release_identifier_without_modified() {
        let metadata = PublicationMetadata {
            unique_identifier: Some("id-1".to_string()),
            ..PublicationMetadata::default()
        };
        assert_eq!(metadata.release_identifier().as_deref(), Some("id-1"));
        assert_eq!(PublicationMetadata::default().release_identifier(), None);
    }

    #[test]
    fn test_wrong_root() {
        let xml = r#"<metadata xmlns="http://www.idpf.org/2007/opf"/>"#;
        assert!(PublicationMetadata::parse(xml.as_bytes(), "META-INF/metadata.xml").is_err());
    }
}
