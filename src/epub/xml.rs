//! 轻量XML树
//!
//! 基于quick-xml事件流构建带命名空间的元素树，供各类文档解析器做属性查询、
//! 按命名空间限定名查找子元素和遍历子节点。

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use tracing::warn;

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;

/// 元素属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// 命名空间URI，无前缀或前缀未声明的属性没有命名空间
    pub namespace: Option<String>,
    /// 原始前缀
    pub prefix: Option<String>,
    /// 本地名
    pub name: String,
    pub value: String,
}

/// 元素的子节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    Element(XmlNode),
    Text(String),
}

/// XML元素
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    /// 命名空间URI
    pub namespace: Option<String>,
    /// 本地名
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub content: Vec<XmlContent>,
}

impl XmlNode {
    /// 解析XML字节，返回根元素
    ///
    /// # 参数
    /// * `bytes` - XML文档内容，编码由BOM或XML声明决定，默认UTF-8
    ///
    /// # 返回值
    /// * `Result<XmlNode>` - 根元素；文档没有根元素时返回`InvalidEpub`错误
    pub fn parse(bytes: &[u8]) -> Result<XmlNode> {
        let text = decode_document(bytes);
        Self::parse_str(&text)
    }

    /// 解析XML字符串，返回根元素
    pub fn parse_str(xml_content: &str) -> Result<XmlNode> {
        let mut reader = NsReader::from_str(xml_content);
        reader.config_mut().expand_empty_elements = true;

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let element_namespace = namespace_uri(resolved);
            match event {
                Event::Start(ref e) => {
                    if root.is_some() {
                        // 根元素之后的内容忽略
                        continue;
                    }
                    let node = open_element(&reader, element_namespace, e)?;
                    stack.push(node);
                }
                Event::End(_) => {
                    let Some(node) = stack.pop() else {
                        continue;
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.content.push(XmlContent::Element(node)),
                        None => root = Some(node),
                    }
                }
                Event::Text(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = match e.unescape() {
                            Ok(text) => text.into_owned(),
                            Err(_) => String::from_utf8_lossy(&e).into_owned(),
                        };
                        parent.content.push(XmlContent::Text(text));
                    }
                }
                Event::CData(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                        parent.content.push(XmlContent::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        root.ok_or_else(|| EpubError::InvalidEpub("XML文档没有根元素".to_string()))
    }

    /// 检查元素的命名空间和本地名
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// 获取无前缀属性的值
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// 获取命名空间限定属性的值
    pub fn attr_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.as_deref() == Some(namespace))
            .map(|a| a.value.as_str())
    }

    /// 便捷方法：返回属性值的拥有副本
    pub fn attr_string(&self, name: &str) -> Option<String> {
        self.attr(name).map(str::to_string)
    }

    pub fn attr_ns_string(&self, namespace: &str, name: &str) -> Option<String> {
        self.attr_ns(namespace, name).map(str::to_string)
    }

    /// 遍历子元素
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) => None,
        })
    }

    /// 遍历指定限定名的子元素
    pub fn children<'a>(&'a self, namespace: &'a str, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.elements().filter(move |e| e.is(namespace, name))
    }

    /// 第一个指定限定名的子元素
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlNode> {
        self.elements().find(|e| e.is(namespace, name))
    }

    /// 按路径逐级查找，返回所有匹配的元素（文档顺序）
    ///
    /// 路径中每一级都在同一命名空间下。
    pub fn select(&self, namespace: &str, path: &[&str]) -> Vec<&XmlNode> {
        let mut current = vec![self];
        for name in path {
            current = current
                .into_iter()
                .flat_map(|node| node.elements().filter(move |e| e.is(namespace, name)))
                .collect();
        }
        current
    }

    /// 按文档顺序收集所有指定限定名的后代元素
    pub fn descendants<'a>(&'a self, namespace: &str, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        self.collect_descendants(namespace, name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, namespace: &str, name: &str, found: &mut Vec<&'a XmlNode>) {
        for element in self.elements() {
            if element.is(namespace, name) {
                found.push(element);
            }
            element.collect_descendants(namespace, name, found);
        }
    }

    /// 直接文本子节点的拼接
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                XmlContent::Text(text) => Some(text.as_str()),
                XmlContent::Element(_) => None,
            })
            .collect()
    }

    /// 所有后代文本按文档顺序的拼接
    pub fn string_value(&self) -> String {
        let mut value = String::new();
        self.collect_text(&mut value);
        value
    }

    fn collect_text(&self, value: &mut String) {
        for content in &self.content {
            match content {
                XmlContent::Text(text) => value.push_str(text),
                XmlContent::Element(node) => node.collect_text(value),
            }
        }
    }

    /// 去除首尾空白后的直接文本，为空时返回`None`
    pub fn trimmed_text(&self) -> Option<String> {
        let text = self.text();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// 已解析的命名空间URI；未绑定或前缀未声明时为`None`
fn namespace_uri(resolved: ResolveResult) -> Option<String> {
    match resolved {
        ResolveResult::Bound(ns) => {
            Some(String::from_utf8_lossy(ns.as_ref()).into_owned()).filter(|uri| !uri.is_empty())
        }
        ResolveResult::Unknown(prefix) if prefix.as_slice() == b"xml" => {
            Some(namespace::XML.to_string())
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

/// 从开始标签构建空元素，命名空间声明不作为属性保留
fn open_element(reader: &NsReader<&[u8]>, namespace: Option<String>, e: &BytesStart) -> Result<XmlNode> {
    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        let (resolved, local_name) = reader.resolve_attribute(attr.key);
        attributes.push(XmlAttribute {
            namespace: namespace_uri(resolved),
            prefix: attr
                .key
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
            name: String::from_utf8_lossy(local_name.as_ref()).into_owned(),
            value,
        });
    }

    Ok(XmlNode {
        namespace,
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attributes,
        content: Vec::new(),
    })
}

/// 按BOM、UTF-16字节模式和XML声明确定编码，解码整个文档
fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (sniff_encoding(bytes), bytes),
    };
    let (text, malformed) = encoding.decode_without_bom_handling(body);
    if malformed {
        warn!(encoding = encoding.name(), "XML文档包含无法解码的字节，已替换");
    }
    text
}

fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    match bytes {
        [b'<', 0, ..] => UTF_16LE,
        [0, b'<', ..] => UTF_16BE,
        // 没有BOM时UTF-16声明不可信
        _ => declared_encoding(bytes)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .filter(|encoding| *encoding != UTF_16LE && *encoding != UTF_16BE)
            .unwrap_or(UTF_8),
    }
}

/// XML声明中`encoding`的值
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let declaration = bytes.strip_prefix(b"<?xml")?;
    let end = declaration.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&declaration[..end]).ok()?;
    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    value.find(quote).map(|end| &value[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_are_resolved() {
        let xml = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" xml:lang="en">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
        <dc:title id="t">Moby <b>Dick</b></dc:title>
        <dc:creator opf:role="aut">Herman Melville</dc:creator>
        <meta name="cover" content="img"/>
    </metadata>
</package>"#;
        let root = XmlNode::parse_str(xml).unwrap();
        assert!(root.is(namespace::OPF, "package"));
        assert_eq!(root.attr_ns(namespace::XML, "lang"), Some("en"));

        let metadata = root.child(namespace::OPF, "metadata").unwrap();
        let title = metadata.child(namespace::DC, "title").unwrap();
        assert_eq!(title.attr("id"), Some("t"));
        assert_eq!(title.text(), "Moby ");
        assert_eq!(title.string_value(), "Moby Dick");

        let creator = metadata.child(namespace::DC, "creator").unwrap();
        assert_eq!(creator.attr_ns(namespace::OPF, "role"), Some("aut"));
        assert_eq!(creator.attr("role"), None);

        let meta = metadata.child(namespace::OPF, "meta").unwrap();
        assert_eq!(meta.attr("content"), Some("img"));
        assert!(meta.content.is_empty());
    }

    #[test]
    fn test_select_and_descendants() {
        let xml = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
<nav><ol><li>a</li><li>b</li></ol></nav>
<section><nav><ol><li>c</li></ol></nav></section>
</body></html>"#;
        let root = XmlNode::parse(xml.as_bytes()).unwrap();
        assert_eq!(root.descendants(namespace::XHTML, "nav").len(), 2);
        let items = root.select(namespace::XHTML, &["body", "nav", "ol", "li"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text(), "b");
    }

    #[test]
    fn test_entities_and_bom() {
        let xml = "\u{FEFF}<a xmlns=\"urn:x\" t=\"1 &amp; 2\">x &lt; y<![CDATA[ & z]]></a>";
        let root = XmlNode::parse(xml.as_bytes()).unwrap();
        assert_eq!(root.attr("t"), Some("1 & 2"));
        assert_eq!(root.text(), "x < y & z");
    }

    #[test]
    fn test_undeclared_prefix_is_not_plain_attribute() {
        let xml = r#"<a xmlns="urn:x" foo:href="wrong" href="right"><b foo:type="t"/></a>"#;
        let root = XmlNode::parse_str(xml).unwrap();
        assert_eq!(root.attr("href"), Some("right"));
        assert_eq!(root.attributes.len(), 2);

        let b = root.child("urn:x", "b").unwrap();
        assert_eq!(b.attr("type"), None);
        assert_eq!(b.attributes[0].prefix.as_deref(), Some("foo"));
        assert_eq!(b.attributes[0].namespace, None);
    }

    #[test]
    fn test_declared_encodings() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a xmlns=\"urn:x\" t=\"é\">标题</a>";
        let mut utf16 = vec![0xFF, 0xFE];
        utf16.extend(xml.encode_utf16().flat_map(|unit| unit.to_le_bytes()));
        let root = XmlNode::parse(&utf16).unwrap();
        assert!(root.is("urn:x", "a"));
        assert_eq!(root.attr("t"), Some("é"));
        assert_eq!(root.text(), "标题");

        let latin1 = b"<?xml version='1.0' encoding='ISO-8859-1'?><a>caf\xE9</a>";
        assert_eq!(XmlNode::parse(latin1).unwrap().text(), "café");

        // 声明为UTF-16但实际是UTF-8
        let mislabeled = "<?xml version=\"1.0\" encoding=\"utf-16\"?><a>标题</a>";
        assert_eq!(XmlNode::parse(mislabeled.as_bytes()).unwrap().text(), "标题");
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(XmlNode::parse_str("<?xml version=\"1.0\"?>").is_err());
    }
}
