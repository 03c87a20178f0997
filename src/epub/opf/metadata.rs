//! 元数据模块
//!
//! OPF `<metadata>`中的条目分三类：Dublin Core元素、旧式`<meta name content>`
//! 和带`property`的EPUB 3 `<meta>`；另有`<link>`条目。
//! 以`refines="#id"`指向其他条目或清单项的细化条目在解析时一次性解析完成。

use crate::epub::namespace;
use crate::epub::xml::XmlNode;

/// 细化引用，指向所属元数据中的条目下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    /// `metadata`列表中的`<meta property>`条目
    Metadatum(usize),
    /// `links`列表中的`<link>`条目
    Link(usize),
}

/// 解析后的细化条目
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefiningEntry<'a> {
    Meta(&'a PropertyMeta),
    Link(&'a MetadataLink),
}

/// Dublin Core元素（`<dc:title>`等）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DcMetadatum {
    /// 元素本地名，例如`title`、`creator`
    pub tag: String,
    pub id: Option<String>,
    pub dir: Option<String>,
    pub xml_lang: Option<String>,
    pub opf_event: Option<String>,
    pub opf_file_as: Option<String>,
    pub opf_role: Option<String>,
    pub opf_scheme: Option<String>,
    pub text: Option<String>,
    pub refinements: Vec<Refinement>,
}

/// 旧式`<meta name="..." content="..."/>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyMeta {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub text: Option<String>,
    pub refinements: Vec<Refinement>,
}

/// EPUB 3 `<meta property="...">`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMeta {
    pub id: Option<String>,
    pub property: String,
    pub refines: Option<String>,
    pub scheme: Option<String>,
    pub dir: Option<String>,
    pub xml_lang: Option<String>,
    pub text: Option<String>,
    pub refinements: Vec<Refinement>,
}

/// 元数据`<link>`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataLink {
    pub id: Option<String>,
    pub href: Option<String>,
    pub media_type: Option<String>,
    pub refines: Option<String>,
    pub rel: Option<String>,
}

/// 元数据条目
#[derive(Debug, Clone, PartialEq)]
pub enum Metadatum {
    Dc(DcMetadatum),
    Meta2(LegacyMeta),
    Meta3(PropertyMeta),
}

impl Metadatum {
    pub fn id(&self) -> Option<&str> {
        match self {
            Metadatum::Dc(dc) => dc.id.as_deref(),
            Metadatum::Meta2(meta) => meta.id.as_deref(),
            Metadatum::Meta3(meta) => meta.id.as_deref(),
        }
    }

    /// 元素文本
    pub fn text(&self) -> Option<&str> {
        match self {
            Metadatum::Dc(dc) => dc.text.as_deref(),
            Metadatum::Meta2(meta) => meta.text.as_deref(),
            Metadatum::Meta3(meta) => meta.text.as_deref(),
        }
    }

    /// 指向本条目的细化引用
    pub fn refinements(&self) -> &[Refinement] {
        match self {
            Metadatum::Dc(dc) => &dc.refinements,
            Metadatum::Meta2(meta) => &meta.refinements,
            Metadatum::Meta3(meta) => &meta.refinements,
        }
    }

    fn refinements_mut(&mut self) -> &mut Vec<Refinement> {
        match self {
            Metadatum::Dc(dc) => &mut dc.refinements,
            Metadatum::Meta2(meta) => &mut meta.refinements,
            Metadatum::Meta3(meta) => &mut meta.refinements,
        }
    }

    fn refines(&self) -> Option<&str> {
        match self {
            Metadatum::Meta3(meta) => meta.refines.as_deref(),
            Metadatum::Dc(_) | Metadatum::Meta2(_) => None,
        }
    }

    /// DC元素的标签名；`<meta>`条目返回`meta`
    pub fn tag(&self) -> &str {
        match self {
            Metadatum::Dc(dc) => &dc.tag,
            Metadatum::Meta2(_) | Metadatum::Meta3(_) => "meta",
        }
    }
}

/// 细化条目的解析目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefinementTarget {
    Metadatum(usize),
    ManifestItem(usize),
}

/// OPF元数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpfMetadata {
    /// 按文档顺序排列的元数据条目
    pub metadata: Vec<Metadatum>,
    pub links: Vec<MetadataLink>,
}

impl OpfMetadata {
    /// 从`<metadata>`元素解析
    pub fn parse(node: &XmlNode) -> Self {
        let mut metadata = Vec::new();
        let mut links = Vec::new();

        for element in node.elements() {
            match element.namespace.as_deref() {
                Some(namespace::DC) => metadata.push(Metadatum::Dc(parse_dc(element))),
                Some(namespace::OPF) if element.name == "meta" => {
                    metadata.push(parse_meta(element));
                }
                Some(namespace::OPF) if element.name == "link" => {
                    links.push(MetadataLink {
                        id: element.attr_string("id"),
                        href: element.attr_string("href"),
                        media_type: element.attr_string("media-type"),
                        refines: element.attr_string("refines"),
                        rel: element.attr_string("rel"),
                    });
                }
                _ => {}
            }
        }

        Self { metadata, links }
    }

    /// 收集所有以`#`开头的细化引用：(细化条目, 去掉`#`后的目标id)
    pub(crate) fn pending_refinements(&self) -> Vec<(Refinement, String)> {
        let metas = self.metadata.iter().enumerate().filter_map(|(index, metadatum)| {
            metadatum.refines().map(|refines| (Refinement::Metadatum(index), refines))
        });
        let links = self
            .links
            .iter()
            .enumerate()
            .filter_map(|(index, link)| link.refines.as_deref().map(|refines| (Refinement::Link(index), refines)));

        metas
            .chain(links)
            .filter_map(|(refinement, refines)| {
                refines.strip_prefix('#').map(|id| (refinement, id.to_string()))
            })
            .collect()
    }

    /// 把细化条目挂到元数据目标上
    pub(crate) fn attach(&mut self, target: usize, refinement: Refinement) {
        if let Some(metadatum) = self.metadata.get_mut(target) {
            metadatum.refinements_mut().push(refinement);
        }
    }

    /// 按id查找元数据条目的下标
    pub fn index_by_id(&self, id: &str) -> Option<usize> {
        self.metadata.iter().position(|m| m.id() == Some(id))
    }

    /// 按id查找元数据条目
    pub fn metadatum_by_id(&self, id: &str) -> Option<&Metadatum> {
        self.index_by_id(id).map(|index| &self.metadata[index])
    }

    /// 按标签名查找DC元素，例如`title`、`creator`
    pub fn metadata_by_tag(&self, tag: &str) -> Vec<&DcMetadatum> {
        self.metadata
            .iter()
            .filter_map(|m| match m {
                Metadatum::Dc(dc) if dc.tag == tag => Some(dc),
                _ => None,
            })
            .collect()
    }

    /// 按`property`查找EPUB 3 `<meta>`条目
    pub fn metadata_by_property(&self, property: &str) -> Vec<&PropertyMeta> {
        self.metadata
            .iter()
            .filter_map(|m| match m {
                Metadatum::Meta3(meta) if meta.property == property => Some(meta),
                _ => None,
            })
            .collect()
    }

    /// 按`name`查找旧式`<meta>`条目
    pub fn metadata_by_name(&self, name: &str) -> Vec<&LegacyMeta> {
        self.metadata
            .iter()
            .filter_map(|m| match m {
                Metadatum::Meta2(meta) if meta.name.as_deref() == Some(name) => Some(meta),
                _ => None,
            })
            .collect()
    }

    /// 第一个给定标签的DC元素文本
    pub fn first_text_by_tag(&self, tag: &str) -> Option<&str> {
        self.metadata_by_tag(tag).first().and_then(|dc| dc.text.as_deref())
    }

    /// 把细化引用解析为条目
    pub fn refinement(&self, refinement: Refinement) -> Option<RefiningEntry<'_>> {
        match refinement {
            Refinement::Metadatum(index) => match self.metadata.get(index)? {
                Metadatum::Meta3(meta) => Some(RefiningEntry::Meta(meta)),
                Metadatum::Dc(_) | Metadatum::Meta2(_) => None,
            },
            Refinement::Link(index) => self.links.get(index).map(RefiningEntry::Link),
        }
    }

    /// 最后修改时间（第一个`dcterms:modified`）
    pub fn dcterms_modified(&self) -> Option<&str> {
        self.metadata_by_property("dcterms:modified")
            .first()
            .and_then(|meta| meta.text.as_deref())
    }

    /// 旧式`<meta name="cover" content="...">`给出的封面清单项id
    pub fn cover_image_item_id(&self) -> Option<&str> {
        self.metadata_by_name("cover")
            .first()
            .and_then(|meta| meta.content.as_deref())
    }
}

fn parse_dc(element: &XmlNode) -> DcMetadatum {
    DcMetadatum {
        tag: element.name.clone(),
        id: element.attr_string("id"),
        dir: element.attr_string("dir"),
        xml_lang: element.attr_ns_string(namespace::XML, "lang"),
        opf_event: element.attr_ns_string(namespace::OPF, "event"),
        opf_file_as: element.attr_ns_string(namespace::OPF, "file-as"),
        opf_role: element.attr_ns_string(namespace::OPF, "role"),
        opf_scheme: element.attr_ns_string(namespace::OPF, "scheme"),
        text: Some(element.string_value().trim().to_string()),
        refinements: Vec::new(),
    }
}

fn parse_meta(element: &XmlNode) -> Metadatum {
    match element.attr_string("property") {
        Some(property) => Metadatum::Meta3(PropertyMeta {
            id: element.attr_string("id"),
            property,
            refines: element.attr_string("refines"),
            scheme: element.attr_string("scheme"),
            dir: element.attr_string("dir"),
            xml_lang: element.attr_ns_string(namespace::XML, "lang"),
            text: Some(element.string_value().trim().to_string()),
            refinements: Vec::new(),
        }),
        None => Metadatum::Meta2(LegacyMeta {
            id: element.attr_string("id"),
            name: element.attr_string("name"),
            content: element.attr_string("content"),
            text: element.trimmed_text(),
            refinements: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> OpfMetadata {
        let node = XmlNode::parse_str(xml).unwrap();
        OpfMetadata::parse(&node)
    }

    const METADATA: &str = r##"<metadata xmlns="http://www.idpf.org/2007/opf"
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:identifier id="uid">urn:isbn:9780000000001</dc:identifier>
    <dc:title id="t1" xml:lang="en">Moby Dick</dc:title>
    <dc:creator id="c1" opf:role="aut" opf:file-as="Melville, Herman">Herman Melville</dc:creator>
    <dc:subject>Whales</dc:subject>
    <dc:subject>Sea</dc:subject>
    <meta refines="#t1" property="title-type">main</meta>
    <meta property="dcterms:modified">2015-01-01T00:00:00Z</meta>
    <meta name="cover" content="cover-img"/>
    <link rel="record" href="meta/record.xml" media-type="application/xml" refines="#c1"/>
</metadata>"##;

    #[test]
    fn test_parse_metadata_variants() {
        let metadata = parse(METADATA);
        assert_eq!(metadata.metadata.len(), 8);
        assert_eq!(metadata.links.len(), 1);

        let title = &metadata.metadata_by_tag("title")[0];
        assert_eq!(title.text.as_deref(), Some("Moby Dick"));
        assert_eq!(title.xml_lang.as_deref(), Some("en"));

        let creator = &metadata.metadata_by_tag("creator")[0];
        assert_eq!(creator.opf_role.as_deref(), Some("aut"));
        assert_eq!(creator.opf_file_as.as_deref(), Some("Melville, Herman"));

        assert_eq!(metadata.metadata_by_tag("subject").len(), 2);
        assert_eq!(metadata.dcterms_modified(), Some("2015-01-01T00:00:00Z"));
        assert_eq!(metadata.cover_image_item_id(), Some("cover-img"));
        assert_eq!(metadata.metadatum_by_id("uid").and_then(|m| m.text()), Some("urn:isbn:9780000000001"));
        assert_eq!(metadata.metadatum_by_id("t1").map(|m| m.tag()), Some("title"));
    }

    #[test]
    fn test_pending_refinements() {
        let metadata = parse(METADATA);
        let pending = metadata.pending_refinements();
        assert_eq!(
            pending,
            vec![
                (Refinement::Metadatum(5), "t1".to_string()),
                (Refinement::Link(0), "c1".to_string()),
            ]
        );
    }
}
