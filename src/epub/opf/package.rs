//! OPF包文档
//!
//! 把`<package>`解析为元数据、清单、脊柱和可选的指南，并在解析时完成细化引用的解析。

use tracing::debug;

use crate::epub::error::{EpubError, Result};
use crate::epub::namespace;
use crate::epub::opf::guide::Guide;
use crate::epub::opf::manifest::{Manifest, ManifestItem};
use crate::epub::opf::metadata::{OpfMetadata, RefinementTarget};
use crate::epub::opf::spine::Spine;
use crate::epub::path;
use crate::epub::xml::XmlNode;

/// 包文档。目前只有OPF一种。
#[derive(Debug, Clone, PartialEq)]
pub enum PackageDocument {
    Opf(OpfPackage),
}

impl PackageDocument {
    pub fn as_opf(&self) -> &OpfPackage {
        match self {
            PackageDocument::Opf(opf) => opf,
        }
    }

    pub fn internal_path(&self) -> &str {
        match self {
            PackageDocument::Opf(opf) => &opf.internal_path,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.version.as_deref(),
        }
    }

    pub fn unique_identifier(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.unique_identifier(),
        }
    }

    pub fn dcterms_modified(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.metadata.dcterms_modified(),
        }
    }

    pub fn internal_path_cover_image(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.internal_path_cover_image(),
        }
    }

    pub fn internal_path_nav_document(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.internal_path_nav_document(),
        }
    }

    pub fn internal_path_ncx_toc(&self) -> Option<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.internal_path_ncx_toc(),
        }
    }

    pub fn files_referenced_manifest(&self) -> Vec<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.files_referenced_manifest(),
        }
    }

    pub fn files_referenced_spine(&self) -> Vec<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.files_referenced_spine(),
        }
    }

    pub fn files_referenced_spine_linear(&self) -> Vec<&str> {
        match self {
            PackageDocument::Opf(opf) => opf.files_referenced_spine_linear(),
        }
    }
}

/// OPF包文档解析结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpfPackage {
    /// OPF文件的内部路径
    pub internal_path: String,
    pub id: Option<String>,
    pub dir: Option<String>,
    pub xml_lang: Option<String>,
    pub prefix: Option<String>,
    /// EPUB版本
    pub version: Option<String>,
    /// `unique-identifier`属性（指向某个元数据条目的id）
    pub unique_identifier_ref: Option<String>,
    pub metadata: OpfMetadata,
    pub manifest: Manifest,
    pub spine: Spine,
    pub guide: Option<Guide>,
}

impl OpfPackage {
    /// 解析OPF文件内容
    ///
    /// # 参数
    /// * `bytes` - OPF文件内容
    /// * `internal_path` - OPF文件的内部路径，清单项的href据此解析
    ///
    /// # 返回值
    /// * `Result<OpfPackage>` - 缺少`<package>`、`<metadata>`、`<manifest>`或`<spine>`时返回错误
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<OpfPackage> {
        let root = XmlNode::parse(bytes)?;
        Self::from_node(&root, internal_path)
    }

    pub fn from_node(root: &XmlNode, internal_path: &str) -> Result<OpfPackage> {
        if !root.is(namespace::OPF, "package") {
            return Err(EpubError::OpfParseError(format!(
                "{}: 根元素不是<package>",
                internal_path
            )));
        }
        let required = |name: &str| {
            root.child(namespace::OPF, name).ok_or_else(|| {
                EpubError::OpfParseError(format!("{}: 缺少<{}>元素", internal_path, name))
            })
        };

        let mut metadata = OpfMetadata::parse(required("metadata")?);
        let mut manifest = Manifest::parse(required("manifest")?, internal_path);
        let spine = Spine::parse(required("spine")?);
        let guide = root.child(namespace::OPF, "guide").map(Guide::parse);

        resolve_refinements(&mut metadata, &mut manifest);

        Ok(OpfPackage {
            internal_path: internal_path.to_string(),
            id: root.attr_string("id"),
            dir: root.attr_string("dir"),
            xml_lang: root.attr_ns_string(namespace::XML, "lang"),
            prefix: root.attr_string("prefix"),
            version: root.attr_string("version"),
            unique_identifier_ref: root.attr_string("unique-identifier"),
            metadata,
            manifest,
            spine,
            guide,
        })
    }

    /// 唯一标识符：id等于`unique-identifier`属性的元数据条目的文本
    pub fn unique_identifier(&self) -> Option<&str> {
        let id = self.unique_identifier_ref.as_deref()?;
        self.metadata.metadatum_by_id(id)?.text()
    }

    /// 把相对于OPF文件的href解析为内部路径
    pub fn relative_to_internal(&self, href: &str) -> String {
        path::norm_join_parent(&self.internal_path, href)
    }

    /// 封面图片清单项：优先`cover-image`属性，其次旧式`<meta name="cover">`
    pub fn cover_image_item(&self) -> Option<&ManifestItem> {
        self.manifest.cover_image_item().or_else(|| {
            let id = self.metadata.cover_image_item_id()?;
            self.manifest.item_by_id(id)
        })
    }

    pub fn internal_path_cover_image(&self) -> Option<&str> {
        self.cover_image_item().map(|item| item.internal_path.as_str())
    }

    pub fn internal_path_nav_document(&self) -> Option<&str> {
        self.manifest
            .nav_document_item()
            .map(|item| item.internal_path.as_str())
    }

    /// 脊柱`toc`属性指向的NCX文件
    pub fn internal_path_ncx_toc(&self) -> Option<&str> {
        let id = self.spine.toc.as_deref()?;
        self.manifest.item_by_id(id).map(|item| item.internal_path.as_str())
    }

    /// 清单中所有文件的内部路径
    pub fn files_referenced_manifest(&self) -> Vec<&str> {
        self.manifest
            .items
            .iter()
            .map(|item| item.internal_path.as_str())
            .collect()
    }

    /// 脊柱引用文件的内部路径（阅读顺序），指向不存在清单项的脊柱项被跳过
    pub fn files_referenced_spine(&self) -> Vec<&str> {
        self.spine
            .itemrefs
            .iter()
            .filter_map(|itemref| self.manifest.item_by_id(&itemref.idref))
            .map(|item| item.internal_path.as_str())
            .collect()
    }

    pub fn files_referenced_spine_linear(&self) -> Vec<&str> {
        self.spine
            .linear_itemrefs()
            .into_iter()
            .filter_map(|itemref| self.manifest.item_by_id(&itemref.idref))
            .map(|item| item.internal_path.as_str())
            .collect()
    }

    pub fn spine_index_by_internal_path(&self, internal_path: &str) -> Option<usize> {
        self.files_referenced_spine()
            .iter()
            .position(|p| *p == internal_path)
    }

    pub fn spine_linear_index_by_internal_path(&self, internal_path: &str) -> Option<usize> {
        self.files_referenced_spine_linear()
            .iter()
            .position(|p| *p == internal_path)
    }
}

/// 解析`refines="#id"`：先在元数据中找id，再在清单中找；都找不到时丢弃
fn resolve_refinements(metadata: &mut OpfMetadata, manifest: &mut Manifest) {
    for (refinement, id) in metadata.pending_refinements() {
        let target = match metadata.index_by_id(&id) {
            Some(index) => RefinementTarget::Metadatum(index),
            None => match manifest.index_by_id(&id) {
                Some(index) => RefinementTarget::ManifestItem(index),
                None => {
                    debug!(id = %id, "细化引用的目标不存在，已忽略");
                    continue;
                }
            },
        };
        match target {
            RefinementTarget::Metadatum(index) => metadata.attach(index, refinement),
            RefinementTarget::ManifestItem(index) => manifest.attach(index, refinement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::opf::metadata::{Metadatum, Refinement, RefiningEntry};

    const OPF: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid" xml:lang="en" prefix="rendition: http://www.idpf.org/vocab/rendition/#">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:identifier id="uid">urn:uuid:1234</dc:identifier>
        <dc:title id="X">Title</dc:title>
        <meta refines="#X" property="title-type">main</meta>
        <meta refines="#c1" property="media:duration">0:01:00</meta>
        <meta refines="#nowhere" property="role">aut</meta>
        <meta refines="no-hash" property="role">aut</meta>
        <meta property="dcterms:modified">2016-02-03T04:05:06Z</meta>
        <link rel="marc21xml-record" href="rec.xml" refines="#cover"/>
    </metadata>
    <manifest>
        <item id="X" href="x.xhtml" media-type="application/xhtml+xml"/>
        <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
        <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
        <item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>
        <item id="c1" href="text/c1.xhtml" media-type="application/xhtml+xml"/>
        <item id="c2" href="text/c2.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine toc="ncx">
        <itemref idref="c1"/>
        <itemref idref="X" linear="no"/>
        <itemref idref="missing"/>
        <itemref idref="c2"/>
    </spine>
    <guide>
        <reference type="cover" href="images/cover.jpg"/>
    </guide>
</package>"##;

    fn package() -> OpfPackage {
        OpfPackage::parse(OPF.as_bytes(), "OEBPS/content.opf").unwrap()
    }

    #[test]
    fn test_package_attributes() {
        let opf = package();
        assert_eq!(opf.version.as_deref(), Some("3.0"));
        assert_eq!(opf.xml_lang.as_deref(), Some("en"));
        assert_eq!(opf.unique_identifier(), Some("urn:uuid:1234"));
        assert!(opf.prefix.as_deref().unwrap().starts_with("rendition:"));
        assert!(opf.guide.is_some());
    }

    #[test]
    fn test_refinements_prefer_metadata() {
        let opf = package();

        // 元数据和清单中都有id="X"，细化条目挂到元数据上
        let title = opf.metadata.metadatum_by_id("X").unwrap();
        assert_eq!(title.refinements(), &[Refinement::Metadatum(2)]);
        assert!(opf.manifest.item_by_id("X").unwrap().refinements.is_empty());

        let c1 = opf.manifest.item_by_id("c1").unwrap();
        assert_eq!(c1.refinements, vec![Refinement::Metadatum(3)]);
        match opf.metadata.refinement(c1.refinements[0]) {
            Some(RefiningEntry::Meta(meta)) => assert_eq!(meta.property, "media:duration"),
            other => panic!("unexpected refinement: {:?}", other),
        }

        let cover = opf.manifest.item_by_id("cover").unwrap();
        assert_eq!(cover.refinements, vec![Refinement::Link(0)]);

        // 未解析的细化条目被静默丢弃
        let attached: usize = opf.metadata.metadata.iter().map(|m| m.refinements().len()).sum::<usize>()
            + opf.manifest.items.iter().map(|i| i.refinements.len()).sum::<usize>();
        assert_eq!(attached, 3);
        assert!(matches!(opf.metadata.metadata[2], Metadatum::Meta3(_)));
    }

    #[test]
    fn test_resolved_paths() {
        let opf = package();
        assert_eq!(opf.internal_path_cover_image(), Some("OEBPS/images/cover.jpg"));
        assert_eq!(opf.internal_path_nav_document(), Some("OEBPS/nav.xhtml"));
        assert_eq!(opf.internal_path_ncx_toc(), Some("OEBPS/toc.ncx"));
        assert_eq!(opf.metadata.dcterms_modified(), Some("2016-02-03T04:05:06Z"));
        assert_eq!(opf.relative_to_internal("../META-INF/x.xml"), "META-INF/x.xml");
    }

    #[test]
    fn test_spine_files() {
        let opf = package();
        assert_eq!(
            opf.files_referenced_spine(),
            vec!["OEBPS/text/c1.xhtml", "OEBPS/x.xhtml", "OEBPS/text/c2.xhtml"]
        );
        assert_eq!(
            opf.files_referenced_spine_linear(),
            vec!["OEBPS/text/c1.xhtml", "OEBPS/text/c2.xhtml"]
        );
        assert_eq!(opf.spine_index_by_internal_path("OEBPS/text/c2.xhtml"), Some(2));
        assert_eq!(opf.spine_linear_index_by_internal_path("OEBPS/text/c2.xhtml"), Some(1));
        assert_eq!(opf.spine_linear_index_by_internal_path("OEBPS/x.xhtml"), None);
        assert_eq!(opf.files_referenced_manifest().len(), 6);
    }

    #[test]
    fn test_legacy_cover_fallback() {
        let xml = r#"<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
    <metadata><meta name="cover" content="img"/></metadata>
    <manifest><item id="img" href="cover.png" media-type="image/png"/></manifest>
    <spine/>
</package>"#;
        let opf = OpfPackage::parse(xml.as_bytes(), "content.opf").unwrap();
        assert_eq!(opf.internal_path_cover_image(), Some("cover.png"));
    }

    #[test]
    fn test_cover_image_from_single_item() {
        let xml = r#"<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
    <metadata/>
    <manifest><item id="cover" href="images/cover.jpg" media-type="image/jpeg" properties="cover-image"/></manifest>
    <spine/>
</package>"#;
        let document = PackageDocument::Opf(OpfPackage::parse(xml.as_bytes(), "OEBPS/content.opf").unwrap());
        assert_eq!(document.internal_path_cover_image(), Some("OEBPS/images/cover.jpg"));
        assert_eq!(document.unique_identifier(), None);
    }

    #[test]
    fn test_missing_required_elements() {
        let no_spine = r#"<package xmlns="http://www.idpf.org/2007/opf"><metadata/><manifest/></package>"#;
        assert!(matches!(
            OpfPackage::parse(no_spine.as_bytes(), "content.opf"),
            Err(EpubError::OpfParseError(_))
        ));

        let wrong_root = r#"<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container"/>"#;
        assert!(OpfPackage::parse(wrong_root.as_bytes(), "content.opf").is_err());
    }
}
