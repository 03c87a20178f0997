use crate::epub::error::{EpubError, Result};
use crate::epub::mapping::RenditionMapping;
use crate::epub::media_type;
use crate::epub::namespace;
use crate::epub::rendition::Rendition;
use crate::epub::xml::XmlNode;

/// container.xml的解析结果
#[derive(Debug, Clone, Default)]
pub struct Container {
    pub internal_path: String,
    /// 按声明顺序排列的渲染版本
    pub renditions: Vec<Rendition>,
    /// `<link rel="mapping">`指向的渲染映射文档路径
    pub mapping_path: Option<String>,
    /// 渲染映射文档，由发布物在读取资源后填充
    pub mapping: Option<RenditionMapping>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `bytes` - container.xml的文件内容
    /// * `internal_path` - container.xml的内部路径
    ///
    /// # 返回值
    /// * `Result<Container>` - 根元素不对或没有任何rootfile时返回错误
    pub fn parse(bytes: &[u8], internal_path: &str) -> Result<Container> {
        let root = XmlNode::parse(bytes)?;
        if !root.is(namespace::CONTAINER, "container") {
            return Err(EpubError::ContainerParseError(format!(
                "{}: 根元素不是<container>",
                internal_path
            )));
        }

        let renditions: Vec<Rendition> = root
            .select(namespace::CONTAINER, &["rootfiles", "rootfile"])
            .into_iter()
            .filter_map(parse_rootfile)
            .collect();

        if renditions.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        let mapping_path = root
            .children(namespace::CONTAINER, "link")
            .filter(|link| {
                link.attr("rel") == Some("mapping")
                    && link.attr("media-type") == Some(media_type::XHTML)
            })
            .filter_map(|link| link.attr_string("href"))
            .last();

        Ok(Container {
            internal_path: internal_path.to_string(),
            renditions,
            mapping_path,
            mapping: None,
        })
    }

    /// 默认渲染版本，即第一个声明的rootfile
    pub fn default_rendition(&self) -> Option<&Rendition> {
        self.renditions.first()
    }

    pub fn default_rendition_mut(&mut self) -> Option<&mut Rendition> {
        self.renditions.first_mut()
    }

    /// 按包文档内部路径查找渲染版本
    pub fn rendition_by_path(&self, full_path: &str) -> Option<&Rendition> {
        self.renditions
            .iter()
            .find(|rendition| rendition.full_path == full_path)
    }
}

fn parse_rootfile(rootfile: &XmlNode) -> Option<Rendition> {
    let full_path = rootfile.attr("full-path")?;
    let media_type = rootfile.attr("media-type")?;
    let mut rendition = Rendition::new(full_path, media_type);
    rendition.access_mode = rootfile.attr_ns_string(namespace::RENDITION, "accessMode");
    rendition.label = rootfile.attr_ns_string(namespace::RENDITION, "label");
    rendition.language = rootfile.attr_ns_string(namespace::RENDITION, "language");
    rendition.layout = rootfile.attr_ns_string(namespace::RENDITION, "layout");
    rendition.media = rootfile.attr_ns_string(namespace::RENDITION, "media");
    Some(rendition)
}
