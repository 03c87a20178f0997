//! 解析选项模块
//!
//! 每个子解析步骤都有一对开关（例如`NCX`/`NO_NCX`），两者都没有出现时默认启用。
//! 选项可以从YAML文件加载。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "epubgraph.yaml";

/// 单个解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParsingOption {
    AssetRefs,
    NoAssetRefs,
    Encryption,
    NoEncryption,
    MediaOverlay,
    NoMediaOverlay,
    MultipleRenditions,
    NoMultipleRenditions,
    Ncx,
    NoNcx,
    Nav,
    NoNav,
}

impl ParsingOption {
    pub const ALL: [ParsingOption; 12] = [
        ParsingOption::AssetRefs,
        ParsingOption::NoAssetRefs,
        ParsingOption::Encryption,
        ParsingOption::NoEncryption,
        ParsingOption::MediaOverlay,
        ParsingOption::NoMediaOverlay,
        ParsingOption::MultipleRenditions,
        ParsingOption::NoMultipleRenditions,
        ParsingOption::Ncx,
        ParsingOption::NoNcx,
        ParsingOption::Nav,
        ParsingOption::NoNav,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingOption::AssetRefs => "ASSET_REFS",
            ParsingOption::NoAssetRefs => "NO_ASSET_REFS",
            ParsingOption::Encryption => "ENCRYPTION",
            ParsingOption::NoEncryption => "NO_ENCRYPTION",
            ParsingOption::MediaOverlay => "MEDIA_OVERLAY",
            ParsingOption::NoMediaOverlay => "NO_MEDIA_OVERLAY",
            ParsingOption::MultipleRenditions => "MULTIPLE_RENDITIONS",
            ParsingOption::NoMultipleRenditions => "NO_MULTIPLE_RENDITIONS",
            ParsingOption::Ncx => "NCX",
            ParsingOption::NoNcx => "NO_NCX",
            ParsingOption::Nav => "NAV",
            ParsingOption::NoNav => "NO_NAV",
        }
    }
}

impl fmt::Display for ParsingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParsingOption {
    type Err = EpubError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_uppercase();
        ParsingOption::ALL
            .into_iter()
            .find(|option| option.as_str() == name)
            .ok_or_else(|| EpubError::ConfigError(format!("未知的解析选项: {}", s)))
    }
}

/// 受选项控制的子解析步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingFeature {
    AssetRefs,
    Encryption,
    MediaOverlay,
    MultipleRenditions,
    Ncx,
    Nav,
}

impl ParsingFeature {
    /// 启用该步骤的选项和禁用该步骤的选项
    fn switches(&self) -> (ParsingOption, ParsingOption) {
        match self {
            ParsingFeature::AssetRefs => (ParsingOption::AssetRefs, ParsingOption::NoAssetRefs),
            ParsingFeature::Encryption => (ParsingOption::Encryption, ParsingOption::NoEncryption),
            ParsingFeature::MediaOverlay => {
                (ParsingOption::MediaOverlay, ParsingOption::NoMediaOverlay)
            }
            ParsingFeature::MultipleRenditions => (
                ParsingOption::MultipleRenditions,
                ParsingOption::NoMultipleRenditions,
            ),
            ParsingFeature::Ncx => (ParsingOption::Ncx, ParsingOption::NoNcx),
            ParsingFeature::Nav => (ParsingOption::Nav, ParsingOption::NoNav),
        }
    }
}

/// 一组解析选项，空集合表示全部启用
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingOptions {
    #[serde(default)]
    pub options: Vec<ParsingOption>,
}

impl ParsingOptions {
    pub fn new(options: Vec<ParsingOption>) -> Self {
        Self { options }
    }

    /// 添加一个选项
    pub fn with(mut self, option: ParsingOption) -> Self {
        if !self.options.contains(&option) {
            self.options.push(option);
        }
        self
    }

    /// 判断某个子解析步骤是否启用
    ///
    /// 显式启用的选项优先于禁用选项；两者都没有时启用。
    pub fn is_enabled(&self, feature: ParsingFeature) -> bool {
        let (enable, disable) = feature.switches();
        self.options.contains(&enable) || !self.options.contains(&disable)
    }

    /// 从YAML字符串解析选项
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 从YAML文件加载选项
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回选项，失败返回`ConfigError`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;
        Self::from_yaml_str(&content)
    }

    /// 生成默认配置文件
    ///
    /// 默认配置不包含任何选项，即全部启用。
    pub fn write_default_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# 解析选项配置文件\n# 可用选项: {}\n\n{}",
            ParsingOption::ALL.map(|o| o.as_str()).join(", "),
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}

impl FromIterator<ParsingOption> for ParsingOptions {
    fn from_iter<I: IntoIterator<Item = ParsingOption>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParsingOptions::default(), |options, option| options.with(option))
    }
}
