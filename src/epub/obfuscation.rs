//! 字体混淆编解码
//!
//! EPUB用出版物唯一标识符派生的密钥对资源（通常是字体）开头的若干字节做异或混淆。
//! 异或变换是对合的：同一函数既用于混淆也用于还原。

use std::fmt;

/// Adobe混淆算法URI
pub const ADOBE_ALGORITHM: &str = "http://ns.adobe.com/pdf/enc#RC";
/// IDPF混淆算法URI
pub const IDPF_ALGORITHM: &str = "http://www.idpf.org/2008/embedding";

/// 混淆算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObfuscationAlgorithm {
    /// Adobe旧式算法：64个16字节块
    Adobe,
    /// IDPF算法：52个20字节块，密钥为SHA-1摘要
    Idpf,
}

impl ObfuscationAlgorithm {
    /// 根据encryption.xml中的算法URI识别混淆算法
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            ADOBE_ALGORITHM => Some(Self::Adobe),
            IDPF_ALGORITHM => Some(Self::Idpf),
            _ => None,
        }
    }

    /// 算法URI
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Adobe => ADOBE_ALGORITHM,
            Self::Idpf => IDPF_ALGORITHM,
        }
    }

    /// (块数, 块长度)
    fn layout(&self) -> (usize, usize) {
        match self {
            Self::Adobe => (64, 16),
            Self::Idpf => (52, 20),
        }
    }

    /// 由出版物唯一标识符派生密钥
    ///
    /// # 参数
    /// * `identifier` - 出版物唯一标识符
    ///
    /// # 返回值
    /// * `Vec<u8>` - Adobe算法为去掉`urn:uuid:`、`-`和`:`后的字符串字节；
    ///   IDPF算法为去掉空白字符后字符串的20字节SHA-1摘要
    pub fn derive_key(&self, identifier: &str) -> Vec<u8> {
        match self {
            Self::Adobe => identifier
                .replace("urn:uuid:", "")
                .replace(['-', ':'], "")
                .into_bytes(),
            Self::Idpf => {
                let cleaned: String = identifier
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '\t' | '\r' | '\n'))
                    .collect();
                sha1_smol::Sha1::from(cleaned.as_bytes()).digest().bytes().to_vec()
            }
        }
    }
}

impl fmt::Display for ObfuscationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// 就地对数据开头的混淆区域做异或
///
/// 每个块的第i个字节与`key[i % key.len()]`异或；混淆区域之外的字节保持不变。
/// 密钥为空时数据保持不变。
pub fn obfuscate_in_place(data: &mut [u8], key: &[u8], algorithm: ObfuscationAlgorithm) {
    if key.is_empty() {
        return;
    }
    let (blocks, block_size) = algorithm.layout();
    let limit = data.len().min(blocks * block_size);
    for (position, byte) in data[..limit].iter_mut().enumerate() {
        let inner = position % block_size;
        *byte ^= key[inner % key.len()];
    }
}

/// 使用出版物唯一标识符混淆数据
///
/// # 参数
/// * `data` - 原始数据
/// * `identifier` - 出版物唯一标识符
/// * `algorithm` - 混淆算法
///
/// # 返回值
/// * `Vec<u8>` - 变换后的数据
pub fn obfuscate(data: &[u8], identifier: &str, algorithm: ObfuscationAlgorithm) -> Vec<u8> {
    let key = algorithm.derive_key(identifier);
    let mut output = data.to_vec();
    obfuscate_in_place(&mut output, &key, algorithm);
    output
}

/// 还原混淆数据。异或变换是对合的，与混淆是同一操作。
pub fn deobfuscate(data: &[u8], identifier: &str, algorithm: ObfuscationAlgorithm) -> Vec<u8> {
    obfuscate(data, identifier, algorithm)
}
