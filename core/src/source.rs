mod file;
mod id;
mod manager;

pub use file::Document;
pub use id::DocumentId;
pub use manager::DocumentStore;

/// 认作 4GL 源码的文件后缀
pub const FILE_EXTENSIONS: &[&str] = &["4gl", "src"];

/// 客户端声明的语言标识
pub const LANGUAGE_ID: &str = "fourgl";

/// 按 URI/路径后缀判断 (忽略大小写)
pub fn is_fourgl(uri: &str) -> bool {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    match path.rsplit_once('.') {
        Some((_, ext)) => FILE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}
