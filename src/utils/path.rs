use std::env;
use std::path::Path;

use log::error;

/// 不以 `/` 开头的路径相对于当前工作目录解析
pub fn is_relative(path: &str) -> bool {
    Path::new(path).is_relative()
}

pub fn current_dir() -> String {
    let _current_dir = match env::current_dir() {
        Ok(x) => x,
        Err(e) => {
            error!("pipesh: PROMPT: env current_dir error: {}", e);
            return String::new();
        }
    };
    let current_dir = match _current_dir.to_str() {
        Some(x) => x,
        None => {
            error!("pipesh: PROMPT: to_str error");
            return String::new();
        }
    };

    current_dir.to_string()
}
