use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub theme: String,
    pub config_dir: PathBuf,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
    /// cd 允许的最大路径长度
    pub max_path_len: usize,
    /// 每条命令结束后是否打印成功/失败提示
    pub feedback: bool,
}

impl Config {
    /// 没有 HOME 时退回系统临时目录，不依赖启动时的工作目录
    fn get_config_dir(home: Option<OsString>) -> PathBuf {
        match home {
            Some(home) => PathBuf::from(home).join(".config/pipesh"),
            None => env::temp_dir().join("pipesh"),
        }
    }

    fn default() -> Self {
        let config_dir = Self::get_config_dir(env::var_os("HOME"));
        Config {
            name: String::from(env!("CARGO_PKG_NAME")),
            theme: String::from("default"),
            history_file: config_dir.join(".pipesh_history"),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
            max_path_len: libc::PATH_MAX as usize,
            feedback: true,
            config_dir,
        }
    }

    pub fn new() -> Self {
        // 优先加载环境变量文件
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        // 默认配置
        let mut config = Config::default();

        // 从环境变量加载配置
        if let Ok(theme) = env::var("PIPESH_THEME") {
            config.theme = theme;
        }

        if let Ok(editor) = env::var("PIPESH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Ok(history) = env::var("PIPESH_HISTORY") {
            config.history_file = PathBuf::from(history);
        }

        if let Ok(level) = env::var("PIPESH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("PIPESH_LOG_DIR") {
            config.logger_dir = PathBuf::from(dir);
        }

        if let Ok(max) = env::var("PIPESH_MAX_PATH") {
            match max.trim().parse::<usize>() {
                Ok(max) if max > 0 => config.max_path_len = max,
                _ => eprintln!("{}: PIPESH_MAX_PATH 无效: {}，使用默认值", config.name, max),
            }
        }

        if let Ok(feedback) = env::var("PIPESH_FEEDBACK") {
            config.feedback = !matches!(feedback.trim(), "0" | "false" | "off");
        }

        // 确保历史文件目录存在，此时日志尚未初始化
        if let Some(parent) = config.history_file.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!(
                    "{}: 无法创建历史记录目录 {}: {}",
                    config.name,
                    parent.display(),
                    e
                );
            }
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "vi" => EditMode::Vi,
            _ => EditMode::Emacs,
        }
    }
}
