use colored::Colorize;
use std::collections::HashMap;

pub struct Theme {
    messages: HashMap<&'static str, String>,
    pub prompt_style: Box<dyn Fn(String) -> String>,
    pub error_style: Box<dyn Fn(String) -> String>,
    pub warning_style: Box<dyn Fn(String) -> String>,
    pub success_style: Box<dyn Fn(String) -> String>,
}

fn messages(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
    pairs
        .iter()
        .map(|(key, value)| (*key, value.to_string()))
        .collect()
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            messages: messages(&[
                ("welcome", "pipesh 已就绪，输入 exit 退出"),
                ("help", "支持 cd、exit、< > 2> 重定向以及 | 管道"),
                ("exit", "再见"),
                ("eof_signal", "输入结束，退出"),
                ("interrupt_signal", "已中断"),
                ("error", "错误"),
                ("success_symbol", "✓"),
                ("error_symbol", "✗"),
                ("command_error", "命令失败，退出码"),
                ("parse_error", "语法错误"),
            ]),
            prompt_style: Box::new(|s| s.bright_cyan().to_string()),
            error_style: Box::new(|s| s.bright_red().to_string()),
            warning_style: Box::new(|s| s.yellow().to_string()),
            success_style: Box::new(|s| s.bright_green().to_string()),
        }
    }
}

impl Theme {
    pub fn load_theme(theme_name: &str) -> Theme {
        match theme_name {
            "dark" => Theme {
                prompt_style: Box::new(|s| s.bright_purple().to_string()),
                error_style: Box::new(|s| s.red().to_string()),
                warning_style: Box::new(|s| s.bright_yellow().to_string()),
                success_style: Box::new(|s| s.magenta().to_string()),
                ..Theme::default()
            },
            _ => Theme::default(),
        }
    }

    pub fn get_message(&self, key: &str) -> String {
        self.messages.get(key).cloned().unwrap_or_default()
    }

    /// 提示符为 `<cwd>> `
    pub fn prompt(&self, cwd: &str) -> String {
        (self.prompt_style)(format!("{}> ", cwd))
    }
}
