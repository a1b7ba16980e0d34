use crate::utils::config::Config;
use log::{debug, error, warn};
pub use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use rustyline::{CompletionType, Config as RLConfig};
use std::io::{self, BufRead, IsTerminal};

pub struct ReadlineManager<'a> {
    config: &'a Config,
    // 标准输入不是终端时为 None，逐行读取脚本输入
    editor: Option<Editor<(), FileHistory>>,
}

impl<'a> ReadlineManager<'a> {
    pub fn new(config: &'a Config) -> Self {
        if !io::stdin().is_terminal() {
            debug!("标准输入不是终端，使用非交互模式");
            return Self {
                config,
                editor: None,
            };
        }

        let rl_config = RLConfig::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(config.get_edit_mode())
            .build();

        let editor = match Editor::with_config(rl_config) {
            Ok(editor) => Some(editor),
            Err(err) => {
                error!("无法初始化 readline: {}", err);
                None
            }
        };
        Self { config, editor }
    }

    pub fn is_interactive(&self) -> bool {
        self.editor.is_some()
    }

    pub fn load_history(&mut self) -> Result<(), ReadlineError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        if let Err(err) = editor.load_history(&self.config.history_file) {
            warn!(
                "无法加载历史记录: {} {}",
                self.config.history_file.display(),
                err
            );
        } else {
            debug!("历史记录加载成功");
        }
        Ok(())
    }

    /// 读取一行，去掉行尾换行符
    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        match self.editor.as_mut() {
            Some(editor) => editor.readline(prompt),
            None => read_script_line(&mut io::stdin().lock()),
        }
    }

    pub fn add_history(&mut self, line: String) -> Result<bool, ReadlineError> {
        match self.editor.as_mut() {
            Some(editor) => editor.add_history_entry(line),
            None => Ok(false),
        }
    }

    pub fn save_history(&mut self) -> Result<(), ReadlineError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(());
        };
        if let Err(err) = editor.save_history(&self.config.history_file) {
            error!("保存历史记录失败: {}", err);
        } else {
            debug!("历史记录保存成功");
        }
        Ok(())
    }
}

/// 非交互模式读取一行。整行先按字节读完，不是合法 UTF-8 时返回 InvalidData，
/// 下一次调用从下一行继续
fn read_script_line(reader: &mut impl BufRead) -> Result<String, ReadlineError> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Err(ReadlineError::Eof);
    }
    let line = String::from_utf8(buf).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("input line is not valid UTF-8: {}", e.utf8_error()),
        )
    })?;
    Ok(strip_line_ending(&line).to_string())
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(line)
}
