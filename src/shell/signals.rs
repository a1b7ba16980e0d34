use log::{debug, warn};
use nix::sys::signal::{signal, SigHandler, Signal};

const SHELL_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGQUIT];

fn set_handler(handler: SigHandler) {
    for sig in SHELL_SIGNALS {
        // SAFETY: 只设置 SIG_IGN / SIG_DFL，不安装自定义处理函数
        if let Err(e) = unsafe { signal(sig, handler) } {
            warn!("设置信号 {} 处理方式失败: {}", sig, e);
        }
    }
}

/// 交互模式下 shell 自己忽略 Ctrl-C / Ctrl-\，只让前台命令收到
pub fn ignore_shell_signals() {
    debug!("忽略 SIGINT / SIGQUIT");
    set_handler(SigHandler::SigIgn);
}

/// 子进程在 exec 前恢复默认处理，否则忽略状态会被继承
pub fn restore_default_signals() {
    set_handler(SigHandler::SigDfl);
}
