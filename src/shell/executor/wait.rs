use log::{debug, error, warn};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus as WS};
use nix::unistd::Pid;

use super::status::{ExitStatus, EXIT_FAILURE};
use crate::shell::SHELL_NAME;

/// 已结束进程的退出码：正常退出取退出码，被信号杀死视为一般失败。
/// 停止、继续等状态不算结束。
pub fn terminated(ws: WS) -> Option<(Pid, i32)> {
    match ws {
        WS::Exited(pid, status) => Some((pid, status)),
        WS::Signaled(pid, sig, _core_dumped) => {
            debug!("进程 {} 被信号 {} 终止", pid, sig);
            Some((pid, EXIT_FAILURE))
        }
        _ => None,
    }
}

/// 阻塞等待指定子进程结束
pub fn wait_child(pid: Pid) -> ExitStatus {
    loop {
        match waitpid(pid, None) {
            Ok(ws) => {
                if let Some((_, status)) = terminated(ws) {
                    debug!("子进程 {} 退出: {}", pid, status);
                    return ExitStatus::Code(status);
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => {
                error!("waitpid {} 失败: {}", pid, e);
                eprintln!("{}: wait: {}", SHELL_NAME, e.desc());
                return ExitStatus::FAILURE;
            }
        }
    }
}

/// 回收所有子进程直到 ECHILD，返回 `last` 的退出码。
/// 如果始终没有观察到 `last`，使用最后一个被回收进程的退出码；一个都没有则为失败。
pub fn reap_all(last: Pid) -> ExitStatus {
    let mut last_status = None;
    let mut observed = None;

    loop {
        match waitpid(None, None) {
            Ok(ws) => {
                if let Some((pid, status)) = terminated(ws) {
                    debug!("回收进程 {}: {}", pid, status);
                    observed = Some(status);
                    if pid == last {
                        last_status = Some(status);
                    }
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(e) => {
                error!("waitpid 失败: {}", e);
                eprintln!("{}: wait: {}", SHELL_NAME, e.desc());
                break;
            }
        }
    }

    if last_status.is_none() {
        warn!("没有观察到管道最后一段 {} 的退出状态", last);
    }
    ExitStatus::Code(last_status.or(observed).unwrap_or(EXIT_FAILURE))
}
