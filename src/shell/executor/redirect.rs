use std::fmt;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::path::Path;

use log::debug;
use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use crate::shell::parser::ast::SimpleCommand;
use crate::shell::parser::RedirectOp;

#[derive(Debug)]
pub struct RedirectError {
    pub context: String,
    pub errno: nix::Error,
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.errno.desc())
    }
}

impl std::error::Error for RedirectError {}

impl RedirectOp {
    /// 重定向覆盖的标准流
    pub fn target_fd(&self) -> RawFd {
        match self {
            RedirectOp::Input => libc::STDIN_FILENO,
            RedirectOp::Output => libc::STDOUT_FILENO,
            RedirectOp::Error => libc::STDERR_FILENO,
        }
    }
}

/// 输入只读且必须存在；输出和错误只写、不存在则创建（权限 0700）、存在则截断
pub fn open_redirect(path: &Path, op: RedirectOp) -> nix::Result<OwnedFd> {
    let flags = match op {
        RedirectOp::Input => OFlag::O_RDONLY,
        RedirectOp::Output | RedirectOp::Error => {
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC
        }
    };
    let fd = fcntl::open(path, flags | OFlag::O_CLOEXEC, Mode::S_IRWXU)?;
    // SAFETY: open 刚返回的描述符只归这里所有
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// 把 `source` 复制到 `target` 上，然后关闭 `source`。
/// 重定向和管道连接都经过这里，保证多余的描述符不会带进 exec 后的程序。
pub fn redirect_fd(source: OwnedFd, target: RawFd) -> nix::Result<()> {
    if source.as_raw_fd() == target {
        // 已经在目标位置上：不能关闭，只去掉 O_CLOEXEC
        let fd = source.into_raw_fd();
        fcntl::fcntl(fd, FcntlArg::F_SETFD(FdFlag::empty()))?;
        return Ok(());
    }
    unistd::dup2(source.as_raw_fd(), target)?;
    drop(source);
    Ok(())
}

/// 在子进程中按输入、输出、错误的顺序应用重定向，任何一步失败都不再继续
pub fn apply_redirections(command: &SimpleCommand) -> Result<(), RedirectError> {
    for (op, path) in command.redirections() {
        debug!("重定向 {} {}", op.symbol(), path.display());
        let fd = open_redirect(path, op).map_err(|errno| RedirectError {
            context: path.display().to_string(),
            errno,
        })?;
        redirect_fd(fd, op.target_fd()).map_err(|errno| RedirectError {
            context: "dup2".to_string(),
            errno,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use std::fs::{self, File};
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_output_is_created_with_owner_rwx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let fd = open_redirect(&path, RedirectOp::Output).unwrap();
        drop(fd);
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_output_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("err.txt");
        fs::write(&path, "old content that is long").unwrap();

        let mut file = File::from(open_redirect(&path, RedirectOp::Error).unwrap());
        file.write_all(b"new").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert_eq!(
            open_redirect(&path, RedirectOp::Input).err(),
            Some(Errno::ENOENT)
        );
        assert!(!path.exists());
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_redirect_fd_rebinds_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target.txt");
        let source = open_redirect(&path, RedirectOp::Output).unwrap();

        // 用管道写端的描述符号充当被覆盖的“标准流”
        let (read_end, write_end) = unistd::pipe().unwrap();
        drop(read_end);
        let target = write_end.into_raw_fd();

        redirect_fd(source, target).unwrap();
        // SAFETY: target 现在指向 target.txt，由这里独占
        let mut file = File::from(unsafe { OwnedFd::from_raw_fd(target) });
        file.write_all(b"through dup2").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "through dup2");
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_apply_redirections_stops_at_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut command = SimpleCommand::new(["cat"]);
        command.input = Some(dir.path().join("missing.txt"));
        command.output = Some(dir.path().join("never.txt"));

        let err = apply_redirections(&command).unwrap_err();
        assert_eq!(err.errno, Errno::ENOENT);
        assert!(err.to_string().ends_with("missing.txt: No such file or directory"));
        assert!(!dir.path().join("never.txt").exists());
    }
}
