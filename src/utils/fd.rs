/// Pre-opened descriptor access
///
/// The sandbox hands the process extra channels (3 for images, 5 for the
/// grading report). Writers always work on a duplicate so that closing the
/// writer never closes the inherited descriptor itself.
use crate::config::types::{HarnessError, Result};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::unistd::dup;
use std::fs::File;
use std::os::unix::io::{FromRawFd, RawFd};

/// Check that `fd` is open and not read-only
pub fn check_writable(fd: RawFd) -> Result<()> {
    let flags = fcntl(fd, FcntlArg::F_GETFL).map_err(|e| HarnessError::Descriptor {
        fd,
        reason: e.to_string(),
    })?;

    let access_mode = OFlag::from_bits_truncate(flags) & OFlag::O_ACCMODE;
    if access_mode == OFlag::O_RDONLY {
        return Err(HarnessError::Descriptor {
            fd,
            reason: "opened read-only".to_string(),
        });
    }
    Ok(())
}

/// Open a private writable handle on `fd`
pub fn open_for_writing(fd: RawFd) -> Result<File> {
    check_writable(fd)?;

    let copy = dup(fd).map_err(|e| HarnessError::Descriptor {
        fd,
        reason: format!("dup failed: {}", e),
    })?;
    log::debug!("Opened descriptor {} as {}", fd, copy);

    // SAFETY: `copy` was just returned by dup(2) and nothing else owns it.
    Ok(unsafe { File::from_raw_fd(copy) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::pipe;
    use std::io::{Read, Write};
    use std::os::unix::io::AsRawFd;

    #[test]
    fn test_closed_descriptor_rejected() {
        let result = open_for_writing(9999);
        assert!(matches!(result, Err(HarnessError::Descriptor { fd: 9999, .. })));
    }

    #[test]
    fn test_read_end_rejected() {
        let (read_end, _write_end) = pipe().unwrap();
        let result = check_writable(read_end.as_raw_fd());
        assert!(matches!(result, Err(HarnessError::Descriptor { .. })));
    }

    #[test]
    fn test_closing_writer_keeps_original_open() {
        let (read_end, write_end) = pipe().unwrap();

        {
            let mut writer = open_for_writing(write_end.as_raw_fd()).unwrap();
            writer.write_all(b"first").unwrap();
        }
        {
            let mut writer = open_for_writing(write_end.as_raw_fd()).unwrap();
            writer.write_all(b"second").unwrap();
        }
        drop(write_end);

        let mut reader = File::from(read_end);
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data, "firstsecond");
    }
}
