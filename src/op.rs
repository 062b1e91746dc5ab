//! Validated forms of the wire requests. Handlers only ever see these, so
//! every required field is guaranteed present and every argument that will
//! land in a subprocess argument vector has already been checked.

use crate::msg::request::{
    ExecuteArgs, FileOperationArgs, MountArgs, Request, UnmountArgs,
};
use std::fmt;

pub const NO_COMMAND_SPECIFIED: &str = "No command specified";
pub const UNKNOWN_COMMAND: &str = "Unknown command";
pub const NO_DEVICE_SPECIFIED: &str = "No device specified";
pub const NO_TARGET_SPECIFIED: &str = "No target specified";
pub const INVALID_FILE_OPERATION: &str = "Invalid file operation";
pub const INVALID_PATH_ARGUMENT: &str = "Invalid path argument";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Mount(MountOp),
    Unmount(UnmountOp),
    File(FileOp),
    Execute(ExecOp),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountOp {
    pub device: String,
    pub mountpoint: Option<String>,
    pub filesystem: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnmountOp {
    pub target: String,
    pub force: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOp {
    Copy { source: String, destination: String },
    Move { source: String, destination: String },
    Delete { source: String },
    Mkdir { path: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecOp {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidateError {
    /// `mount` without a device
    MissingDevice,

    /// `unmount` without a target
    MissingTarget,

    /// `execute` without a program
    MissingProgram,

    /// `file_operation` with an unrecognized operation or missing
    /// companion fields
    InvalidFileOperation,

    /// An argument that is empty or contains NUL; never forwarded to a
    /// subprocess
    InvalidArgument,
}

impl fmt::Display for ValidateError {
    // The displayed text is the `error` string sent back on the wire
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::MissingDevice => NO_DEVICE_SPECIFIED,
            Self::MissingTarget => NO_TARGET_SPECIFIED,
            Self::MissingProgram => NO_COMMAND_SPECIFIED,
            Self::InvalidFileOperation => INVALID_FILE_OPERATION,
            Self::InvalidArgument => INVALID_PATH_ARGUMENT,
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for ValidateError {}

impl Request {
    /// Converts the lenient wire form into a strict operation, or the
    /// validation error whose text answers the request. No privileged
    /// action is ever attempted for a request that fails here.
    pub fn validate(self) -> Result<Op, ValidateError> {
        match self {
            Request::Mount(args) => args.validate().map(Op::Mount),
            Request::Unmount(args) => args.validate().map(Op::Unmount),
            Request::FileOperation(args) => args.validate().map(Op::File),
            Request::Execute(args) => args.validate().map(Op::Execute),
        }
    }
}

impl MountArgs {
    fn validate(self) -> Result<MountOp, ValidateError> {
        Ok(MountOp {
            device: required_arg(self.device, ValidateError::MissingDevice)?,
            mountpoint: optional_arg(self.mountpoint)?,
            filesystem: optional_arg(self.filesystem)?,
        })
    }
}

impl UnmountArgs {
    fn validate(self) -> Result<UnmountOp, ValidateError> {
        Ok(UnmountOp {
            target: required_arg(self.target, ValidateError::MissingTarget)?,
            force: self.force,
        })
    }
}

impl FileOperationArgs {
    fn validate(self) -> Result<FileOp, ValidateError> {
        match self.operation.as_deref() {
            Some("copy") => Ok(FileOp::Copy {
                source: companion_arg(self.source)?,
                destination: companion_arg(self.destination)?,
            }),
            Some("move") => Ok(FileOp::Move {
                source: companion_arg(self.source)?,
                destination: companion_arg(self.destination)?,
            }),
            Some("delete") => Ok(FileOp::Delete {
                source: companion_arg(self.source)?,
            }),
            Some("mkdir") => Ok(FileOp::Mkdir {
                path: companion_arg(self.source)?,
            }),
            _ => Err(ValidateError::InvalidFileOperation),
        }
    }
}

impl ExecuteArgs {
    fn validate(self) -> Result<ExecOp, ValidateError> {
        let program =
            required_arg(self.cmd, ValidateError::MissingProgram)?;
        // Argument strings are arbitrary, but NUL can never cross exec
        if self.args.iter().any(|x| x.contains('\0')) {
            return Err(ValidateError::InvalidArgument);
        }
        Ok(ExecOp {
            program,
            args: self.args,
        })
    }
}

fn required_arg(
    arg: Option<String>,
    missing: ValidateError,
) -> Result<String, ValidateError> {
    match arg {
        None => Err(missing),
        Some(s) if s.is_empty() || s.contains('\0') => {
            Err(ValidateError::InvalidArgument)
        }
        Some(s) => Ok(s),
    }
}

/// Companion fields of a file operation; absence is an invalid operation
/// rather than a missing-argument case of its own
fn companion_arg(arg: Option<String>) -> Result<String, ValidateError> {
    required_arg(arg, ValidateError::InvalidFileOperation)
}

/// An empty optional argument reads as absent
fn optional_arg(
    arg: Option<String>,
) -> Result<Option<String>, ValidateError> {
    match arg {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) if s.contains('\0') => Err(ValidateError::InvalidArgument),
        Some(s) => Ok(Some(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount_args(
        device: Option<&str>,
        mountpoint: Option<&str>,
        filesystem: Option<&str>,
    ) -> MountArgs {
        MountArgs {
            device: device.map(String::from),
            mountpoint: mountpoint.map(String::from),
            filesystem: filesystem.map(String::from),
        }
    }

    #[test]
    fn mount_without_device_should_fail_validation() {
        let result =
            Request::Mount(mount_args(None, Some("/mnt/x"), None)).validate();
        assert_eq!(result, Err(ValidateError::MissingDevice));
        assert_eq!(
            ValidateError::MissingDevice.to_string(),
            "No device specified"
        );
    }

    #[test]
    fn mount_with_empty_device_should_be_invalid_argument() {
        let result = Request::Mount(mount_args(Some(""), None, None)).validate();
        assert_eq!(result, Err(ValidateError::InvalidArgument));
    }

    #[test]
    fn mount_with_nul_in_device_should_be_invalid_argument() {
        let result =
            Request::Mount(mount_args(Some("/dev/di\0sk2"), None, None))
                .validate();
        assert_eq!(result, Err(ValidateError::InvalidArgument));
    }

    #[test]
    fn mount_with_device_alone_should_validate() {
        let op = Request::Mount(mount_args(Some("/dev/disk2"), None, None))
            .validate()
            .unwrap();
        assert_eq!(
            op,
            Op::Mount(MountOp {
                device: String::from("/dev/disk2"),
                mountpoint: None,
                filesystem: None,
            })
        );
    }

    #[test]
    fn empty_optional_mount_fields_should_read_as_absent() {
        let op =
            Request::Mount(mount_args(Some("/dev/disk2"), Some(""), Some("")))
                .validate()
                .unwrap();
        assert_eq!(
            op,
            Op::Mount(MountOp {
                device: String::from("/dev/disk2"),
                mountpoint: None,
                filesystem: None,
            })
        );
    }

    #[test]
    fn unmount_without_target_should_fail_validation() {
        let result = Request::Unmount(UnmountArgs {
            target: None,
            force: true,
        })
        .validate();
        assert_eq!(result, Err(ValidateError::MissingTarget));
        assert_eq!(
            ValidateError::MissingTarget.to_string(),
            "No target specified"
        );
    }

    fn file_args(
        operation: Option<&str>,
        source: Option<&str>,
        destination: Option<&str>,
    ) -> FileOperationArgs {
        FileOperationArgs {
            operation: operation.map(String::from),
            source: source.map(String::from),
            destination: destination.map(String::from),
        }
    }

    #[test]
    fn copy_without_destination_should_be_invalid_file_operation() {
        let result =
            Request::FileOperation(file_args(Some("copy"), Some("/a"), None))
                .validate();
        assert_eq!(result, Err(ValidateError::InvalidFileOperation));
        assert_eq!(
            ValidateError::InvalidFileOperation.to_string(),
            "Invalid file operation"
        );
    }

    #[test]
    fn file_operation_without_operation_should_be_invalid() {
        let result =
            Request::FileOperation(file_args(None, Some("/a"), Some("/b")))
                .validate();
        assert_eq!(result, Err(ValidateError::InvalidFileOperation));
    }

    #[test]
    fn unrecognized_operation_should_be_invalid() {
        let result = Request::FileOperation(file_args(
            Some("shred"),
            Some("/a"),
            None,
        ))
        .validate();
        assert_eq!(result, Err(ValidateError::InvalidFileOperation));
    }

    #[test]
    fn delete_needs_only_a_source() {
        let op =
            Request::FileOperation(file_args(Some("delete"), Some("/a"), None))
                .validate()
                .unwrap();
        assert_eq!(
            op,
            Op::File(FileOp::Delete {
                source: String::from("/a")
            })
        );
    }

    #[test]
    fn mkdir_needs_only_a_source() {
        let op =
            Request::FileOperation(file_args(Some("mkdir"), Some("/a/b"), None))
                .validate()
                .unwrap();
        assert_eq!(
            op,
            Op::File(FileOp::Mkdir {
                path: String::from("/a/b")
            })
        );
    }

    #[test]
    fn execute_without_cmd_should_reuse_no_command_message() {
        let result = Request::Execute(ExecuteArgs {
            cmd: None,
            args: vec![String::from("-l")],
        })
        .validate();
        assert_eq!(result, Err(ValidateError::MissingProgram));
        assert_eq!(
            ValidateError::MissingProgram.to_string(),
            "No command specified"
        );
    }

    #[test]
    fn execute_with_nul_in_args_should_be_invalid_argument() {
        let result = Request::Execute(ExecuteArgs {
            cmd: Some(String::from("/bin/ls")),
            args: vec![String::from("-l"), String::from("bad\0arg")],
        })
        .validate();
        assert_eq!(result, Err(ValidateError::InvalidArgument));
    }

    #[test]
    fn execute_should_keep_argument_vector_intact() {
        let op = Request::Execute(ExecuteArgs {
            cmd: Some(String::from("/usr/bin/du")),
            args: vec![String::from("-sh"), String::from("/var/log")],
        })
        .validate()
        .unwrap();
        assert_eq!(
            op,
            Op::Execute(ExecOp {
                program: String::from("/usr/bin/du"),
                args: vec![String::from("-sh"), String::from("/var/log")],
            })
        );
    }
}
