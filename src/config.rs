//! Runtime configuration
//!
//! There is no config file and the wrapper takes no options of its own:
//! every argument belongs to the target. Configuration comes from the
//! environment, a few well-known names, and a build-time default.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pty::base_name;

/// Path or command name of the program to wrap
pub const TARGET_ENV: &str = "PTYWRAP_TARGET";

/// Enables SIGWINCH forwarding when set to a truthy value
pub const RESIZE_ENV: &str = "PTYWRAP_RESIZE";

/// Tracing filter directive for the wrapper's own diagnostics
pub const LOG_ENV: &str = "PTYWRAP_LOG";

/// Name the wrapper is installed under
pub const WRAPPER_NAME: &str = "ptywrap";

/// Target baked in at build time, e.g.
/// `PTYWRAP_DEFAULT_TARGET=/usr/bin/kubectl cargo build --release`
pub const DEFAULT_TARGET: Option<&str> = option_env!("PTYWRAP_DEFAULT_TARGET");

/// Wrapper configuration, built once and handed to the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program to run inside the pty
    pub target: PathBuf,
    /// Keep the pty size in sync with the invoking terminal
    pub forward_resize: bool,
}

impl Config {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            forward_resize: false,
        }
    }

    pub fn with_resize_forwarding(mut self, enabled: bool) -> Self {
        self.forward_resize = enabled;
        self
    }

    /// Build the configuration from this process's environment
    ///
    /// `argv0` is the wrapper's own invocation name.
    pub fn from_env(argv0: &OsStr) -> Result<Self> {
        Self::resolve(argv0, &Environment::capture(), DEFAULT_TARGET)
    }

    /// Resolve the target, in order of precedence:
    ///
    /// 1. `PTYWRAP_TARGET` (a bare name is looked up in `PATH`)
    /// 2. the invocation name, when the wrapper runs under a link named
    ///    after its target; `PATH` is searched skipping the wrapper itself
    /// 3. the build-time default
    pub fn resolve(
        argv0: &OsStr,
        environment: &Environment,
        default: Option<&str>,
    ) -> Result<Self> {
        let target = match environment.target.as_deref().filter(|t| !t.is_empty()) {
            Some(target) => environment.lookup(target)?,
            None => match invoked_name(argv0) {
                Some(name) => environment.lookup_excluding_self(name)?,
                None => match default {
                    Some(default) => PathBuf::from(default),
                    None => {
                        return Err(Error::Config(format!(
                            "no target program: set {TARGET_ENV} or invoke {WRAPPER_NAME} \
                             through a link named after the target"
                        )))
                    }
                },
            },
        };

        let forward_resize = environment.resize.as_deref().is_some_and(is_truthy);

        tracing::debug!(target = %target.display(), forward_resize, "resolved configuration");
        Ok(Self {
            target,
            forward_resize,
        })
    }
}

/// Process-level inputs the configuration is derived from
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub target: Option<OsString>,
    pub resize: Option<OsString>,
    pub path: Option<OsString>,
    pub cwd: PathBuf,
    /// Canonical path of the running wrapper binary
    pub current_exe: Option<PathBuf>,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            target: env::var_os(TARGET_ENV),
            resize: env::var_os(RESIZE_ENV),
            path: env::var_os("PATH"),
            cwd: env::current_dir().unwrap_or_default(),
            current_exe: env::current_exe().and_then(|p| p.canonicalize()).ok(),
        }
    }

    /// A name containing a slash is taken as a path, anything else is
    /// searched for in `PATH`
    fn lookup(&self, target: &OsStr) -> Result<PathBuf> {
        if Path::new(target).components().count() > 1 {
            return Ok(PathBuf::from(target));
        }
        which::which_in(target, self.path.as_ref(), &self.cwd).map_err(|e| {
            Error::Config(format!("{}: {}", Path::new(target).display(), e))
        })
    }

    fn lookup_excluding_self(&self, name: &OsStr) -> Result<PathBuf> {
        let candidates = which::which_in_all(name, self.path.as_ref(), &self.cwd)
            .map_err(|e| Error::Config(format!("{}: {}", Path::new(name).display(), e)))?;

        candidates
            .into_iter()
            .find(|candidate| !self.is_wrapper(candidate))
            .ok_or_else(|| {
                Error::Config(format!(
                    "{}: no executable in PATH other than this wrapper",
                    Path::new(name).display()
                ))
            })
    }

    fn is_wrapper(&self, candidate: &Path) -> bool {
        match (&self.current_exe, candidate.canonicalize()) {
            (Some(exe), Ok(candidate)) => *exe == candidate,
            _ => false,
        }
    }
}

/// The invocation name, unless it is the wrapper's own name
fn invoked_name(argv0: &OsStr) -> Option<&OsStr> {
    let name = base_name(Path::new(argv0));
    (!name.is_empty() && name != WRAPPER_NAME).then_some(name)
}

fn is_truthy(value: &OsStr) -> bool {
    value
        .to_str()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
