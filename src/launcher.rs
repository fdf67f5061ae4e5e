use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::store::OPEN_PREFIX;

const SHELL: &str = "sh";

#[cfg(target_os = "macos")]
pub const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_OPENER: &str = "xdg-open";

/// What a stored command string turns into before anything is executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Hand a path (spaces allowed) to the OS opener through the shell.
    Open { target: String },
    /// Run a program directly, no shell involved.
    Direct { program: String, args: Vec<String> },
}

impl LaunchPlan {
    pub fn parse(command: &str) -> Result<Self, LaunchError> {
        if let Some(rest) = command.strip_prefix(OPEN_PREFIX) {
            let target = rest.trim();
            if target.is_empty() {
                return Err(LaunchError::Empty);
            }
            return Ok(LaunchPlan::Open {
                target: target.to_string(),
            });
        }

        if command.trim().is_empty() {
            return Err(LaunchError::Empty);
        }
        let words = shlex::split(command).ok_or_else(|| LaunchError::Parse(command.to_string()))?;
        let mut iter = words.into_iter();
        let program = iter.next().ok_or(LaunchError::Empty)?;
        Ok(LaunchPlan::Direct {
            program,
            args: iter.collect(),
        })
    }

    /// Shell script for the `Open` form, with the target quoted.
    pub fn shell_script(&self, opener: &str) -> Option<String> {
        match self {
            LaunchPlan::Open { target } => {
                let quoted = shlex::try_quote(target).ok()?;
                Some(format!("{opener} {quoted}"))
            }
            LaunchPlan::Direct { .. } => None,
        }
    }

    /// Full argv as it will be handed to the OS.
    pub fn argv(&self, opener: &str) -> Vec<String> {
        match self {
            LaunchPlan::Open { .. } => {
                let script = self.shell_script(opener).unwrap_or_default();
                vec![SHELL.to_string(), "-c".to_string(), script]
            }
            LaunchPlan::Direct { program, args } => {
                std::iter::once(program.clone()).chain(args.iter().cloned()).collect()
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Launched {
    /// The opener ran and reported success.
    Opened,
    /// A detached child was started.
    Spawned { pid: u32 },
}

#[derive(Clone, Debug)]
pub struct Launcher {
    opener: String,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::new(DEFAULT_OPENER)
    }
}

impl Launcher {
    pub fn new(opener: impl Into<String>) -> Self {
        Self {
            opener: opener.into(),
        }
    }

    pub fn launch(&self, command: &str) -> Result<Launched, LaunchError> {
        let plan = LaunchPlan::parse(command)?;
        debug!(?plan, "launch plan");
        self.execute(&plan)
    }

    pub fn execute(&self, plan: &LaunchPlan) -> Result<Launched, LaunchError> {
        match plan {
            LaunchPlan::Open { .. } => {
                let script = plan
                    .shell_script(&self.opener)
                    .ok_or_else(|| LaunchError::Parse(format!("{plan:?}")))?;
                let status = Command::new(SHELL)
                    .arg("-c")
                    .arg(&script)
                    .stdin(Stdio::null())
                    .status()
                    .map_err(|source| LaunchError::Spawn {
                        program: SHELL.to_string(),
                        source,
                    })?;
                if !status.success() {
                    return Err(LaunchError::Exit {
                        command: script,
                        code: status.code(),
                    });
                }
                info!(%script, "opened");
                Ok(Launched::Opened)
            }
            LaunchPlan::Direct { program, args } => {
                let (pid, _reaper) = spawn_reaped(program, args)?;
                Ok(Launched::Spawned { pid })
            }
        }
    }
}

/// Starts `program` without waiting for it. A background thread waits on the
/// child so it never lingers as a zombie, and logs a failed exit.
fn spawn_reaped(
    program: &str,
    args: &[String],
) -> Result<(u32, JoinHandle<Result<(), LaunchError>>), LaunchError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;
    let pid = child.id();
    info!(%program, pid, "spawned");

    let program = program.to_string();
    let reaper = thread::spawn(move || {
        let status = child.wait().map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;
        if status.success() {
            debug!(%program, pid, "exited");
            return Ok(());
        }
        let err = LaunchError::Exit {
            command: program,
            code: status.code(),
        };
        warn!(pid, error = %err, "launched program failed");
        Err(err)
    });
    Ok((pid, reaper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_form_quotes_the_path() {
        let plan = LaunchPlan::parse("open /Applications/Safari.app").unwrap();
        assert_eq!(
            plan,
            LaunchPlan::Open {
                target: "/Applications/Safari.app".into()
            }
        );
        let argv = plan.argv("open");
        assert_eq!(argv[..2], ["sh", "-c"]);
        assert_eq!(
            shlex::split(&argv[2]).unwrap(),
            ["open", "/Applications/Safari.app"]
        );
    }

    #[test]
    fn open_form_with_spaces_stays_one_argument() {
        let plan = LaunchPlan::parse("open /Applications/Visual Studio Code.app").unwrap();
        let script = plan.shell_script("open").unwrap();
        assert_ne!(script, "open /Applications/Visual Studio Code.app");
        assert_eq!(
            shlex::split(&script).unwrap(),
            ["open", "/Applications/Visual Studio Code.app"]
        );
    }

    #[test]
    fn open_form_neutralises_shell_metacharacters() {
        let plan = LaunchPlan::parse("open /tmp/a;rm -rf b.app").unwrap();
        let script = plan.shell_script("open").unwrap();
        assert_eq!(shlex::split(&script).unwrap(), ["open", "/tmp/a;rm -rf b.app"]);
    }

    #[test]
    fn direct_form_has_no_shell() {
        let plan = LaunchPlan::parse("ls -la").unwrap();
        assert_eq!(
            plan,
            LaunchPlan::Direct {
                program: "ls".into(),
                args: vec!["-la".into()]
            }
        );
        assert_eq!(plan.argv("open"), ["ls", "-la"]);
        assert_eq!(plan.shell_script("open"), None);
    }

    #[test]
    fn direct_form_respects_quotes() {
        let plan = LaunchPlan::parse(r#""/opt/My Tool/bin/tool" --flag "a b""#).unwrap();
        assert_eq!(plan.argv("open"), ["/opt/My Tool/bin/tool", "--flag", "a b"]);
    }

    #[test]
    fn empty_and_broken_commands_are_rejected() {
        assert!(matches!(LaunchPlan::parse(""), Err(LaunchError::Empty)));
        assert!(matches!(LaunchPlan::parse("   "), Err(LaunchError::Empty)));
        assert!(matches!(LaunchPlan::parse("open   "), Err(LaunchError::Empty)));
        assert!(matches!(
            LaunchPlan::parse("echo \"unterminated"),
            Err(LaunchError::Parse(_))
        ));
    }

    #[test]
    fn spawn_failure_is_reported() {
        let err = Launcher::default()
            .launch("pi-menu-no-such-program-7f3a --version")
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { ref program, .. } if program == "pi-menu-no-such-program-7f3a"));
        assert!(err.to_string().contains("pi-menu-no-such-program-7f3a"));
    }

    #[cfg(unix)]
    #[test]
    fn opener_exit_status_is_reported() {
        let failing = Launcher::new("false");
        let err = failing.launch("open /Applications/Nothing.app").unwrap_err();
        assert!(matches!(err, LaunchError::Exit { code: Some(1), .. }));

        let succeeding = Launcher::new("true");
        assert_eq!(
            succeeding.launch("open /Applications/Nothing.app").unwrap(),
            Launched::Opened
        );
    }

    #[cfg(unix)]
    #[test]
    fn direct_launch_spawns() {
        let launched = Launcher::default().launch("true").unwrap();
        assert!(matches!(launched, Launched::Spawned { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn direct_exit_status_is_collected() {
        let (pid, reaper) = spawn_reaped("false", &[]).unwrap();
        let outcome = reaper.join().unwrap();
        assert!(matches!(outcome, Err(LaunchError::Exit { code: Some(1), .. })));

        #[cfg(target_os = "linux")]
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
        let _ = pid;

        let (_, reaper) = spawn_reaped("true", &[]).unwrap();
        assert!(reaper.join().unwrap().is_ok());
    }
}
